use crate::models::{AgeGroup, Book, Language};

fn book(
    id: &str,
    title: &str,
    author: &str,
    age_groups: Vec<AgeGroup>,
    interests: &[&str],
    genres: &[&str],
    languages: Vec<Language>,
    page_count: u32,
    published_year: i32,
    description: &str,
) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        cover_url: format!("/covers/{}.jpg", id),
        age_groups,
        interests: interests.iter().map(|s| s.to_string()).collect(),
        genres: genres.iter().map(|s| s.to_string()).collect(),
        languages,
        page_count,
        published_year,
        description: description.to_string(),
    }
}

/// The built-in catalog data
///
/// Tag values use the wizard's kebab-case vocabulary. Order matters: score
/// ties resolve to catalog position.
pub(super) fn builtin_books() -> Vec<Book> {
    use AgeGroup::*;
    use Language::*;

    vec![
        book(
            "charlottes-web",
            "Charlotte's Web",
            "E. B. White",
            vec![FiveToSeven, EightToTen],
            &["animals", "friendship", "nature"],
            &["fantasy", "realistic-fiction"],
            vec![English, Spanish],
            192,
            1952,
            "A pig named Wilbur is saved by a clever spider who spins words into her web to prove how special he is.",
        ),
        book(
            "dog-man",
            "Dog Man",
            "Dav Pilkey",
            vec![FiveToSeven, EightToTen],
            &["animals", "friendship", "adventure"],
            &["graphic-novel", "adventure"],
            vec![English, Spanish],
            240,
            2016,
            "Half dog, half man, all hero: a crime-fighting canine cop bounds through comic-panel capers.",
        ),
        book(
            "where-the-sidewalk-ends",
            "Where the Sidewalk Ends",
            "Shel Silverstein",
            vec![FiveToSeven, EightToTen],
            &["art", "nature"],
            &["poetry"],
            vec![English],
            176,
            1974,
            "A collection of playful poems and drawings about a place where the pavement stops and imagination begins.",
        ),
        book(
            "el-principito",
            "El Principito",
            "Antoine de Saint-Exupéry",
            vec![FiveToSeven, EightToTen],
            &["adventure", "nature", "art"],
            &["fantasy"],
            vec![Spanish, French, Bilingual],
            96,
            1943,
            "Un pequeño príncipe viaja de planeta en planeta y aprende lo que de verdad importa.",
        ),
        book(
            "the-sorcerers-stone",
            "Harry Potter and the Sorcerer's Stone",
            "J. K. Rowling",
            vec![EightToTen, ElevenToThirteen],
            &["magic", "friendship", "adventure"],
            &["fantasy"],
            vec![English, Spanish, French],
            309,
            1997,
            "An orphan discovers on his eleventh birthday that he is a wizard, and that a school called Hogwarts is waiting.",
        ),
        book(
            "the-lightning-thief",
            "The Lightning Thief",
            "Rick Riordan",
            vec![EightToTen, ElevenToThirteen],
            &["magic", "adventure", "history"],
            &["fantasy", "adventure"],
            vec![English],
            377,
            2005,
            "Percy Jackson learns he is the son of Poseidon and must cross the country to stop a war between the Greek gods.",
        ),
        book(
            "wonder",
            "Wonder",
            "R. J. Palacio",
            vec![EightToTen, ElevenToThirteen],
            &["friendship"],
            &["realistic-fiction"],
            vec![English, Spanish],
            315,
            2012,
            "Auggie Pullman, born with a facial difference, starts fifth grade at a mainstream school for the first time.",
        ),
        book(
            "the-one-and-only-ivan",
            "The One and Only Ivan",
            "Katherine Applegate",
            vec![EightToTen, ElevenToThirteen],
            &["animals", "friendship", "art"],
            &["realistic-fiction"],
            vec![English],
            320,
            2012,
            "A gorilla who has lived for years in a shopping-mall enclosure makes a promise to a baby elephant.",
        ),
        book(
            "smile",
            "Smile",
            "Raina Telgemeier",
            vec![EightToTen, ElevenToThirteen],
            &["friendship", "art"],
            &["graphic-novel", "realistic-fiction"],
            vec![English, Spanish],
            224,
            2010,
            "A true story about surviving middle school, earthquakes, and years of very dramatic dental work.",
        ),
        book(
            "esperanza-rising",
            "Esperanza Rising",
            "Pam Muñoz Ryan",
            vec![EightToTen, ElevenToThirteen],
            &["history", "friendship", "nature"],
            &["historical-fiction"],
            vec![English, Spanish, Bilingual],
            262,
            2000,
            "A girl from a wealthy Mexican ranch must start over in a California farm camp during the Great Depression.",
        ),
        book(
            "the-parker-inheritance",
            "The Parker Inheritance",
            "Varian Johnson",
            vec![EightToTen, ElevenToThirteen],
            &["mystery", "history", "friendship"],
            &["mystery-thriller"],
            vec![English],
            352,
            2018,
            "A letter in her grandmother's attic sends Candice chasing a puzzle that could right a decades-old injustice.",
        ),
        book(
            "holes",
            "Holes",
            "Louis Sachar",
            vec![ElevenToThirteen, FourteenToSeventeen],
            &["mystery", "friendship", "history"],
            &["mystery-thriller", "adventure"],
            vec![English],
            233,
            1998,
            "Stanley Yelnats is sent to a desert camp where boys dig holes all day, and the holes are not about character.",
        ),
        book(
            "a-wrinkle-in-time",
            "A Wrinkle in Time",
            "Madeleine L'Engle",
            vec![ElevenToThirteen],
            &["science", "magic", "adventure"],
            &["science-fiction", "fantasy"],
            vec![English],
            256,
            1962,
            "Meg Murry tessers across space with her little brother to rescue their father from a darkness between worlds.",
        ),
        book(
            "hatchet",
            "Hatchet",
            "Gary Paulsen",
            vec![ElevenToThirteen, FourteenToSeventeen],
            &["adventure", "nature"],
            &["adventure", "realistic-fiction"],
            vec![English],
            195,
            1986,
            "After a plane crash, thirteen-year-old Brian survives alone in the Canadian wilderness with only a hatchet.",
        ),
        book(
            "hidden-figures",
            "Hidden Figures: Young Readers' Edition",
            "Margot Lee Shetterly",
            vec![ElevenToThirteen, FourteenToSeventeen],
            &["science", "history"],
            &["non-fiction"],
            vec![English],
            240,
            2016,
            "The true story of the Black women mathematicians whose calculations helped send astronauts into orbit.",
        ),
        book(
            "the-hunger-games",
            "The Hunger Games",
            "Suzanne Collins",
            vec![FourteenToSeventeen],
            &["adventure", "sports"],
            &["science-fiction", "adventure"],
            vec![English, Spanish, French],
            374,
            2008,
            "Katniss Everdeen volunteers for a televised fight to the death to save her sister, and becomes a symbol of defiance.",
        ),
    ]
}
