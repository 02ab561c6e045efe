use crate::models::{ReaderProfile, SimplifiedRecommendation};

/// Builds the grounding text injected as the first turn of a new chat
///
/// Enumerates the reader's profile and every recommendation in full (the
/// list is never truncated here; the model tolerates the sizes this catalog
/// produces), then constrains the assistant's scope and tone. Injected as a
/// leading user turn, with [`acknowledgment`] as the model's scripted reply,
/// so grounding does not depend on upstream system-role support.
pub fn build_system_prompt(
    profile: &ReaderProfile,
    recommendations: &[SimplifiedRecommendation],
) -> String {
    let interests_list = format_label_list(&profile.interests);
    let genres_list = format_label_list(&profile.genres);
    let language = format_label(&profile.language.to_string());
    let count = recommendations.len();

    let quick_reference = if recommendations.is_empty() {
        "No specific recommendations yet.".to_string()
    } else {
        recommendations
            .iter()
            .enumerate()
            .map(|(i, rec)| format!("{}. {}", i + 1, rec.book.title))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let books_list = if recommendations.is_empty() {
        "No specific recommendations yet.".to_string()
    } else {
        recommendations
            .iter()
            .enumerate()
            .map(|(i, rec)| format_recommendation(i, rec))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    format!(
        "You are an enthusiastic, knowledgeable children's book librarian helping {name} discover \
their next great read. You're warm, patient, and genuinely excited about books!

READER PROFILE
Name: {name}
Age: {age} years old
Interests: {interests}
Favorite Genres: {genres}
Language: {language}

{name_upper}'S PERSONALIZED BOOK RECOMMENDATIONS ({count} BOOKS)

Quick Reference:
{quick_reference}

Detailed Information:
{books_list}

YOUR ROLE AS BOOK ADVISOR

Help {name} explore these {count} carefully selected books and find the perfect read based on \
their mood, interests, and reading goals.

Communication style:
- Warm, enthusiastic, and encouraging
- Age-appropriate vocabulary for {age} year olds
- Conversational and natural, like a friendly librarian
- Keep responses concise: 2-4 sentences typically

You can help with book selection, spoiler-free summaries, comparisons of themes, length and \
tone, reading order suggestions, and explaining WHY each book was recommended. Reference match \
scores to show relevance, and connect books to {name}'s interests ({interests}) and favorite \
genres ({genres}) when relevant.

DO:
- Reference books by title and author
- Use match scores to show relevance
- Mention specific details from the descriptions
- Ask engaging follow-up questions
- Use {name}'s name occasionally to personalize

DON'T:
- Recommend or discuss books NOT in this list
- Make up information about books
- Give major plot spoilers
- Use overly complex language
- Write long paragraphs

You have complete information about ALL {count} books above. Reference any of them confidently. \
Your goal is to help {name} feel excited about reading and confident in choosing their next book.",
        name = profile.name,
        name_upper = profile.name.to_uppercase(),
        age = profile.age_group,
        interests = interests_list,
        genres = genres_list,
        language = language,
        count = count,
        quick_reference = quick_reference,
        books_list = books_list,
    )
}

/// The canned assistant turn that follows the grounding text
pub fn acknowledgment(profile: &ReaderProfile, recommendation_count: usize) -> String {
    format!(
        "Perfect! I've got all {count} books here and I'm ready to help {name} find the perfect \
read! I know about their interests ({interests}) and favorite genres ({genres}), and I can \
answer any questions about these carefully selected books. Let's find your next favorite story!",
        count = recommendation_count,
        name = profile.name,
        interests = profile.interests.join(", "),
        genres = profile.genres.join(", "),
    )
}

fn format_recommendation(index: usize, rec: &SimplifiedRecommendation) -> String {
    let book = &rec.book;
    let ages: Vec<String> = book.age_groups.iter().map(|a| a.to_string()).collect();
    format!(
        "{n}. \"{title}\" by {author}
   - Age Range: {ages}
   - Genres: {genres}
   - Interests: {interests}
   - Pages: {pages}
   - Published: {year}
   - Match Score: {score}/10
   - Description: {description}
   - Why recommended: {reasons}",
        n = index + 1,
        title = book.title,
        author = book.author,
        ages = ages.join(", "),
        genres = book.genres.join(", "),
        interests = book.interests.join(", "),
        pages = book.page_count,
        year = book.published_year,
        score = rec.score,
        description = book.description,
        reasons = rec.match_reasons.join(", "),
    )
}

/// Turns a kebab-case tag value into a display label
fn format_label(value: &str) -> String {
    value
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_label_list(values: &[String]) -> String {
    if values.is_empty() {
        "Not specified".to_string()
    } else {
        values
            .iter()
            .map(|v| format_label(v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeGroup, Language, SimplifiedBook};

    fn test_profile() -> ReaderProfile {
        ReaderProfile {
            name: "Maya".to_string(),
            age_group: AgeGroup::EightToTen,
            interests: vec!["magic".to_string(), "animals".to_string()],
            genres: vec!["fantasy".to_string(), "realistic-fiction".to_string()],
            language: Language::English,
        }
    }

    fn test_recommendation(title: &str, score: u32) -> SimplifiedRecommendation {
        SimplifiedRecommendation {
            book: SimplifiedBook {
                title: title.to_string(),
                author: "Author".to_string(),
                description: "A story.".to_string(),
                age_groups: vec![AgeGroup::EightToTen],
                interests: vec!["magic".to_string()],
                genres: vec!["fantasy".to_string()],
                page_count: 200,
                published_year: 2010,
            },
            score,
            match_reasons: vec!["Matches your interest in fantasy".to_string()],
        }
    }

    #[test]
    fn test_prompt_includes_profile_fields() {
        let prompt = build_system_prompt(&test_profile(), &[]);

        assert!(prompt.contains("Name: Maya"));
        assert!(prompt.contains("Age: 8-10 years old"));
        assert!(prompt.contains("Interests: Magic, Animals"));
        assert!(prompt.contains("Favorite Genres: Fantasy, Realistic Fiction"));
        assert!(prompt.contains("Language: English"));
    }

    #[test]
    fn test_prompt_enumerates_every_recommendation() {
        let recs: Vec<SimplifiedRecommendation> = (0..12)
            .map(|i| test_recommendation(&format!("Book {}", i), 5))
            .collect();

        let prompt = build_system_prompt(&test_profile(), &recs);

        // The full list goes into the prompt, never a top-N cut.
        for rec in &recs {
            assert!(prompt.contains(&format!("\"{}\" by Author", rec.book.title)));
        }
        assert!(prompt.contains("(12 BOOKS)"));
    }

    #[test]
    fn test_prompt_includes_book_details_and_reasons() {
        let prompt = build_system_prompt(&test_profile(), &[test_recommendation("Hexwood", 7)]);

        assert!(prompt.contains("Match Score: 7/10"));
        assert!(prompt.contains("Pages: 200"));
        assert!(prompt.contains("Why recommended: Matches your interest in fantasy"));
    }

    #[test]
    fn test_prompt_carries_behavioral_constraints() {
        let prompt = build_system_prompt(&test_profile(), &[]);

        assert!(prompt.contains("NOT in this list"));
        assert!(prompt.contains("Make up information"));
        assert!(prompt.contains("major plot spoilers"));
        assert!(prompt.contains("2-4 sentences"));
    }

    #[test]
    fn test_prompt_handles_empty_preferences() {
        let mut profile = test_profile();
        profile.interests.clear();

        let prompt = build_system_prompt(&profile, &[]);
        assert!(prompt.contains("Interests: Not specified"));
    }

    #[test]
    fn test_acknowledgment_mentions_count_and_name() {
        let ack = acknowledgment(&test_profile(), 8);
        assert!(ack.contains("all 8 books"));
        assert!(ack.contains("Maya"));
        assert!(ack.contains("magic, animals"));
    }

    #[test]
    fn test_format_label_title_cases_kebab_values() {
        assert_eq!(format_label("realistic-fiction"), "Realistic Fiction");
        assert_eq!(format_label("magic"), "Magic");
    }
}
