use crate::catalog::Catalog;
use crate::models::{Book, Recommendation, ReaderProfile};

/// Default number of recommendations returned
pub const DEFAULT_LIMIT: usize = 8;

/// Generates personalized book recommendations
///
/// Age group and language are mandatory filters: a book missing either tag is
/// excluded outright, not penalized. Books that pass the filters are scored
/// by preference overlap (genres weigh 3, interests weigh 2) and sorted
/// descending; ties keep catalog order. Books with zero overlap are excluded
/// from the primary result set, so any score-0 result a caller sees came from
/// the fallback path.
pub fn recommend(profile: &ReaderProfile, catalog: &Catalog, limit: usize) -> Vec<Recommendation> {
    let mut matches: Vec<Recommendation> = catalog
        .books()
        .iter()
        .filter_map(|book| {
            let (score, reasons) = score_book(book, profile)?;
            (score > 0).then(|| Recommendation {
                book: book.clone(),
                score,
                match_reasons: reasons,
            })
        })
        .collect();

    // Stable sort: equal scores keep catalog order
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(limit);

    if !matches.is_empty() {
        tracing::debug!(
            count = matches.len(),
            top_score = matches[0].score,
            "recommendations computed"
        );
        return matches;
    }

    // Fallback: no preference overlap anywhere, so return age-appropriate
    // books regardless of language, marked by score 0.
    let fallback: Vec<Recommendation> = catalog
        .books()
        .iter()
        .filter(|book| book.age_groups.contains(&profile.age_group))
        .take(limit)
        .map(|book| Recommendation {
            book: book.clone(),
            score: 0,
            match_reasons: vec![
                format!("Age-appropriate for {} year olds", profile.age_group),
                "Popular choice among readers".to_string(),
            ],
        })
        .collect();

    tracing::debug!(count = fallback.len(), "falling back to age-filtered books");
    fallback
}

/// Scores a single book against the profile
///
/// Returns `None` when a mandatory filter fails, `Some((score, reasons))`
/// otherwise. A score of 0 means the filters passed but nothing overlapped.
fn score_book(book: &Book, profile: &ReaderProfile) -> Option<(u32, Vec<String>)> {
    // Mandatory filters: strict tag membership. An empty tag vector can never
    // match (unlisted = not applicable).
    if !book.age_groups.contains(&profile.age_group) {
        return None;
    }
    if !book.languages.contains(&profile.language) {
        return None;
    }

    let mut score = 0;
    let mut reasons = Vec::new();

    let genre_matches = intersection(&book.genres, &profile.genres);
    if !genre_matches.is_empty() {
        score += 3 * genre_matches.len() as u32;
        reasons.push(format!(
            "Matches your interest in {}",
            genre_matches.join(", ")
        ));
    }

    let interest_matches = intersection(&book.interests, &profile.interests);
    if !interest_matches.is_empty() {
        score += 2 * interest_matches.len() as u32;
        reasons.push(format!("Features {} themes", interest_matches.join(", ")));
    }

    let ages: Vec<String> = book.age_groups.iter().map(|a| a.to_string()).collect();
    reasons.push(format!("Perfect for ages {}", ages.join(", ")));

    Some((score, reasons))
}

/// Elements of `a` also present in `b`, in `a`'s order
fn intersection<'a>(a: &'a [String], b: &[String]) -> Vec<&'a str> {
    a.iter()
        .filter(|item| b.contains(item))
        .map(|item| item.as_str())
        .collect()
}
