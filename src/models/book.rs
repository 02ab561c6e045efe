use serde::{Deserialize, Serialize};

use super::profile::{AgeGroup, Language};

/// An immutable catalog entry
///
/// Tag vectors (`age_groups`, `interests`, `genres`, `languages`) carry the
/// recommendation metadata. A book with an empty tag vector for a filtered
/// field can never match a profile; unlisted means not applicable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub cover_url: String,

    // Recommendation metadata
    #[serde(rename = "ageGroup")]
    pub age_groups: Vec<AgeGroup>,
    pub interests: Vec<String>,
    pub genres: Vec<String>,
    pub languages: Vec<Language>,

    // Additional metadata
    pub page_count: u32,
    pub published_year: i32,
    pub description: String,
}

/// A catalog book paired with a match score and justification strings
///
/// Score 0 only appears on fallback results; zero-overlap books are excluded
/// from the primary match set entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub book: Book,
    pub score: u32,
    pub match_reasons: Vec<String>,
}
