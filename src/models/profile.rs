use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};

/// Reader age bracket collected by the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "5-7")]
    FiveToSeven,
    #[serde(rename = "8-10")]
    EightToTen,
    #[serde(rename = "11-13")]
    ElevenToThirteen,
    #[serde(rename = "14-17")]
    FourteenToSeventeen,
}

impl Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AgeGroup::FiveToSeven => "5-7",
            AgeGroup::EightToTen => "8-10",
            AgeGroup::ElevenToThirteen => "11-13",
            AgeGroup::FourteenToSeventeen => "14-17",
        };
        write!(f, "{}", label)
    }
}

/// Reading language collected by the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    Bilingual,
    French,
    Other,
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Language::English => "english",
            Language::Spanish => "spanish",
            Language::Bilingual => "bilingual",
            Language::French => "french",
            Language::Other => "other",
        };
        write!(f, "{}", label)
    }
}

/// The reader's collected wizard answers
///
/// Interests and genres are kebab-case tag values matching the catalog's tag
/// vocabulary. Insertion order is kept for display; scoring treats them as
/// sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderProfile {
    pub name: String,
    pub age_group: AgeGroup,
    pub interests: Vec<String>,
    pub genres: Vec<String>,
    pub language: Language,
}

/// Bounds on the reader's display name, applied after trimming
pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;

/// Validates a reader name, returning the trimmed form
pub fn validate_name(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len < NAME_MIN_LEN || len > NAME_MAX_LEN {
        return Err(AppError::Validation(format!(
            "Name must be between {} and {} characters",
            NAME_MIN_LEN, NAME_MAX_LEN
        )));
    }
    Ok(trimmed.to_string())
}
