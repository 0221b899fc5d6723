//! Document language selection.
//!
//! Only affects date parsing: month names, number words and the order of
//! day and month in numeric dates.

use serde::{Deserialize, Serialize};

/// Languages with date vocabulary support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English language
    #[default]
    English,
    /// Spanish language
    Spanish,
    /// French language
    French,
}

impl Language {
    /// Parse an ISO 639-1 code or English language name.
    ///
    /// Unknown codes fall back to English.
    ///
    /// ```rust
    /// use lexner::lang::Language;
    ///
    /// assert_eq!(Language::from_code("es"), Language::Spanish);
    /// assert_eq!(Language::from_code("FR"), Language::French);
    /// assert_eq!(Language::from_code("de"), Language::English);
    /// ```
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "es" | "spa" | "spanish" => Language::Spanish,
            "fr" | "fra" | "fre" | "french" => Language::French,
            _ => Language::English,
        }
    }

    /// ISO 639-1 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
        }
    }

    /// Returns true if ambiguous numeric dates read month first (`05/12/2023` is May 12).
    #[must_use]
    pub const fn is_month_first(&self) -> bool {
        matches!(self, Language::English)
    }
}
