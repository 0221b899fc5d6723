//! Pipeline configuration.
//!
//! Every section has defaults, so a partial JSON document is enough:
//!
//! ```rust
//! use lexner::config::Config;
//! use lexner::lang::Language;
//!
//! let config = Config::from_json_str(r#"{"language": "spanish", "grouping": {"comma_window": 2}}"#).unwrap();
//! assert_eq!(config.language, Language::Spanish);
//! assert_eq!(config.grouping.comma_window, 2);
//! assert_eq!(config.similarity.min_chars, 4);
//! ```

use std::path::Path;

use lexner_core::{NamedEntityType, Segment};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grouping::GroupingConfig;
use crate::lang::Language;
use crate::reference::ReferenceConfig;
use crate::scoring::ScoringConfig;
use crate::similarity::SimilarityConfig;

/// Layout labels the scorer and the reference resolver care about.
///
/// Labels compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentTypes {
    /// Labels of title-like segments (citable, scored highest).
    pub title: Vec<String>,
    /// Label of page headers.
    pub page_header: String,
    /// Label of running text.
    pub text: String,
}

impl Default for SegmentTypes {
    fn default() -> Self {
        Self {
            title: vec!["title".to_string(), "section header".to_string()],
            page_header: "page header".to_string(),
            text: "text".to_string(),
        }
    }
}

impl SegmentTypes {
    /// Whether the segment is a title or section header.
    #[must_use]
    pub fn is_title(&self, segment: &Segment) -> bool {
        self.title.iter().any(|label| segment.has_type(label))
    }

    /// Whether the segment is a page header.
    #[must_use]
    pub fn is_page_header(&self, segment: &Segment) -> bool {
        segment.has_type(&self.page_header)
    }

    /// Whether the segment is running text.
    #[must_use]
    pub fn is_text(&self, segment: &Segment) -> bool {
        segment.has_type(&self.text)
    }
}

/// Configuration for one [`DocumentPipeline`](crate::pipeline::DocumentPipeline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document language (date parsing).
    pub language: Language,
    /// Layout labels.
    pub segment_types: SegmentTypes,
    /// Relevance weights.
    pub scoring: ScoringConfig,
    /// Fuzzy matching thresholds.
    pub similarity: SimilarityConfig,
    /// Group naming.
    pub grouping: GroupingConfig,
    /// Pointer detection.
    pub reference: ReferenceConfig,
    /// Identity types whose groups are written to the store after a batch.
    pub persist_types: Vec<NamedEntityType>,
    /// Continue without the store when it fails, flagging the output.
    pub allow_degraded: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            segment_types: SegmentTypes::default(),
            scoring: ScoringConfig::default(),
            similarity: SimilarityConfig::default(),
            grouping: GroupingConfig::default(),
            reference: ReferenceConfig::default(),
            persist_types: Vec::new(),
            allow_degraded: false,
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Set the document language.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set the layout labels.
    #[must_use]
    pub fn with_segment_types(mut self, segment_types: SegmentTypes) -> Self {
        self.segment_types = segment_types;
        self
    }

    /// Set the relevance weights.
    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the similarity thresholds.
    #[must_use]
    pub fn with_similarity(mut self, similarity: SimilarityConfig) -> Self {
        self.similarity = similarity;
        self
    }

    /// Set the grouping options.
    #[must_use]
    pub fn with_grouping(mut self, grouping: GroupingConfig) -> Self {
        self.grouping = grouping;
        self
    }

    /// Set the pointer detection options.
    #[must_use]
    pub fn with_reference(mut self, reference: ReferenceConfig) -> Self {
        self.reference = reference;
        self
    }

    /// Persist groups of these types after each document.
    #[must_use]
    pub fn with_persist_types(mut self, types: impl IntoIterator<Item = NamedEntityType>) -> Self {
        self.persist_types = types.into_iter().collect();
        self
    }

    /// Continue without the store on failure.
    #[must_use]
    pub fn with_allow_degraded(mut self, allow: bool) -> Self {
        self.allow_degraded = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(Config::from_json_str("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_persist_types_labels() {
        let config =
            Config::from_json_str(r#"{"persist_types": ["PERSON", "ORGANIZATION"]}"#).unwrap();
        assert_eq!(
            config.persist_types,
            vec![NamedEntityType::Person, NamedEntityType::Organization]
        );
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            Config::from_json_str(r#"{"allow_degraded": "yes"}"#),
            Err(crate::Error::Json(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"allow_degraded": true, "reference": {{"min_pattern_chars": 5}}}}"#).unwrap();
        let config = Config::from_path(file.path()).unwrap();
        assert!(config.allow_degraded);
        assert_eq!(config.reference.min_pattern_chars, 5);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Config::from_path("/nonexistent/lexner.json"),
            Err(crate::Error::Io(_))
        ));
    }

    #[test]
    fn test_segment_types_case_insensitive() {
        let types = SegmentTypes::default();
        assert!(types.is_title(&Segment::new("x", "Section Header")));
        assert!(types.is_page_header(&Segment::new("x", "PAGE HEADER")));
        assert!(!types.is_title(&Segment::from_text("x")));
    }
}
