//! Entity types and mention structures.
//!
//! # Type Families
//!
//! ```text
//! NamedEntityType
//! ├── Identity (grouped by fuzzy canonical matching)
//! │   ├── Person, Organization, Location, Law
//! │   ├── Date           (grouped by calendar value)
//! │   └── DocumentCode   (already canonical, e.g. A/79/150)
//! │
//! └── Reference family (grouped by exact identity only)
//!     ├── Reference             title marker / legacy citation
//!     ├── ReferencePointer      in-text citation of a title
//!     └── ReferenceDestination  citable title
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Closed set of entity types handled by the grouping core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NamedEntityType {
    /// Person name.
    Person,
    /// Organization name.
    Organization,
    /// Location or geo-political entity.
    Location,
    /// Date expression.
    Date,
    /// Law, treaty or regulation title.
    Law,
    /// Official document symbol (e.g. `A/79/150`).
    DocumentCode,
    /// Title marker or citation, matched by exact identity.
    Reference,
    /// In-text mention that cites a destination.
    ReferencePointer,
    /// Title segment that can be cited.
    ReferenceDestination,
}

impl NamedEntityType {
    /// Every variant, in declaration order.
    pub const ALL: [NamedEntityType; 9] = [
        NamedEntityType::Person,
        NamedEntityType::Organization,
        NamedEntityType::Location,
        NamedEntityType::Date,
        NamedEntityType::Law,
        NamedEntityType::DocumentCode,
        NamedEntityType::Reference,
        NamedEntityType::ReferencePointer,
        NamedEntityType::ReferenceDestination,
    ];

    /// Canonical label (`PERSON`, `REFERENCE_POINTER`, ...).
    #[must_use]
    pub const fn as_label(&self) -> &'static str {
        match self {
            NamedEntityType::Person => "PERSON",
            NamedEntityType::Organization => "ORGANIZATION",
            NamedEntityType::Location => "LOCATION",
            NamedEntityType::Date => "DATE",
            NamedEntityType::Law => "LAW",
            NamedEntityType::DocumentCode => "DOCUMENT_CODE",
            NamedEntityType::Reference => "REFERENCE",
            NamedEntityType::ReferencePointer => "REFERENCE_POINTER",
            NamedEntityType::ReferenceDestination => "REFERENCE_DESTINATION",
        }
    }

    /// Parse a label, accepting the short tags extractors commonly emit.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lexner_core::NamedEntityType;
    ///
    /// assert_eq!(NamedEntityType::from_label("ORG").unwrap(), NamedEntityType::Organization);
    /// assert_eq!(NamedEntityType::from_label("gpe").unwrap(), NamedEntityType::Location);
    /// assert!(NamedEntityType::from_label("MONEY").is_err());
    /// ```
    pub fn from_label(label: &str) -> Result<Self> {
        match label.trim().to_uppercase().as_str() {
            "PERSON" | "PER" => Ok(NamedEntityType::Person),
            "ORGANIZATION" | "ORG" => Ok(NamedEntityType::Organization),
            "LOCATION" | "LOC" | "GPE" => Ok(NamedEntityType::Location),
            "DATE" => Ok(NamedEntityType::Date),
            "LAW" => Ok(NamedEntityType::Law),
            "DOCUMENT_CODE" => Ok(NamedEntityType::DocumentCode),
            "REFERENCE" => Ok(NamedEntityType::Reference),
            "REFERENCE_POINTER" => Ok(NamedEntityType::ReferencePointer),
            "REFERENCE_DESTINATION" => Ok(NamedEntityType::ReferenceDestination),
            _ => Err(Error::unknown_entity_type(label)),
        }
    }

    /// True for the three citation types, which never use fuzzy matching.
    #[must_use]
    pub const fn is_reference_family(&self) -> bool {
        matches!(
            self,
            NamedEntityType::Reference
                | NamedEntityType::ReferencePointer
                | NamedEntityType::ReferenceDestination
        )
    }

    /// True for types whose display name prefers the longest surface form.
    #[must_use]
    pub const fn prefers_longest_name(&self) -> bool {
        matches!(
            self,
            NamedEntityType::Person | NamedEntityType::Organization | NamedEntityType::Location
        )
    }
}

impl std::fmt::Display for NamedEntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

impl std::str::FromStr for NamedEntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
    }
}

/// A single extracted mention.
///
/// `segment` is an index into the segment list of the batch that owns the
/// entity. Everything below `group_name` is computed by the grouping core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    /// Entity type.
    #[serde(rename = "type")]
    pub entity_type: NamedEntityType,
    /// Raw surface text.
    pub text: String,
    /// Type-specific canonical form.
    #[serde(default)]
    pub normalized_text: String,
    /// Start character offset in the owning segment (inclusive).
    #[serde(default)]
    pub character_start: usize,
    /// End character offset in the owning segment (exclusive).
    #[serde(default)]
    pub character_end: usize,
    /// Key of the group this entity belongs to.
    #[serde(default)]
    pub group_name: String,
    /// Index of the owning segment in the batch.
    #[serde(default)]
    pub segment: Option<usize>,
    /// Number of other entities in the batch with the same type and text.
    #[serde(default)]
    pub appearance_count: usize,
    /// Share of the segment text covered by this mention (0-100).
    #[serde(default)]
    pub percentage_to_segment_text: u32,
    /// First entity of its type in the batch.
    #[serde(default)]
    pub first_type_appearance: bool,
    /// Last entity of its type in the batch.
    #[serde(default)]
    pub last_type_appearance: bool,
    /// Heuristic relevance score.
    #[serde(default)]
    pub relevance_percentage: u32,
}

impl NamedEntity {
    /// Create an entity with only type and text set.
    #[must_use]
    pub fn new(entity_type: NamedEntityType, text: impl Into<String>) -> Self {
        Self {
            entity_type,
            text: text.into(),
            normalized_text: String::new(),
            character_start: 0,
            character_end: 0,
            group_name: String::new(),
            segment: None,
            appearance_count: 0,
            percentage_to_segment_text: 0,
            first_type_appearance: false,
            last_type_appearance: false,
            relevance_percentage: 0,
        }
    }

    /// Set character offsets.
    #[must_use]
    pub fn with_offsets(mut self, start: usize, end: usize) -> Self {
        self.character_start = start;
        self.character_end = end;
        self
    }

    /// Attach to a segment of the batch.
    #[must_use]
    pub fn in_segment(mut self, segment: usize) -> Self {
        self.segment = Some(segment);
        self
    }

    /// Bind to a group key up front (used for reference pointers).
    #[must_use]
    pub fn with_group_name(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = group_name.into();
        self
    }

    /// Pre-set the canonical text.
    #[must_use]
    pub fn with_normalized_text(mut self, normalized_text: impl Into<String>) -> Self {
        self.normalized_text = normalized_text.into();
        self
    }

    /// Pre-set the relevance score.
    #[must_use]
    pub fn with_relevance(mut self, relevance_percentage: u32) -> Self {
        self.relevance_percentage = relevance_percentage;
        self
    }

    /// Check if this entity's span overlaps another's.
    ///
    /// Only meaningful for entities of the same segment.
    #[must_use]
    pub fn overlaps(&self, other: &NamedEntity) -> bool {
        !(self.character_end <= other.character_start || other.character_end <= self.character_start)
    }

    /// Span length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.character_end.saturating_sub(self.character_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip() {
        for ty in NamedEntityType::ALL {
            assert_eq!(NamedEntityType::from_label(ty.as_label()).unwrap(), ty);
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        let err = NamedEntityType::from_label("MONEY").unwrap_err();
        assert_eq!(err, Error::UnknownEntityType("MONEY".to_string()));
    }

    #[test]
    fn test_reference_family() {
        assert!(NamedEntityType::Reference.is_reference_family());
        assert!(NamedEntityType::ReferencePointer.is_reference_family());
        assert!(NamedEntityType::ReferenceDestination.is_reference_family());
        assert!(!NamedEntityType::DocumentCode.is_reference_family());
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&NamedEntityType::DocumentCode).unwrap();
        assert_eq!(json, "\"DOCUMENT_CODE\"");

        let entity: NamedEntity =
            serde_json::from_str(r#"{"type": "PERSON", "text": "María Diaz"}"#).unwrap();
        assert_eq!(entity.entity_type, NamedEntityType::Person);
        assert!(entity.normalized_text.is_empty());
        assert_eq!(entity.segment, None);
    }

    #[test]
    fn test_overlap() {
        let a = NamedEntity::new(NamedEntityType::Person, "John").with_offsets(0, 4);
        let b = NamedEntity::new(NamedEntityType::Person, "Smith").with_offsets(5, 10);
        let c = NamedEntity::new(NamedEntityType::Person, "John Smith").with_offsets(0, 10);

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }
}
