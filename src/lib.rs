//! # lexner
//!
//! Entity grouping and cross-reference resolution for legal documents.
//!
//! - **Grouping**: decide which mentions denote the same person, organization,
//!   place, date or law, and pick a display name for each group
//! - **References**: find citations of a document's own titles
//!   ("see 4. Results") and bind them to the cited section
//! - **Persistence**: groups survive across documents through a [`store::GroupStore`]
//!
//! ## Quick Start
//!
//! ```rust
//! use lexner::grouping::GroupingEngine;
//! use lexner::{NamedEntity, NamedEntityType};
//!
//! let entities = vec![
//!     NamedEntity::new(NamedEntityType::Person, "María Diaz"),
//!     NamedEntity::new(NamedEntityType::Person, "Maria Díaz"),
//!     NamedEntity::new(NamedEntityType::Date, "12 May 2023"),
//!     NamedEntity::new(NamedEntityType::Date, "twelve may 2023"),
//! ];
//! let grouped = GroupingEngine::default().group(entities, &[]);
//!
//! assert_eq!(grouped.groups.len(), 2);
//! assert_eq!(grouped.groups[0].name, "María Diaz");
//! assert_eq!(grouped.groups[1].name, "2023-05-12");
//! ```
//!
//! ## Matching
//!
//! | Type | Rule |
//! |------|------|
//! | PERSON, ORGANIZATION, LAW | canonical form + fuzzy rules |
//! | LOCATION | ISO 3166 alpha-3 if a country, else canonical form |
//! | DATE | ISO `YYYY-MM-DD` |
//! | DOCUMENT_CODE | trimmed text |
//! | REFERENCE family | exact key only |
//!
//! Fuzzy rules, in order: exact, subset-word, near-miss (Levenshtein),
//! abbreviation. See [`similarity`].
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! lexner = "0.1"
//! lexner = { version = "0.1", features = ["fast-lock"] }  # parking_lot mutexes
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod country;
pub mod date;
pub mod document_code;
mod error;
pub mod grouping;
pub mod lang;
pub mod normalize;
pub mod offset;
pub mod pipeline;
pub mod reference;
pub mod scoring;
pub mod similarity;
pub mod store;
pub mod sync;

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use lexner::prelude::*;
    //!
    //! let pipeline = DocumentPipeline::in_memory("docs").unwrap();
    //! let out = pipeline
    //!     .process(&[], vec![NamedEntity::new(NamedEntityType::Organization, "Tribunal Supremo")])
    //!     .unwrap();
    //! assert_eq!(out.groups.len(), 1);
    //! ```
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::grouping::GroupingEngine;
    pub use crate::lang::Language;
    pub use crate::pipeline::{DocumentGroups, DocumentPipeline};
    pub use crate::reference::ReferenceResolver;
    pub use crate::store::{GroupStore, InMemoryGroupStore, JsonLinesGroupStore};
    pub use lexner_core::{NamedEntity, NamedEntityGroup, NamedEntityType, Segment};
}

// Re-exports
pub use config::{Config, SegmentTypes};
pub use document_code::DocumentCodeExtractor;
pub use error::{Error, Result};
pub use grouping::{GroupedEntities, GroupingConfig, GroupingEngine};
pub use lang::Language;
pub use lexner_core::{
    BoundingBox, EntityRecord, GroupOrigin, GroupRecord, NamedEntity, NamedEntityGroup,
    NamedEntityType, Segment, DEFAULT_SEGMENT_TYPE, DEFAULT_SOURCE_ID,
};
pub use normalize::Normalizer;
pub use offset::CharOffsets;
pub use pipeline::{DocumentGroups, DocumentPipeline};
pub use reference::{ReferenceConfig, ReferenceResolver};
pub use scoring::{RelevanceScorer, ScoringConfig};
pub use similarity::{MatchRule, SimilarityConfig, SimilarityEngine};
pub use store::{GroupStore, InMemoryGroupStore, JsonLinesGroupStore};
