//! # lexner-core
//!
//! Core types for lexner: shared data structures used by the grouping engine
//! and by anything that stores or renders its output.
//!
//! This crate provides:
//! - **Entity types**: `NamedEntityType`, `NamedEntity`
//! - **Layout**: `Segment`, `BoundingBox`
//! - **Groups**: `NamedEntityGroup`, `GroupOrigin`
//! - **Records**: `EntityRecord`, `GroupRecord` (detached, serializable)

pub mod entity;
pub mod error;
pub mod group;
pub mod record;
pub mod segment;

// Re-exports for convenience
pub use entity::{NamedEntity, NamedEntityType};
pub use error::{Error, Result};
pub use group::{GroupOrigin, NamedEntityGroup};
pub use record::{EntityRecord, GroupRecord};
pub use segment::{BoundingBox, Segment, DEFAULT_SEGMENT_TYPE, DEFAULT_SOURCE_ID};
