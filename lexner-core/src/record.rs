//! Flat, self-contained records for persistence and output.
//!
//! In-batch structures refer to each other by index. Records resolve those
//! indices into embedded copies so they can leave the batch: they are what
//! a group store writes and what a caller serializes to JSON.

use serde::{Deserialize, Serialize};

use crate::entity::{NamedEntity, NamedEntityType};
use crate::segment::Segment;

/// A detached entity with its segment embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Entity type.
    #[serde(rename = "type")]
    pub entity_type: NamedEntityType,
    /// Raw surface text.
    pub text: String,
    /// Canonical text.
    #[serde(default)]
    pub normalized_text: String,
    /// Start character offset.
    #[serde(default)]
    pub character_start: usize,
    /// End character offset.
    #[serde(default)]
    pub character_end: usize,
    /// Group key.
    #[serde(default)]
    pub group_name: String,
    /// Copy of the owning segment.
    #[serde(default)]
    pub segment: Option<Segment>,
    /// Number of other same-type mentions with the same text.
    #[serde(default)]
    pub appearance_count: usize,
    /// Share of the segment text covered (0-100).
    #[serde(default)]
    pub percentage_to_segment_text: u32,
    /// First of its type in the batch.
    #[serde(default)]
    pub first_type_appearance: bool,
    /// Last of its type in the batch.
    #[serde(default)]
    pub last_type_appearance: bool,
    /// Relevance score.
    #[serde(default)]
    pub relevance_percentage: u32,
}

impl EntityRecord {
    /// Snapshot an entity, embedding the segment it points at.
    ///
    /// An out-of-range segment index yields a record without a segment.
    #[must_use]
    pub fn from_entity(entity: &NamedEntity, segments: &[Segment]) -> Self {
        Self {
            entity_type: entity.entity_type,
            text: entity.text.clone(),
            normalized_text: entity.normalized_text.clone(),
            character_start: entity.character_start,
            character_end: entity.character_end,
            group_name: entity.group_name.clone(),
            segment: entity.segment.and_then(|idx| segments.get(idx)).cloned(),
            appearance_count: entity.appearance_count,
            percentage_to_segment_text: entity.percentage_to_segment_text,
            first_type_appearance: entity.first_type_appearance,
            last_type_appearance: entity.last_type_appearance,
            relevance_percentage: entity.relevance_percentage,
        }
    }

    /// Rebuild an in-batch entity. The segment link is dropped because a
    /// record's segment is not part of the current batch.
    #[must_use]
    pub fn to_entity(&self) -> NamedEntity {
        NamedEntity {
            entity_type: self.entity_type,
            text: self.text.clone(),
            normalized_text: self.normalized_text.clone(),
            character_start: self.character_start,
            character_end: self.character_end,
            group_name: self.group_name.clone(),
            segment: None,
            appearance_count: self.appearance_count,
            percentage_to_segment_text: self.percentage_to_segment_text,
            first_type_appearance: self.first_type_appearance,
            last_type_appearance: self.last_type_appearance,
            relevance_percentage: self.relevance_percentage,
        }
    }
}

/// A detached group: type, display name, members and exemplar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Group type.
    #[serde(rename = "type")]
    pub entity_type: NamedEntityType,
    /// Display name, also the group key.
    pub name: String,
    /// Members in insertion order.
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
    /// Highest-relevance member seen so far.
    pub top_relevance_entity: EntityRecord,
    /// Title location for reference destinations.
    #[serde(default)]
    pub segment: Option<Segment>,
}

impl GroupRecord {
    /// Relevance of the exemplar.
    #[must_use]
    pub fn top_relevance(&self) -> u32 {
        self.top_relevance_entity.relevance_percentage
    }
}
