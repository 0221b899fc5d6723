//! In-batch entity groups.

use serde::{Deserialize, Serialize};

use crate::entity::{NamedEntity, NamedEntityType};
use crate::record::{EntityRecord, GroupRecord};
use crate::segment::Segment;

/// Where a group came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrigin {
    /// Created from a mention of the current batch.
    #[default]
    Batch,
    /// Promoted from a group persisted by an earlier session.
    Prior,
}

/// A set of mentions believed to denote one real-world entity.
///
/// Members are indices into the batch entity list, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntityGroup {
    /// Type shared by every member.
    #[serde(rename = "type")]
    pub entity_type: NamedEntityType,
    /// Canonical display text and group key.
    pub name: String,
    /// Member entity indices.
    pub members: Vec<usize>,
    /// Highest-relevance member, snapshotted so prior exemplars survive.
    pub top_relevance_entity: EntityRecord,
    /// Title location (reference destinations and markers).
    #[serde(default)]
    pub segment: Option<usize>,
    /// Batch or prior session.
    #[serde(default)]
    pub origin: GroupOrigin,
}

impl NamedEntityGroup {
    /// Number of current-batch members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the group has no current-batch members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Detach into a persistable record.
    #[must_use]
    pub fn to_record(&self, entities: &[NamedEntity], segments: &[Segment]) -> GroupRecord {
        GroupRecord {
            entity_type: self.entity_type,
            name: self.name.clone(),
            entities: self
                .members
                .iter()
                .filter_map(|&idx| entities.get(idx))
                .map(|e| EntityRecord::from_entity(e, segments))
                .collect(),
            top_relevance_entity: self.top_relevance_entity.clone(),
            segment: self.segment.and_then(|idx| segments.get(idx)).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_record_resolves_indices() {
        let segments = vec![Segment::new("4. Results", "Title")];
        let entities = vec![
            NamedEntity::new(NamedEntityType::Person, "Ana Ruiz"),
            NamedEntity::new(NamedEntityType::Person, "A. Ruiz"),
        ];
        let group = NamedEntityGroup {
            entity_type: NamedEntityType::Person,
            name: "Ana Ruiz".to_string(),
            members: vec![1, 0],
            top_relevance_entity: EntityRecord::from_entity(&entities[0], &segments),
            segment: Some(0),
            origin: GroupOrigin::Batch,
        };

        let record = group.to_record(&entities, &segments);
        let texts: Vec<&str> = record.entities.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["A. Ruiz", "Ana Ruiz"]);
        assert_eq!(record.segment.unwrap().text, "4. Results");
        assert_eq!(group.len(), 2);
    }
}
