//! One-document orchestration.
//!
//! ```text
//! store.load_groups(scope)
//!     ├─ destinations ──► ReferenceResolver ──► markers + pointers ─┐
//!     └─ other groups ──► GroupingEngine ◄── caller entities ◄──────┘
//!                              │
//!                              ▼
//!            store.save_destinations / store.save  ──► DocumentGroups
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lexner::pipeline::DocumentPipeline;
//! use lexner::store::InMemoryGroupStore;
//! use lexner_core::{NamedEntity, NamedEntityType, Segment};
//!
//! let pipeline = DocumentPipeline::new("docs", Arc::new(InMemoryGroupStore::new())).unwrap();
//! let segments = vec![
//!     Segment::new("4. Results Interpretation", "Title"),
//!     Segment::from_text(r#"This expands on "Results Interpretation" from Document 1."#),
//! ];
//! let entities = vec![NamedEntity::new(NamedEntityType::Person, "María Diaz").in_segment(1)];
//!
//! let out = pipeline.process(&segments, entities).unwrap();
//! assert!(out.group_by_name(NamedEntityType::ReferencePointer, "4. Results Interpretation").is_some());
//! assert!(out.degraded.is_none());
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use lexner_core::{GroupOrigin, GroupRecord, NamedEntity, NamedEntityGroup, NamedEntityType, Segment};
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::grouping::GroupingEngine;
use crate::reference::{is_destination_record, ReferenceResolver};
use crate::store::{validate_scope, GroupStore, InMemoryGroupStore};

/// Result of processing one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentGroups {
    /// Caller entities, then title markers, then pointers (uncited markers removed).
    pub entities: Vec<NamedEntity>,
    /// Groups in creation order; members index into `entities`.
    pub groups: Vec<NamedEntityGroup>,
    /// Destinations cited by a pointer in this document, prior ones first.
    pub destinations: Vec<NamedEntityGroup>,
    /// Uncited title markers removed from the output.
    pub dropped_markers: usize,
    /// Set when the store failed and the document was grouped without it.
    pub degraded: Option<String>,
    /// Segments of the document, for record export.
    pub segments: Vec<Segment>,
}

#[derive(Serialize)]
struct DocumentGroupsJson<'a> {
    entities: &'a [NamedEntity],
    groups: Vec<GroupRecord>,
    destinations: Vec<GroupRecord>,
    dropped_markers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    degraded: Option<&'a str>,
}

impl DocumentGroups {
    /// First group with this type and display name.
    #[must_use]
    pub fn group_by_name(&self, entity_type: NamedEntityType, name: &str) -> Option<&NamedEntityGroup> {
        self.groups
            .iter()
            .find(|g| g.entity_type == entity_type && g.name == name)
    }

    /// Member entities of a group.
    pub fn members<'a>(&'a self, group: &'a NamedEntityGroup) -> impl Iterator<Item = &'a NamedEntity> + 'a {
        group.members.iter().filter_map(|&idx| self.entities.get(idx))
    }

    /// Whether the store failed during processing.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    /// Output groups as detached records.
    #[must_use]
    pub fn to_records(&self) -> Vec<GroupRecord> {
        self.groups
            .iter()
            .map(|g| g.to_record(&self.entities, &self.segments))
            .collect()
    }

    /// Destinations as records, each holding its exemplar.
    #[must_use]
    pub fn destination_records(&self) -> Vec<GroupRecord> {
        self.destinations
            .iter()
            .map(|d| GroupRecord {
                entity_type: d.entity_type,
                name: d.name.clone(),
                entities: vec![d.top_relevance_entity.clone()],
                top_relevance_entity: d.top_relevance_entity.clone(),
                segment: d
                    .segment
                    .and_then(|idx| self.segments.get(idx))
                    .or(d.top_relevance_entity.segment.as_ref())
                    .cloned(),
            })
            .collect()
    }

    /// Pretty JSON of entities, group records and destinations.
    pub fn to_json(&self) -> Result<String> {
        let json = DocumentGroupsJson {
            entities: &self.entities,
            groups: self.to_records(),
            destinations: self.destination_records(),
            dropped_markers: self.dropped_markers,
            degraded: self.degraded.as_deref(),
        };
        Ok(serde_json::to_string_pretty(&json)?)
    }
}

/// Groups documents of one scope against a shared store.
#[derive(Clone)]
pub struct DocumentPipeline {
    config: Config,
    scope: String,
    store: Arc<dyn GroupStore>,
}

impl std::fmt::Debug for DocumentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentPipeline")
            .field("config", &self.config)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl DocumentPipeline {
    /// Pipeline with default configuration.
    pub fn new(scope: impl Into<String>, store: Arc<dyn GroupStore>) -> Result<Self> {
        let scope = scope.into();
        validate_scope(&scope)?;
        Ok(Self {
            config: Config::default(),
            scope,
            store,
        })
    }

    /// Pipeline backed by a fresh in-memory store.
    pub fn in_memory(scope: impl Into<String>) -> Result<Self> {
        Self::new(scope, Arc::new(InMemoryGroupStore::new()))
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scope name.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Shared store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn GroupStore> {
        &self.store
    }

    /// Resolve references and group one document.
    ///
    /// Entity `segment` fields must index into `segments`.
    pub fn process(&self, segments: &[Segment], entities: Vec<NamedEntity>) -> Result<DocumentGroups> {
        if let Some(bad) = entities
            .iter()
            .find(|e| e.segment.is_some_and(|idx| idx >= segments.len()))
        {
            return Err(Error::invalid_input(format!(
                "entity '{}' points at segment {:?} of {}",
                bad.text,
                bad.segment,
                segments.len()
            )));
        }

        let mut degraded = None;
        let prior = match self.store.load_groups(&self.scope) {
            Ok(records) => records,
            Err(e) => {
                self.degrade(e, &mut degraded)?;
                Vec::new()
            }
        };
        let (prior_destinations, prior_groups): (Vec<_>, Vec<_>) =
            prior.into_iter().partition(is_destination_record);

        let caller_entities = entities.len();
        let mut resolver =
            ReferenceResolver::from_config(&self.config).with_prior_destinations(prior_destinations);
        let mut batch = entities;
        batch.extend(resolver.resolve(segments));
        let reference_entities = batch.len() - caller_entities;

        let grouped = GroupingEngine::from_config(&self.config)
            .with_prior_groups(prior_groups)
            .group(batch, segments);

        if degraded.is_none() {
            if let Err(e) = self.persist(&resolver, &grouped.groups, &grouped.entities, segments) {
                self.degrade(e, &mut degraded)?;
            }
        }

        let cited: HashSet<&str> = grouped
            .groups
            .iter()
            .filter(|g| g.entity_type == NamedEntityType::ReferencePointer)
            .map(|g| g.name.as_str())
            .collect();
        let destinations: Vec<NamedEntityGroup> = resolver
            .destinations()
            .iter()
            .filter(|d| cited.contains(d.name.as_str()))
            .cloned()
            .collect();

        log::info!(
            "[pipeline] scope '{}': {} entities ({} from references) -> {} groups, {} cited destinations, {} uncited markers dropped{}",
            self.scope,
            grouped.entities.len(),
            reference_entities,
            grouped.groups.len(),
            destinations.len(),
            grouped.dropped_markers,
            if degraded.is_some() { " [degraded]" } else { "" }
        );

        Ok(DocumentGroups {
            entities: grouped.entities,
            groups: grouped.groups,
            destinations,
            dropped_markers: grouped.dropped_markers,
            degraded,
            segments: segments.to_vec(),
        })
    }

    fn persist(
        &self,
        resolver: &ReferenceResolver,
        groups: &[NamedEntityGroup],
        entities: &[NamedEntity],
        segments: &[Segment],
    ) -> Result<()> {
        let destinations = resolver.new_destination_records(segments);
        if !destinations.is_empty() {
            self.store.save_destinations(&self.scope, &destinations)?;
        }
        for group in groups {
            if group.origin == GroupOrigin::Batch && self.config.persist_types.contains(&group.entity_type) {
                self.store
                    .save(&self.scope, &group.to_record(entities, segments))?;
            }
        }
        Ok(())
    }

    /// Fail, or record the failure and carry on when degraded mode is allowed.
    fn degrade(&self, error: Error, degraded: &mut Option<String>) -> Result<()> {
        if !self.config.allow_degraded {
            return Err(error);
        }
        log::warn!(
            "[pipeline] scope '{}': continuing without store: {}",
            self.scope,
            error
        );
        degraded.get_or_insert_with(|| error.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    impl GroupStore for FailingStore {
        fn load_groups(&self, _scope: &str) -> Result<Vec<GroupRecord>> {
            Err(Error::store_unavailable("connection refused"))
        }

        fn save(&self, _scope: &str, _group: &GroupRecord) -> Result<()> {
            Err(Error::store_unavailable("connection refused"))
        }
    }

    fn person(text: &str) -> NamedEntity {
        NamedEntity::new(NamedEntityType::Person, text)
    }

    #[test]
    fn test_invalid_scope() {
        assert!(DocumentPipeline::in_memory("bad scope").is_err());
    }

    #[test]
    fn test_segment_out_of_range() {
        let pipeline = DocumentPipeline::in_memory("docs").unwrap();
        let result = pipeline.process(&[], vec![person("Ana Ruiz").in_segment(0)]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_store_failure_is_hard_error_by_default() {
        let pipeline = DocumentPipeline::new("docs", Arc::new(FailingStore)).unwrap();
        assert!(matches!(
            pipeline.process(&[], vec![person("Ana Ruiz")]),
            Err(Error::StoreUnavailable(_))
        ));
    }

    #[test]
    fn test_degraded_mode() {
        let pipeline = DocumentPipeline::new("docs", Arc::new(FailingStore))
            .unwrap()
            .with_config(Config::default().with_allow_degraded(true));
        let out = pipeline
            .process(&[], vec![person("Ana Ruiz"), person("Ana Ruíz")])
            .unwrap();
        assert!(out.is_degraded());
        assert!(out.degraded.as_deref().unwrap().contains("connection refused"));
        assert_eq!(out.groups.len(), 1);
    }

    #[test]
    fn test_persist_types_only() {
        let store = Arc::new(InMemoryGroupStore::new());
        let pipeline = DocumentPipeline::new("docs", store.clone())
            .unwrap()
            .with_config(Config::default().with_persist_types([NamedEntityType::Person]));
        let entities = vec![
            person("Ana Ruiz"),
            NamedEntity::new(NamedEntityType::Organization, "Tribunal Supremo"),
        ];
        pipeline.process(&[], entities).unwrap();

        let saved = store.load_groups("docs").unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].entity_type, NamedEntityType::Person);
    }

    #[test]
    fn test_to_json() {
        let pipeline = DocumentPipeline::in_memory("docs").unwrap();
        let out = pipeline.process(&[], vec![person("Ana Ruiz")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out.to_json().unwrap()).unwrap();
        assert_eq!(value["groups"][0]["name"], "Ana Ruiz");
        assert_eq!(value["groups"][0]["type"], "PERSON");
        assert_eq!(value["dropped_markers"], 0);
        assert!(value.get("degraded").is_none());
    }
}
