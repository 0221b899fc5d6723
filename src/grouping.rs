//! Batch entity grouping.
//!
//! # Algorithm
//!
//! ```text
//! entities ──► phase A: score whole batch
//!          ──► phase B: for each entity, in order
//!                 normalize
//!                 ├─ matches a prior group?   promote it, entity is its member
//!                 ├─ matches an active group? append (first in creation order)
//!                 └─ otherwise                new group
//!          ──► post-pass: drop uncited title markers
//! ```
//!
//! Identity types match through [`SimilarityEngine`]; the reference family
//! matches only by exact key (`group_name` if bound, else text).
//!
//! # Example
//!
//! ```rust
//! use lexner::grouping::GroupingEngine;
//! use lexner_core::{NamedEntity, NamedEntityType, Segment};
//!
//! let entities = vec![
//!     NamedEntity::new(NamedEntityType::Person, "M. Diaz"),
//!     NamedEntity::new(NamedEntityType::Person, "María Diaz"),
//!     NamedEntity::new(NamedEntityType::Person, "María D."),
//! ];
//! let grouped = GroupingEngine::default().group(entities, &[]);
//!
//! assert_eq!(grouped.groups.len(), 1);
//! assert_eq!(grouped.groups[0].name, "María Diaz");
//! ```

use std::collections::{HashMap, HashSet};

use lexner_core::{
    EntityRecord, GroupOrigin, GroupRecord, NamedEntity, NamedEntityGroup, NamedEntityType,
    Segment,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::normalize::Normalizer;
use crate::scoring::RelevanceScorer;
use crate::similarity::{GroupProfile, SimilarityEngine};

/// Group naming options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Length difference (chars) within which a comma decides the display name.
    pub comma_window: usize,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self { comma_window: 1 }
    }
}

/// Pick the display name for a PERSON/ORGANIZATION/LOCATION group.
///
/// Longer wins. When lengths are within `comma_window`, a name with a comma
/// ("Diaz, Maria") beats one without.
///
/// ```rust
/// use lexner::grouping::choose_display_name;
///
/// assert_eq!(choose_display_name("M. Diaz", "María Diaz", 1), "María Diaz");
/// assert_eq!(choose_display_name("Maria Diaz", "Diaz, Maria", 1), "Diaz, Maria");
/// assert_eq!(choose_display_name("Diaz, Maria", "Maria Diaz", 1), "Diaz, Maria");
/// ```
#[must_use]
pub fn choose_display_name<'a>(current: &'a str, candidate: &'a str, comma_window: usize) -> &'a str {
    let current_len = current.chars().count();
    let candidate_len = candidate.chars().count();

    if current_len.abs_diff(candidate_len) <= comma_window {
        match (current.contains(','), candidate.contains(',')) {
            (false, true) => return candidate,
            (true, false) => return current,
            _ => {}
        }
    }

    if candidate_len > current_len {
        candidate
    } else {
        current
    }
}

/// Key a reference-family entity groups under.
#[must_use]
pub fn reference_key(entity: &NamedEntity) -> &str {
    if entity.group_name.is_empty() {
        &entity.text
    } else {
        &entity.group_name
    }
}

#[derive(Debug, Clone)]
struct PriorGroup {
    record: GroupRecord,
    profile: GroupProfile,
}

#[derive(Debug, Clone)]
struct ActiveGroup {
    group: NamedEntityGroup,
    profile: GroupProfile,
}

/// Output of one grouping batch.
#[derive(Debug, Clone, Default)]
pub struct GroupedEntities {
    /// Entities in input order, minus dropped title markers.
    pub entities: Vec<NamedEntity>,
    /// Groups in creation order. Members index into `entities`.
    pub groups: Vec<NamedEntityGroup>,
    /// Uncited title markers removed by the post-pass.
    pub dropped_markers: usize,
}

impl GroupedEntities {
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

    /// Detach every group into a record.
    #[must_use]
    pub fn to_records(&self, segments: &[Segment]) -> Vec<GroupRecord> {
        self.groups
            .iter()
            .map(|g| g.to_record(&self.entities, segments))
            .collect()
    }
}

/// Stateful grouping of one batch.
///
/// Prior groups come from earlier sessions (see [`crate::store`]); a prior
/// group is promoted the first time one of this batch's entities matches it.
#[derive(Debug, Clone, Default)]
pub struct GroupingEngine {
    normalizer: Normalizer,
    similarity: SimilarityEngine,
    scorer: RelevanceScorer,
    config: GroupingConfig,
    prior_groups: Vec<PriorGroup>,
    active: Vec<ActiveGroup>,
    index: HashMap<(NamedEntityType, String), usize>,
}

impl GroupingEngine {
    /// Create an engine from its parts.
    #[must_use]
    pub fn new(
        normalizer: Normalizer,
        similarity: SimilarityEngine,
        scorer: RelevanceScorer,
        config: GroupingConfig,
    ) -> Self {
        Self {
            normalizer,
            similarity,
            scorer,
            config,
            prior_groups: Vec::new(),
            active: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create an engine from pipeline configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Normalizer::new(config.language),
            SimilarityEngine::new(config.similarity.clone()),
            RelevanceScorer::new(config.scoring.clone(), config.segment_types.clone()),
            config.grouping.clone(),
        )
    }

    /// Seed groups from earlier sessions, most relevant first.
    #[must_use]
    pub fn with_prior_groups(mut self, records: impl IntoIterator<Item = GroupRecord>) -> Self {
        let mut priors: Vec<PriorGroup> = records
            .into_iter()
            .map(|record| {
                let top = &record.top_relevance_entity;
                let representative = if top.normalized_text.is_empty() {
                    self.normalizer.canonical_form(top.entity_type, &top.text)
                } else {
                    top.normalized_text.clone()
                };
                let profile = GroupProfile::new(
                    self.normalizer.canonical_form(record.entity_type, &record.name),
                    representative,
                );
                PriorGroup { record, profile }
            })
            .collect();
        priors.extend(std::mem::take(&mut self.prior_groups));
        priors.sort_by(|a, b| b.record.top_relevance().cmp(&a.record.top_relevance()));
        self.prior_groups = priors;
        self
    }

    /// Number of prior groups not yet promoted.
    #[must_use]
    pub fn pending_prior_groups(&self) -> usize {
        self.prior_groups.len()
    }

    /// Group a batch. Entity `segment` fields index into `segments`.
    #[must_use]
    pub fn group(mut self, mut entities: Vec<NamedEntity>, segments: &[Segment]) -> GroupedEntities {
        self.scorer.score_batch(&mut entities, segments);

        for idx in 0..entities.len() {
            let normalized_ok = self.normalize_entity(&mut entities[idx]);

            if self.try_assign_to_prior(idx, &mut entities, segments) {
                continue;
            }
            if self.try_assign_to_active(idx, &mut entities, segments, normalized_ok) {
                continue;
            }
            self.create_group(idx, &mut entities, segments);
        }

        let mut grouped = GroupedEntities {
            entities,
            groups: self.active.into_iter().map(|a| a.group).collect(),
            dropped_markers: 0,
        };
        drop_uncited_markers(&mut grouped);

        log::debug!(
            "[grouping] {} entities -> {} groups ({} uncited markers dropped)",
            grouped.entities.len(),
            grouped.groups.len(),
            grouped.dropped_markers
        );
        grouped
    }

    fn normalize_entity(&self, entity: &mut NamedEntity) -> bool {
        match self.normalizer.try_normalize(entity) {
            Ok(normalized) => {
                entity.normalized_text = normalized;
                true
            }
            Err(e) => {
                log::warn!("[grouping] {}", e);
                entity.normalized_text = entity.text.clone();
                false
            }
        }
    }

    fn entity_matches(&self, group_type: NamedEntityType, name: &str, profile: &GroupProfile, entity: &NamedEntity) -> bool {
        if entity.entity_type != group_type {
            return false;
        }
        if group_type.is_reference_family() {
            return name == reference_key(entity);
        }
        self.similarity.matches(group_type, profile, entity)
    }

    fn try_assign_to_prior(
        &mut self,
        idx: usize,
        entities: &mut [NamedEntity],
        segments: &[Segment],
    ) -> bool {
        let entity = &entities[idx];
        let Some(pos) = self.prior_groups.iter().position(|p| {
            self.entity_matches(p.record.entity_type, &p.record.name, &p.profile, entity)
        }) else {
            return false;
        };

        let PriorGroup { record, mut profile } = self.prior_groups.remove(pos);
        let entity = &mut entities[idx];
        entity.group_name = record.name.clone();
        profile.member_forms.push(entity.normalized_text.clone());

        let top_relevance_entity = if entity.relevance_percentage > record.top_relevance() {
            EntityRecord::from_entity(entity, segments)
        } else {
            record.top_relevance_entity
        };

        log::debug!(
            "[grouping] promoted prior {} group '{}'",
            record.entity_type,
            record.name
        );

        let group = NamedEntityGroup {
            entity_type: record.entity_type,
            name: record.name,
            members: vec![idx],
            top_relevance_entity,
            segment: None,
            origin: GroupOrigin::Prior,
        };
        self.push_active(group, profile);
        true
    }

    fn try_assign_to_active(
        &mut self,
        idx: usize,
        entities: &mut [NamedEntity],
        segments: &[Segment],
        normalized_ok: bool,
    ) -> bool {
        let entity = &entities[idx];
        let found = if entity.entity_type.is_reference_family() {
            self.index
                .get(&(entity.entity_type, reference_key(entity).to_string()))
                .copied()
        } else {
            self.active.iter().position(|a| {
                self.entity_matches(a.group.entity_type, &a.group.name, &a.profile, entity)
            })
        };
        let Some(group_idx) = found else {
            return false;
        };

        if let Some(better) = self.better_name(group_idx, &entities[idx], normalized_ok) {
            self.rename(group_idx, better, entities);
        }

        let entity = &mut entities[idx];
        let active = &mut self.active[group_idx];
        entity.group_name = active.group.name.clone();
        active.profile.member_forms.push(entity.normalized_text.clone());
        active.group.members.push(idx);
        if entity.relevance_percentage > active.group.top_relevance_entity.relevance_percentage {
            active.group.top_relevance_entity = EntityRecord::from_entity(entity, segments);
        }
        true
    }

    fn better_name(&self, group_idx: usize, entity: &NamedEntity, normalized_ok: bool) -> Option<String> {
        let current = self.active[group_idx].group.name.as_str();
        let candidate = match entity.entity_type {
            NamedEntityType::Person | NamedEntityType::Organization | NamedEntityType::Location => {
                choose_display_name(current, &entity.text, self.config.comma_window)
            }
            NamedEntityType::Date if normalized_ok => entity.normalized_text.as_str(),
            _ => current,
        };
        (candidate != current).then(|| candidate.to_string())
    }

    fn rename(&mut self, group_idx: usize, new_name: String, entities: &mut [NamedEntity]) {
        let entity_type = self.active[group_idx].group.entity_type;
        let old_name = std::mem::replace(&mut self.active[group_idx].group.name, new_name.clone());

        let old_key = (entity_type, old_name.clone());
        if self.index.get(&old_key) == Some(&group_idx) {
            self.index.remove(&old_key);
        }
        self.index.entry((entity_type, new_name.clone())).or_insert(group_idx);

        let active = &mut self.active[group_idx];
        active.profile.name_form = self.normalizer.canonical_form(entity_type, &new_name);
        active.group.top_relevance_entity.group_name = new_name.clone();
        for &member in &active.group.members {
            if let Some(e) = entities.get_mut(member) {
                e.group_name = new_name.clone();
            }
        }

        log::debug!("[grouping] renamed {} group '{}' -> '{}'", entity_type, old_name, new_name);
    }

    fn create_group(&mut self, idx: usize, entities: &mut [NamedEntity], segments: &[Segment]) {
        let entity = &mut entities[idx];
        let key = match entity.entity_type {
            NamedEntityType::Date => entity.normalized_text.clone(),
            t if t.is_reference_family() => reference_key(entity).to_string(),
            _ => entity.text.clone(),
        };
        entity.group_name = key.clone();

        let segment = if entity.entity_type.is_reference_family() {
            entity.segment
        } else {
            None
        };
        let profile = GroupProfile::new(
            self.normalizer.canonical_form(entity.entity_type, &key),
            entity.normalized_text.clone(),
        );
        let group = NamedEntityGroup {
            entity_type: entity.entity_type,
            name: key,
            members: vec![idx],
            top_relevance_entity: EntityRecord::from_entity(entity, segments),
            segment,
            origin: GroupOrigin::Batch,
        };

        log::debug!("[grouping] new {} group '{}'", group.entity_type, group.name);
        self.push_active(group, profile);
    }

    fn push_active(&mut self, group: NamedEntityGroup, profile: GroupProfile) {
        let group_idx = self.active.len();
        self.index
            .entry((group.entity_type, group.name.clone()))
            .or_insert(group_idx);
        self.active.push(ActiveGroup { group, profile });
    }
}

/// Remove REFERENCE groups that hold only a title marker nobody cites.
fn drop_uncited_markers(grouped: &mut GroupedEntities) {
    let cited: HashSet<String> = grouped
        .groups
        .iter()
        .filter(|g| g.entity_type == NamedEntityType::ReferencePointer)
        .map(|g| g.name.clone())
        .collect();

    let entities = &grouped.entities;
    let mut dropped = HashSet::new();
    grouped.groups.retain(|group| {
        let lone_marker = group.entity_type == NamedEntityType::Reference
            && group.members.len() == 1
            && entities
                .get(group.members[0])
                .is_some_and(|e| e.relevance_percentage == 100);
        if lone_marker && !cited.contains(&group.name) {
            dropped.insert(group.members[0]);
            false
        } else {
            true
        }
    });

    if dropped.is_empty() {
        return;
    }

    // old index -> new index
    let mut remap = vec![None; grouped.entities.len()];
    let mut next = 0;
    for (old, slot) in remap.iter_mut().enumerate() {
        if !dropped.contains(&old) {
            *slot = Some(next);
            next += 1;
        }
    }

    let mut old_idx = 0;
    grouped.entities.retain(|_| {
        let keep = !dropped.contains(&old_idx);
        old_idx += 1;
        keep
    });
    for group in &mut grouped.groups {
        group.members = group.members.iter().filter_map(|&m| remap[m]).collect();
    }
    grouped.dropped_markers = dropped.len();
}
