//! Relevance scoring (phase A of grouping).
//!
//! Needs the whole batch: appearance counts and first/last flags are
//! relative to every other mention.
//!
//! ```text
//! REFERENCE:  100 if in a title-like segment, else 0
//! otherwise:  round(coverage / 10)
//!           + 15 if first of its type   + 15 if last of its type
//!           + 60 title-like | + 30 page header | + 15 text
//! ```

use std::collections::HashMap;

use lexner_core::{NamedEntity, NamedEntityType, Segment};
use serde::{Deserialize, Serialize};

use crate::config::SegmentTypes;

/// Score weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points for covering the whole segment (scaled by coverage).
    pub coverage_weight: u32,
    /// Bonus for the first mention of a type.
    pub first_appearance_bonus: u32,
    /// Bonus for the last mention of a type.
    pub last_appearance_bonus: u32,
    /// Bonus for mentions in title-like segments.
    pub title_bonus: u32,
    /// Bonus for mentions in page headers.
    pub page_header_bonus: u32,
    /// Bonus for mentions in running text.
    pub text_bonus: u32,
    /// Score of a REFERENCE mention in a title-like segment.
    pub reference_title_score: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            coverage_weight: 10,
            first_appearance_bonus: 15,
            last_appearance_bonus: 15,
            title_bonus: 60,
            page_header_bonus: 30,
            text_bonus: 15,
            reference_title_score: 100,
        }
    }
}

/// Computes score inputs and relevance for a batch.
#[derive(Debug, Clone, Default)]
pub struct RelevanceScorer {
    config: ScoringConfig,
    segment_types: SegmentTypes,
}

impl RelevanceScorer {
    /// Create a scorer.
    #[must_use]
    pub fn new(config: ScoringConfig, segment_types: SegmentTypes) -> Self {
        Self {
            config,
            segment_types,
        }
    }

    /// Fill score inputs and `relevance_percentage` for every entity.
    pub fn score_batch(&self, entities: &mut [NamedEntity], segments: &[Segment]) {
        fill_score_inputs(entities, segments);
        for entity in entities.iter_mut() {
            let segment = entity.segment.and_then(|idx| segments.get(idx));
            entity.relevance_percentage = self.score(entity, segment);
        }
    }

    /// Score one entity whose inputs are already filled.
    #[must_use]
    pub fn score(&self, entity: &NamedEntity, segment: Option<&Segment>) -> u32 {
        let is_title = segment.is_some_and(|s| self.segment_types.is_title(s));

        if entity.entity_type == NamedEntityType::Reference {
            return if is_title {
                self.config.reference_title_score
            } else {
                0
            };
        }

        let coverage = self.config.coverage_weight as f64 * entity.percentage_to_segment_text as f64;
        let mut score = (coverage / 100.0).round() as u32;
        if entity.first_type_appearance {
            score += self.config.first_appearance_bonus;
        }
        if entity.last_type_appearance {
            score += self.config.last_appearance_bonus;
        }
        if let Some(segment) = segment {
            if is_title {
                score += self.config.title_bonus;
            } else if self.segment_types.is_page_header(segment) {
                score += self.config.page_header_bonus;
            } else if self.segment_types.is_text(segment) {
                score += self.config.text_bonus;
            }
        }
        score
    }
}

/// Share of the segment covered by `text`, truncated and capped at 100.
#[must_use]
pub fn percentage_to_segment(text: &str, segment: Option<&Segment>) -> u32 {
    match segment {
        Some(s) if !s.text.is_empty() => {
            let pct = 100 * text.chars().count() / s.char_len();
            pct.min(100) as u32
        }
        _ => 0,
    }
}

/// Appearance counts, segment coverage and first/last flags.
pub fn fill_score_inputs(entities: &mut [NamedEntity], segments: &[Segment]) {
    let mut counts: HashMap<(NamedEntityType, String), usize> = HashMap::new();
    let mut first: HashMap<NamedEntityType, usize> = HashMap::new();
    let mut last: HashMap<NamedEntityType, usize> = HashMap::new();

    for (idx, entity) in entities.iter().enumerate() {
        *counts
            .entry((entity.entity_type, entity.text.clone()))
            .or_insert(0) += 1;
        first.entry(entity.entity_type).or_insert(idx);
        last.insert(entity.entity_type, idx);
    }

    for (idx, entity) in entities.iter_mut().enumerate() {
        let same = counts
            .get(&(entity.entity_type, entity.text.clone()))
            .copied()
            .unwrap_or(1);
        entity.appearance_count = same.saturating_sub(1);
        entity.percentage_to_segment_text =
            percentage_to_segment(&entity.text, entity.segment.and_then(|s| segments.get(s)));
        entity.first_type_appearance = first.get(&entity.entity_type) == Some(&idx);
        entity.last_type_appearance = last.get(&entity.entity_type) == Some(&idx);
    }
}
