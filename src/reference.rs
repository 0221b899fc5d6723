//! Cross-reference resolution.
//!
//! Title-like segments become citable *destinations*. Every other segment is
//! scanned for mentions of a destination's name; each hit is a
//! REFERENCE_POINTER bound to that destination.
//!
//! ```text
//! Title:  "4. Results Interpretation"           ─► destination
//! Text:   This expands on "Results Interpretation" from Document 1.
//!                         └──────── pointer ───────┘
//! ```
//!
//! A destination name is searched with these strategies, stopping at the
//! first that finds anything:
//!
//! 1. the full name, as a standalone token, optionally in one pair of quotes
//! 2. the name without its enumerator (`4.`, `II-`, `3.1:`)
//! 3. each half of a `"Part: Subtitle"` name

use std::collections::HashMap;
use std::ops::Range;

use lexner_core::{
    EntityRecord, GroupOrigin, GroupRecord, NamedEntity, NamedEntityGroup, NamedEntityType,
    Segment,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{Config, SegmentTypes};
use crate::offset::CharOffsets;

/// Shortest search pattern (chars) tried by default.
pub const DEFAULT_MIN_PATTERN_CHARS: usize = 3;

static ENUMERATOR_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]+(?:[.-][A-Za-z0-9]+)*[.,;:-]\s+").expect("valid regex")
});

/// Opening and closing quote characters that may wrap a pointer.
const QUOTE_PAIRS: &[(char, char)] = &[
    ('"', '"'),
    ('\'', '\''),
    ('“', '”'),
    ('‘', '’'),
    ('«', '»'),
];

fn is_quote(c: char) -> bool {
    QUOTE_PAIRS.iter().any(|&(open, close)| c == open || c == close)
}

fn is_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => c.is_whitespace() || is_quote(c),
    }
}

/// Pointer detection options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Patterns shorter than this (chars) are never searched.
    pub min_pattern_chars: usize,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            min_pattern_chars: DEFAULT_MIN_PATTERN_CHARS,
        }
    }
}

/// Collapse runs of whitespace and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Search strategies for a destination name, in order.
///
/// ```rust
/// use lexner::reference::search_strategies;
///
/// assert_eq!(
///     search_strategies("3. Phase 2: Analysis"),
///     vec![
///         vec!["3. Phase 2: Analysis"],
///         vec!["Phase 2: Analysis"],
///         vec!["3. Phase 2", "Analysis"],
///     ]
/// );
/// ```
#[must_use]
pub fn search_strategies(name: &str) -> Vec<Vec<&str>> {
    let name = name.trim();
    let mut strategies = vec![vec![name]];

    if let Some(prefix) = ENUMERATOR_PREFIX.find(name) {
        let rest = name[prefix.end()..].trim();
        if !rest.is_empty() {
            strategies.push(vec![rest]);
        }
    }

    if let Some((before, after)) = name.split_once(": ") {
        let halves: Vec<&str> = [before.trim(), after.trim()]
            .into_iter()
            .filter(|h| !h.is_empty())
            .collect();
        if !halves.is_empty() {
            strategies.push(halves);
        }
    }

    strategies
}

/// Standalone occurrences of `pattern` in `text`, as byte spans.
///
/// A match is standalone when its neighbours are absent, whitespace or
/// quotes. If it sits inside a matching quote pair the quotes are included.
/// A rejected hit resumes the search at the next char, so overlapping
/// occurrences are still seen.
fn find_standalone(pattern: &str, text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    if pattern.is_empty() {
        return spans;
    }

    let mut from = 0;
    while let Some(found) = text[from..].find(pattern) {
        let start = from + found;
        let end = start + pattern.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        if !is_boundary(before) || !is_boundary(after) {
            from = start + text[start..].chars().next().map_or(1, char::len_utf8);
            continue;
        }
        from = end;

        let quoted = match (before, after) {
            (Some(open), Some(close)) => QUOTE_PAIRS.contains(&(open, close)),
            _ => false,
        };
        match (quoted, before, after) {
            (true, Some(open), Some(close)) => {
                spans.push(start - open.len_utf8()..end + close.len_utf8());
            }
            _ => spans.push(start..end),
        }
    }
    spans
}

/// Character spans where `name` is cited in `text`, using the default
/// minimum pattern length.
///
/// ```rust
/// use lexner::reference::find_reference_spans;
///
/// let text = r#"This expands on "Results Interpretation" from Document 1."#;
/// assert_eq!(find_reference_spans("4. Results Interpretation", text), vec![(16, 40)]);
/// assert!(find_reference_spans("Section 1", "see Section 1.1").is_empty());
/// ```
#[must_use]
pub fn find_reference_spans(name: &str, text: &str) -> Vec<(usize, usize)> {
    find_reference_spans_with(name, text, DEFAULT_MIN_PATTERN_CHARS)
}

/// [`find_reference_spans`] with an explicit minimum pattern length.
#[must_use]
pub fn find_reference_spans_with(
    name: &str,
    text: &str,
    min_pattern_chars: usize,
) -> Vec<(usize, usize)> {
    if text.trim().is_empty() || name.trim().is_empty() {
        return Vec::new();
    }

    let offsets = CharOffsets::new(text);
    for patterns in search_strategies(name) {
        let mut spans: Vec<(usize, usize)> = patterns
            .iter()
            .filter(|p| p.chars().count() >= min_pattern_chars)
            .flat_map(|p| find_standalone(p, text))
            .map(|bytes| offsets.char_span(bytes))
            .collect();
        if !spans.is_empty() {
            spans.sort_unstable();
            spans.dedup();
            return spans;
        }
    }
    Vec::new()
}

/// A candidate pointer span inside one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerCandidate {
    /// Start character offset.
    pub start: usize,
    /// End character offset.
    pub end: usize,
    /// Name of the cited destination.
    pub destination: String,
}

impl PointerCandidate {
    fn len(&self) -> usize {
        self.end - self.start
    }

    fn overlaps(&self, other: &PointerCandidate) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Resolve overlapping candidates: longer wins, ties go to the earlier span.
/// Output is ordered by start offset.
#[must_use]
pub fn dedup_overlapping(mut candidates: Vec<PointerCandidate>) -> Vec<PointerCandidate> {
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.start.cmp(&b.start)));

    let mut kept: Vec<PointerCandidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !kept.iter().any(|k| k.overlaps(&candidate)) {
            kept.push(candidate);
        }
    }
    kept.sort_by_key(|c| c.start);
    kept
}

/// Whether a stored record describes a citable destination.
///
/// True for REFERENCE_DESTINATION records, and for REFERENCE records whose
/// exemplar scored 100 (title markers written by older stores).
#[must_use]
pub fn is_destination_record(record: &GroupRecord) -> bool {
    match record.entity_type {
        NamedEntityType::ReferenceDestination => true,
        NamedEntityType::Reference => record.top_relevance() == 100,
        _ => false,
    }
}

/// Registers destinations and detects pointers for one document.
#[derive(Debug, Clone, Default)]
pub struct ReferenceResolver {
    config: ReferenceConfig,
    segment_types: SegmentTypes,
    destinations: Vec<NamedEntityGroup>,
    /// Destination name to its index in `destinations`.
    names: HashMap<String, usize>,
}

impl ReferenceResolver {
    /// Create a resolver.
    #[must_use]
    pub fn new(config: ReferenceConfig, segment_types: SegmentTypes) -> Self {
        Self {
            config,
            segment_types,
            destinations: Vec::new(),
            names: HashMap::new(),
        }
    }

    /// Create a resolver from pipeline configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.reference.clone(), config.segment_types.clone())
    }

    /// Add destinations persisted by earlier documents.
    ///
    /// Records failing [`is_destination_record`] are ignored.
    #[must_use]
    pub fn with_prior_destinations(mut self, records: impl IntoIterator<Item = GroupRecord>) -> Self {
        for record in records {
            if !is_destination_record(&record) {
                continue;
            }

            let name = normalize_whitespace(&record.name);
            if name.is_empty() || self.names.contains_key(&name) {
                continue;
            }
            self.names.insert(name.clone(), self.destinations.len());
            let mut top = record.top_relevance_entity;
            top.entity_type = NamedEntityType::ReferenceDestination;
            self.destinations.push(NamedEntityGroup {
                entity_type: NamedEntityType::ReferenceDestination,
                name,
                members: Vec::new(),
                top_relevance_entity: top,
                segment: None,
                origin: GroupOrigin::Prior,
            });
        }
        self
    }

    /// Known destinations, prior ones first.
    #[must_use]
    pub fn destinations(&self) -> &[NamedEntityGroup] {
        &self.destinations
    }

    /// Turn title-like segments into destinations.
    ///
    /// Returns one REFERENCE marker entity per distinct title. A title naming
    /// a prior destination reuses it: the destination is bound to the title
    /// segment and stays prior, so it is not persisted again.
    pub fn register_destinations(&mut self, segments: &[Segment]) -> Vec<NamedEntity> {
        let mut markers = Vec::new();
        for (idx, segment) in segments.iter().enumerate() {
            if !self.segment_types.is_title(segment) || segment.is_blank() {
                continue;
            }
            let name = normalize_whitespace(&segment.text);
            let known = self.names.get(&name).copied();
            if let Some(existing) = known {
                let destination = &self.destinations[existing];
                if destination.origin != GroupOrigin::Prior || destination.segment.is_some() {
                    continue;
                }
            }

            let marker = NamedEntity::new(NamedEntityType::Reference, name.clone())
                .with_normalized_text(name.clone())
                .with_group_name(name.clone())
                .with_offsets(0, segment.char_len())
                .in_segment(idx)
                .with_relevance(100);

            if let Some(existing) = known {
                log::debug!("[reference] prior destination '{}' (segment {})", name, idx);
                self.destinations[existing].segment = Some(idx);
                markers.push(marker);
                continue;
            }

            let mut top = EntityRecord::from_entity(&marker, segments);
            top.entity_type = NamedEntityType::ReferenceDestination;

            log::debug!("[reference] destination '{}' (segment {})", name, idx);
            self.names.insert(name.clone(), self.destinations.len());
            self.destinations.push(NamedEntityGroup {
                entity_type: NamedEntityType::ReferenceDestination,
                name,
                members: Vec::new(),
                top_relevance_entity: top,
                segment: Some(idx),
                origin: GroupOrigin::Batch,
            });
            markers.push(marker);
        }
        markers
    }

    /// Pointer candidates for one segment, deduplicated.
    #[must_use]
    pub fn candidates_in(&self, text: &str) -> Vec<PointerCandidate> {
        let mut candidates = Vec::new();
        for destination in &self.destinations {
            for (start, end) in
                find_reference_spans_with(&destination.name, text, self.config.min_pattern_chars)
            {
                candidates.push(PointerCandidate {
                    start,
                    end,
                    destination: destination.name.clone(),
                });
            }
        }
        dedup_overlapping(candidates)
    }

    /// Scan every non-title segment for citations of known destinations.
    #[must_use]
    pub fn detect_pointers(&self, segments: &[Segment]) -> Vec<NamedEntity> {
        let mut pointers = Vec::new();
        if self.destinations.is_empty() {
            return pointers;
        }

        for (idx, segment) in segments.iter().enumerate() {
            if segment.is_blank() || self.segment_types.is_title(segment) {
                continue;
            }
            let offsets = CharOffsets::new(&segment.text);
            for candidate in self.candidates_in(&segment.text) {
                let text = offsets
                    .slice(&segment.text, candidate.start, candidate.end)
                    .to_string();
                log::debug!(
                    "[reference] pointer '{}' -> '{}' (segment {}, {}..{})",
                    text,
                    candidate.destination,
                    idx,
                    candidate.start,
                    candidate.end
                );
                pointers.push(
                    NamedEntity::new(NamedEntityType::ReferencePointer, text.clone())
                        .with_normalized_text(text)
                        .with_group_name(candidate.destination)
                        .with_offsets(candidate.start, candidate.end)
                        .in_segment(idx),
                );
            }
        }
        pointers
    }

    /// Register destinations, then detect pointers. Markers come first.
    pub fn resolve(&mut self, segments: &[Segment]) -> Vec<NamedEntity> {
        let mut entities = self.register_destinations(segments);
        entities.extend(self.detect_pointers(segments));
        entities
    }

    /// Records for destinations registered from this document's segments.
    #[must_use]
    pub fn new_destination_records(&self, segments: &[Segment]) -> Vec<GroupRecord> {
        self.destinations
            .iter()
            .filter(|d| d.origin == GroupOrigin::Batch)
            .map(|d| GroupRecord {
                entity_type: d.entity_type,
                name: d.name.clone(),
                entities: vec![d.top_relevance_entity.clone()],
                top_relevance_entity: d.top_relevance_entity.clone(),
                segment: d.segment.and_then(|idx| segments.get(idx)).cloned(),
            })
            .collect()
    }
}
