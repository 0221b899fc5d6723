//! Name matching predicates for entity grouping.
//!
//! All predicates take canonical forms (see [`crate::normalize`]): lowercase,
//! ASCII, words sorted. Four rules, tried in this order:
//!
//! 1. **Exact**: identical canonical forms.
//! 2. **Subset-word**: the shorter word list is contained in the longer one,
//!    sharing at least two words. `"diaz maria"` ~ `"diaz garcia maria"`.
//! 3. **Near-miss**: one edit on long strings. `"organizacion mundial"` ~
//!    `"organizacion mundal"`.
//! 4. **Abbreviation**: same initials, full words agree where both sides
//!    spell them out. `"diaz m"` ~ `"diaz maria"`.

use std::collections::HashSet;

use lexner_core::{NamedEntity, NamedEntityType};
use serde::{Deserialize, Serialize};

/// Thresholds for the fuzzy rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Minimum length (chars) of both strings for subset-word and abbreviation.
    pub min_chars: usize,
    /// Minimum shared words for subset-word.
    pub min_shared_tokens: usize,
    /// Strings up to this length (chars) must match exactly under near-miss.
    pub short_string_limit: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            min_chars: 4,
            min_shared_tokens: 2,
            short_string_limit: 10,
        }
    }
}

/// Which rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Identical canonical forms.
    Exact,
    /// Word-list containment.
    SubsetWord,
    /// Single edit on a long string.
    NearMiss,
    /// Initials agree.
    Abbreviation,
}

impl MatchRule {
    /// Rules in evaluation order.
    pub const ORDER: [MatchRule; 4] = [
        MatchRule::Exact,
        MatchRule::SubsetWord,
        MatchRule::NearMiss,
        MatchRule::Abbreviation,
    ];
}

/// Word-list containment with a minimum overlap.
///
/// ```
/// use lexner::similarity::{is_subset_word, SimilarityConfig};
///
/// let cfg = SimilarityConfig::default();
/// assert!(is_subset_word("diaz maria", "diaz lopez maria", &cfg));
/// assert!(!is_subset_word("maria", "diaz maria", &cfg)); // one shared word
/// ```
#[must_use]
pub fn is_subset_word(a: &str, b: &str, config: &SimilarityConfig) -> bool {
    if a.chars().count() < config.min_chars || b.chars().count() < config.min_chars {
        return false;
    }

    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();

    let shared = words_a.intersection(&words_b).count();
    shared >= config.min_shared_tokens
        && (words_a.is_subset(&words_b) || words_b.is_subset(&words_a))
}

/// Levenshtein ratio threshold (0-100) for strings whose longer side has `len` chars.
#[must_use]
pub fn near_miss_threshold(len: usize, config: &SimilarityConfig) -> f64 {
    if len <= config.short_string_limit {
        100.0
    } else {
        100.0 * (len - 1) as f64 / len as f64
    }
}

/// At most one edit, and only on strings longer than the short-string limit.
///
/// ```
/// use lexner::similarity::{is_near_miss, SimilarityConfig};
///
/// let cfg = SimilarityConfig::default();
/// assert!(is_near_miss("naciones unidas", "naciones unidad", &cfg));
/// assert!(!is_near_miss("diaz", "dias", &cfg)); // too short to tolerate an edit
/// ```
#[must_use]
pub fn is_near_miss(a: &str, b: &str, config: &SimilarityConfig) -> bool {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a.abs_diff(len_b) > 1 {
        return false;
    }

    let ratio = strsim::normalized_levenshtein(a, b) * 100.0;
    ratio + 1e-9 >= near_miss_threshold(len_a.max(len_b), config)
}

fn is_initial(word: &str) -> bool {
    word.chars().count() == 1
}

/// Initials agree and spelled-out words agree position by position.
///
/// ```
/// use lexner::similarity::{is_abbreviation, SimilarityConfig};
///
/// let cfg = SimilarityConfig::default();
/// assert!(is_abbreviation("diaz m", "diaz maria", &cfg));
/// assert!(!is_abbreviation("diaz maria", "diaz marta", &cfg)); // no initial on either side
/// ```
#[must_use]
pub fn is_abbreviation(a: &str, b: &str, config: &SimilarityConfig) -> bool {
    if a.chars().count() < config.min_chars || b.chars().count() < config.min_chars {
        return false;
    }

    let words_a: Vec<&str> = a.split_whitespace().collect();
    let words_b: Vec<&str> = b.split_whitespace().collect();
    if words_a.len() != words_b.len() || words_a.is_empty() {
        return false;
    }
    if !words_a.iter().chain(words_b.iter()).any(|w| is_initial(w)) {
        return false;
    }

    words_a.iter().zip(words_b.iter()).all(|(wa, wb)| {
        let same_initial = wa.chars().next() == wb.chars().next();
        same_initial && (is_initial(wa) || is_initial(wb) || wa == wb)
    })
}

/// Canonical forms a group can be matched against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupProfile {
    /// Canonical form of the display name.
    pub name_form: String,
    /// Canonical forms of members (and carried-over representatives).
    pub member_forms: Vec<String>,
}

impl GroupProfile {
    /// Profile with a name form and one member form.
    #[must_use]
    pub fn new(name_form: impl Into<String>, member_form: impl Into<String>) -> Self {
        Self {
            name_form: name_form.into(),
            member_forms: vec![member_form.into()],
        }
    }

    fn forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name_form.as_str()).chain(self.member_forms.iter().map(String::as_str))
    }
}

/// Decides whether a mention belongs to a group.
#[derive(Debug, Clone, Default)]
pub struct SimilarityEngine {
    config: SimilarityConfig,
}

impl SimilarityEngine {
    /// Create an engine with the given thresholds.
    #[must_use]
    pub fn new(config: SimilarityConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use.
    #[must_use]
    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// First rule under which two canonical forms match.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Option<MatchRule> {
        MatchRule::ORDER
            .into_iter()
            .find(|rule| self.rule_holds(*rule, a, b))
    }

    fn rule_holds(&self, rule: MatchRule, a: &str, b: &str) -> bool {
        match rule {
            MatchRule::Exact => a == b,
            MatchRule::SubsetWord => is_subset_word(a, b, &self.config),
            MatchRule::NearMiss => is_near_miss(a, b, &self.config),
            MatchRule::Abbreviation => is_abbreviation(a, b, &self.config),
        }
    }

    /// First rule under which `form` matches any form of the group.
    ///
    /// Rules are tried in order across all forms, so an exact match on a
    /// later member wins over a subset match on an earlier one.
    #[must_use]
    pub fn match_rule(&self, profile: &GroupProfile, form: &str) -> Option<MatchRule> {
        MatchRule::ORDER
            .into_iter()
            .find(|rule| profile.forms().any(|candidate| self.rule_holds(*rule, candidate, form)))
    }

    /// Whether `entity` (already normalized) belongs to a group of `group_type`.
    ///
    /// Reference-family types never match here; they group by key identity.
    #[must_use]
    pub fn matches(
        &self,
        group_type: NamedEntityType,
        profile: &GroupProfile,
        entity: &NamedEntity,
    ) -> bool {
        if entity.entity_type != group_type || group_type.is_reference_family() {
            return false;
        }
        self.match_rule(profile, &entity.normalized_text).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SimilarityConfig {
        SimilarityConfig::default()
    }

    #[test]
    fn test_subset_requires_two_shared_words() {
        assert!(is_subset_word("garcia jose", "garcia jose luis", &cfg()));
        assert!(!is_subset_word("jose", "garcia jose", &cfg()));
        assert!(!is_subset_word("garcia jose", "garcia luis perez", &cfg()));
    }

    #[test]
    fn test_subset_respects_min_chars() {
        let relaxed = SimilarityConfig {
            min_shared_tokens: 1,
            ..cfg()
        };
        assert!(!is_subset_word("a b", "a b c", &relaxed));
    }

    #[test]
    fn test_near_miss_threshold() {
        assert_eq!(near_miss_threshold(10, &cfg()), 100.0);
        assert!((near_miss_threshold(20, &cfg()) - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_near_miss_one_edit_on_long_strings() {
        // 19 chars, one substitution: ratio sits exactly on the threshold
        assert!(is_near_miss("ministerio de salud", "ministerio de saluz", &cfg()));
        // two edits
        assert!(!is_near_miss("ministerio de salud", "ministerio de sanuz", &cfg()));
        // length difference over one
        assert!(!is_near_miss("ministerio salud", "ministerio de salud", &cfg()));
    }

    #[test]
    fn test_near_miss_short_strings_need_identity() {
        assert!(is_near_miss("perez", "perez", &cfg()));
        assert!(!is_near_miss("perez", "peres", &cfg()));
    }

    #[test]
    fn test_abbreviation() {
        assert!(is_abbreviation("d maria", "diaz maria", &cfg()));
        assert!(is_abbreviation("d m perez", "david miguel perez", &cfg()));
        assert!(!is_abbreviation("d m perez", "david miguel lopez", &cfg()));
        assert!(!is_abbreviation("d maria", "diaz maria lopez", &cfg()));
    }

    #[test]
    fn test_rule_order() {
        let engine = SimilarityEngine::default();
        assert_eq!(engine.compare("diaz maria", "diaz maria"), Some(MatchRule::Exact));
        assert_eq!(
            engine.compare("diaz maria", "diaz lopez maria"),
            Some(MatchRule::SubsetWord)
        );
        assert_eq!(
            engine.compare("diaz m", "diaz maria"),
            Some(MatchRule::Abbreviation)
        );
        assert_eq!(engine.compare("diaz", "lopez"), None);
    }

    #[test]
    fn test_match_rule_prefers_earlier_rule_across_members() {
        let engine = SimilarityEngine::default();
        let profile = GroupProfile {
            name_form: "diaz m".to_string(),
            member_forms: vec!["diaz m".to_string(), "diaz maria".to_string()],
        };
        assert_eq!(engine.match_rule(&profile, "diaz maria"), Some(MatchRule::Exact));
    }

    #[test]
    fn test_type_gate() {
        let engine = SimilarityEngine::default();
        let profile = GroupProfile::new("diaz maria", "diaz maria");
        let person = NamedEntity::new(NamedEntityType::Person, "Maria Diaz")
            .with_normalized_text("diaz maria");
        let org = NamedEntity::new(NamedEntityType::Organization, "Maria Diaz")
            .with_normalized_text("diaz maria");

        assert!(engine.matches(NamedEntityType::Person, &profile, &person));
        assert!(!engine.matches(NamedEntityType::Person, &profile, &org));
    }

    #[test]
    fn test_reference_family_never_fuzzy() {
        let engine = SimilarityEngine::default();
        let profile = GroupProfile::new("Section 1", "Section 1");
        let pointer = NamedEntity::new(NamedEntityType::ReferencePointer, "Section 1")
            .with_normalized_text("Section 1");
        assert!(!engine.matches(NamedEntityType::ReferencePointer, &profile, &pointer));
    }
}
