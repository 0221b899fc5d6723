//! UN document symbol extraction.
//!
//! Finds codes such as `A/C.3/79/L.5/Rev.1`, `S/RES/2750` or `ST/SG/2025/1`
//! and emits them as DOCUMENT_CODE entities. The surface text keeps its
//! original casing; matching is case-insensitive.

use lexner_core::{NamedEntity, NamedEntityType, Segment};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::Normalizer;
use crate::offset::CharOffsets;

static UN_SYMBOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(A|S|E|T|ST)/([A-Z]+\.\d+|[A-Z]{2,}|\d{1,4})(/([A-Z]+\.\d+|[A-Z]{2,}|\d{1,4}))*(/(Rev|Add|Corr)\.\d+)*$",
    )
    .expect("valid regex")
});

/// Words are separated by whitespace, commas, brackets and parentheses.
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\s,()\[\]]+").expect("valid regex"));

fn is_edge_punct(c: char) -> bool {
    matches!(c, ';' | ':' | '.')
}

/// Byte span of `word` (starting at `offset`) with edge punctuation removed.
fn strip_edges(word: &str, offset: usize) -> Option<(usize, usize)> {
    let trimmed_start = word.trim_start_matches(is_edge_punct);
    let start = offset + (word.len() - trimmed_start.len());
    let trimmed = trimmed_start.trim_end_matches(is_edge_punct);
    if trimmed.is_empty() {
        return None;
    }
    Some((start, start + trimmed.len()))
}

/// Whether `candidate` (already uppercased) is a UN document symbol.
#[must_use]
pub fn is_document_code(candidate: &str) -> bool {
    UN_SYMBOL.is_match(candidate)
}

/// Extracts DOCUMENT_CODE entities from text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCodeExtractor {
    normalizer: Normalizer,
}

impl DocumentCodeExtractor {
    /// Create an extractor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uppercased codes in order of appearance.
    ///
    /// ```rust
    /// use lexner::document_code::DocumentCodeExtractor;
    ///
    /// let codes = DocumentCodeExtractor::new()
    ///     .find_codes("Documents (A/79/150) and [S/RES/2750] were cited.");
    /// assert_eq!(codes, vec!["A/79/150", "S/RES/2750"]);
    /// ```
    #[must_use]
    pub fn find_codes(&self, text: &str) -> Vec<String> {
        self.byte_spans(text)
            .into_iter()
            .map(|(start, end)| text[start..end].to_ascii_uppercase())
            .collect()
    }

    fn byte_spans(&self, text: &str) -> Vec<(usize, usize)> {
        WORD.find_iter(text)
            .filter_map(|m| strip_edges(m.as_str(), m.start()))
            .filter(|&(start, end)| is_document_code(&text[start..end].to_ascii_uppercase()))
            .collect()
    }

    /// DOCUMENT_CODE entities with character offsets into `text`.
    ///
    /// Overlapping spans keep the earliest start, longest first.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<NamedEntity> {
        let offsets = CharOffsets::new(text);
        let mut spans: Vec<(usize, usize)> = self
            .byte_spans(text)
            .into_iter()
            .map(|(start, end)| offsets.char_span(start..end))
            .collect();
        spans.sort_by(|a, b| a.0.cmp(&b.0).then((b.1 - b.0).cmp(&(a.1 - a.0))));

        let mut entities = Vec::with_capacity(spans.len());
        let mut last_end = 0;
        for (start, end) in spans {
            if !entities.is_empty() && start < last_end {
                continue;
            }
            last_end = end;
            let surface = offsets.slice(text, start, end);
            let normalized = self
                .normalizer
                .canonical_form(NamedEntityType::DocumentCode, surface);
            entities.push(
                NamedEntity::new(NamedEntityType::DocumentCode, surface)
                    .with_normalized_text(normalized)
                    .with_offsets(start, end),
            );
        }
        entities
    }

    /// Extract from every segment, tagging entities with their segment index.
    #[must_use]
    pub fn extract_segments(&self, segments: &[Segment]) -> Vec<NamedEntity> {
        segments
            .iter()
            .enumerate()
            .flat_map(|(idx, segment)| {
                self.extract(&segment.text)
                    .into_iter()
                    .map(move |entity| entity.in_segment(idx))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<String> {
        DocumentCodeExtractor::new()
            .extract(text)
            .into_iter()
            .map(|e| e.text)
            .collect()
    }

    #[test]
    fn test_secretariat_code_offsets() {
        let entities = DocumentCodeExtractor::new().extract("The report ST/SG/2025/1 was discussed.");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "ST/SG/2025/1");
        assert_eq!(entities[0].normalized_text, "ST/SG/2025/1");
        assert_eq!((entities[0].character_start, entities[0].character_end), (11, 23));
        assert_eq!(entities[0].entity_type, NamedEntityType::DocumentCode);
    }

    #[test]
    fn test_revision_suffix_keeps_case() {
        assert_eq!(
            texts("See document A/C.3/79/L.5/Rev.1 for details."),
            vec!["A/C.3/79/L.5/Rev.1"]
        );
    }

    #[test]
    fn test_sentence_final_period() {
        assert_eq!(texts("It was revised as A/79/100/Add.2."), vec!["A/79/100/Add.2"]);
    }

    #[test]
    fn test_non_codes_ignored() {
        assert!(texts("This text contains A/B/C and 12345 which are not valid codes.").is_empty());
        assert!(texts("").is_empty());
    }

    #[test]
    fn test_many_codes() {
        let text = "The Secretariat report (ST/SG/2025/1) was discussed. Draft A/C.3/79/L.5 \
                    was revised as A/C.3/79/L.5/Rev.1. The Council adopted S/RES/2750, and \
                    E/2025/14 was corrected with E/2025/14/Corr.1. See also T/3200.";
        let found = texts(text);
        for code in [
            "ST/SG/2025/1",
            "A/C.3/79/L.5",
            "A/C.3/79/L.5/Rev.1",
            "S/RES/2750",
            "E/2025/14",
            "E/2025/14/Corr.1",
            "T/3200",
        ] {
            assert!(found.iter().any(|c| c == code), "missing {code}");
        }
    }

    #[test]
    fn test_lowercase_input() {
        let codes = DocumentCodeExtractor::new().find_codes("see a/79/150");
        assert_eq!(codes, vec!["A/79/150"]);
        assert_eq!(texts("see a/79/150"), vec!["a/79/150"]);
    }

    #[test]
    fn test_char_offsets_after_multibyte() {
        let entities = DocumentCodeExtractor::new().extract("Resolución S/RES/2750");
        assert_eq!((entities[0].character_start, entities[0].character_end), (11, 21));
    }

    #[test]
    fn test_segments_tagged() {
        let segments = vec![Segment::from_text("nothing"), Segment::from_text("A/79/150")];
        let entities = DocumentCodeExtractor::new().extract_segments(&segments);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].segment, Some(1));
    }
}
