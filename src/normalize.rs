//! Per-type canonicalization of mention text.
//!
//! | Type                              | Canonical form                          |
//! |-----------------------------------|-----------------------------------------|
//! | PERSON, ORGANIZATION, LAW         | ascii, lowercase, sorted word bag       |
//! | LOCATION                          | ISO 3166-1 alpha-3, else as PERSON      |
//! | DATE                              | `YYYY-MM-DD`                            |
//! | DOCUMENT_CODE                     | trimmed                                 |
//! | REFERENCE family                  | raw text                                |
//!
//! [`Normalizer::normalize`] never fails: on error it logs and returns the
//! raw text. [`Normalizer::try_normalize`] exposes the error.

use lexner_core::{NamedEntity, NamedEntityType};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::country::iso3_code;
use crate::date::normalize_date;
use crate::error::{Error, Result};
use crate::lang::Language;

/// Letters that have no canonical decomposition into base + combining mark.
fn fold_special(c: char) -> Option<&'static str> {
    Some(match c {
        'ß' => "ss",
        'ẞ' => "SS",
        'æ' => "ae",
        'Æ' => "AE",
        'ø' => "o",
        'Ø' => "O",
        'œ' => "oe",
        'Œ' => "OE",
        'ł' => "l",
        'Ł' => "L",
        'đ' => "d",
        'Đ' => "D",
        'þ' => "th",
        'Þ' => "TH",
        'ı' => "i",
        _ => return None,
    })
}

/// Strip diacritics: NFD, drop combining marks, fold the few letters that
/// do not decompose. Characters outside Latin scripts pass through.
///
/// ```rust
/// use lexner::normalize::transliterate;
///
/// assert_eq!(transliterate("María Díaz"), "Maria Diaz");
/// assert_eq!(transliterate("Straße Øster"), "Strasse Oster");
/// ```
#[must_use]
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match fold_special(c) {
            Some(folded) => out.push_str(folded),
            None => out.push(c),
        }
    }
    out
}

/// Order-invariant canonical form for names.
///
/// Lowercase, commas and periods become spaces, diacritics are stripped, and
/// the remaining words are sorted.
///
/// ```rust
/// use lexner::normalize::canonical_name;
///
/// assert_eq!(canonical_name("Díaz, María"), "diaz maria");
/// assert_eq!(canonical_name("M.D.Perez"), "d m perez");
/// ```
#[must_use]
pub fn canonical_name(text: &str) -> String {
    let lowered = text.trim().to_lowercase().replace([',', '.'], " ");
    let ascii = transliterate(&lowered);
    let mut words: Vec<&str> = ascii.split_whitespace().collect();
    words.sort_unstable();
    words.join(" ")
}

/// Per-type text normalizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    language: Language,
}

impl Normalizer {
    /// Create a normalizer for documents in `language`.
    #[must_use]
    pub const fn new(language: Language) -> Self {
        Self { language }
    }

    /// Document language.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Canonical text for an entity, or the reason it could not be built.
    ///
    /// A DATE whose `normalized_text` is already set is returned unchanged.
    pub fn try_normalize(&self, entity: &NamedEntity) -> Result<String> {
        if entity.entity_type == NamedEntityType::Date && !entity.normalized_text.is_empty() {
            return Ok(entity.normalized_text.clone());
        }
        self.try_canonical_form(entity.entity_type, &entity.text)
    }

    /// Canonical text for an entity, falling back to the raw text.
    #[must_use]
    pub fn normalize(&self, entity: &NamedEntity) -> String {
        match self.try_normalize(entity) {
            Ok(normalized) => normalized,
            Err(e) => {
                log::warn!("[normalize] falling back to raw text: {}", e);
                entity.text.clone()
            }
        }
    }

    /// Canonical form of arbitrary text interpreted as `entity_type`.
    pub fn try_canonical_form(&self, entity_type: NamedEntityType, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(Error::normalization(entity_type, text, "empty text"));
        }

        match entity_type {
            NamedEntityType::Person | NamedEntityType::Organization | NamedEntityType::Law => {
                Ok(canonical_name(text))
            }
            NamedEntityType::Location => Ok(match iso3_code(text) {
                Some(code) => code.to_string(),
                None => canonical_name(text),
            }),
            NamedEntityType::Date => normalize_date(text, self.language)
                .map_err(|e| Error::normalization(entity_type, text, e.to_string())),
            NamedEntityType::DocumentCode => Ok(text.trim().to_string()),
            NamedEntityType::Reference
            | NamedEntityType::ReferencePointer
            | NamedEntityType::ReferenceDestination => Ok(text.to_string()),
        }
    }

    /// Canonical form with the raw-text fallback, without logging.
    #[must_use]
    pub fn canonical_form(&self, entity_type: NamedEntityType, text: &str) -> String {
        self.try_canonical_form(entity_type, text)
            .unwrap_or_else(|_| text.to_string())
    }

    /// Whether a LOCATION resolves to a country code.
    #[must_use]
    pub fn has_iso_code(&self, entity: &NamedEntity) -> bool {
        entity.entity_type == NamedEntityType::Location && iso3_code(&entity.text).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(ty: NamedEntityType, text: &str) -> NamedEntity {
        NamedEntity::new(ty, text)
    }

    #[test]
    fn test_person_order_invariant() {
        let n = Normalizer::default();
        let a = n.normalize(&entity(NamedEntityType::Person, "Diaz Maria"));
        let b = n.normalize(&entity(NamedEntityType::Person, "María Díaz"));
        assert_eq!(a, "diaz maria");
        assert_eq!(a, b);
    }

    #[test]
    fn test_accented_initials_sort_after_folding() {
        // Sorting before folding would put "élise" after "zoe".
        assert_eq!(canonical_name("Zoe Élise"), "elise zoe");
    }

    #[test]
    fn test_location_iso_and_fallback() {
        let n = Normalizer::default();
        assert_eq!(n.normalize(&entity(NamedEntityType::Location, "España")), "ESP");
        assert_eq!(n.normalize(&entity(NamedEntityType::Location, "Spain")), "ESP");
        assert_eq!(
            n.normalize(&entity(NamedEntityType::Location, "Sierra Maestra")),
            "maestra sierra"
        );
        assert!(n.has_iso_code(&entity(NamedEntityType::Location, "Côte d'Ivoire")));
        assert!(!n.has_iso_code(&entity(NamedEntityType::Person, "Spain")));
    }

    #[test]
    fn test_date_normalization_and_failure() {
        let n = Normalizer::new(Language::English);
        assert_eq!(n.normalize(&entity(NamedEntityType::Date, "12 May 2023")), "2023-05-12");
        assert_eq!(n.normalize(&entity(NamedEntityType::Date, "last spring")), "last spring");
        assert!(matches!(
            n.try_normalize(&entity(NamedEntityType::Date, "last spring")),
            Err(Error::Normalization { .. })
        ));
    }

    #[test]
    fn test_date_keeps_existing_normalized_text() {
        let n = Normalizer::default();
        let e = entity(NamedEntityType::Date, "whenever").with_normalized_text("2020-01-01");
        assert_eq!(n.normalize(&e), "2020-01-01");
    }

    #[test]
    fn test_document_code_and_references() {
        let n = Normalizer::default();
        assert_eq!(n.normalize(&entity(NamedEntityType::DocumentCode, " A/79/150 ")), "A/79/150");
        assert_eq!(
            n.normalize(&entity(NamedEntityType::ReferencePointer, "\"Results, Interpretation\"")),
            "\"Results, Interpretation\""
        );
    }

    #[test]
    fn test_empty_text_is_failure() {
        let n = Normalizer::default();
        for ty in NamedEntityType::ALL {
            assert!(n.try_normalize(&entity(ty, "   ")).is_err(), "{ty}");
            assert_eq!(n.normalize(&entity(ty, "   ")), "   ");
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn canonical_name_is_idempotent(text in "\\PC{0,40}") {
            let once = canonical_name(&text);
            prop_assert_eq!(canonical_name(&once), once);
        }

        #[test]
        fn canonical_name_ignores_word_order(words in proptest::collection::vec("[a-zA-Z]{1,8}", 1..5)) {
            let forward = words.join(" ");
            let mut reversed = words.clone();
            reversed.reverse();
            prop_assert_eq!(canonical_name(&forward), canonical_name(&reversed.join(" ")));
        }
    }
}
