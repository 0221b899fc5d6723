//! Layout segments supplied by the caller.

use serde::{Deserialize, Serialize};

/// Layout label used by [`Segment::from_text`].
pub const DEFAULT_SEGMENT_TYPE: &str = "Text";

/// Source id used by [`Segment::from_text`].
pub const DEFAULT_SOURCE_ID: &str = "default";

/// Position of a segment on its page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl BoundingBox {
    /// Create a box.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A contiguous block of document text with its layout label.
///
/// Segments are read-only to the grouping core; entities refer to them by
/// index into the batch's segment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment text.
    pub text: String,
    /// Page the segment was found on.
    #[serde(default)]
    pub page_number: u32,
    /// Position of the segment in reading order.
    #[serde(default)]
    pub segment_number: u32,
    /// Layout label ("Title", "Section header", "Page header", "Text", ...).
    #[serde(rename = "type", default = "default_segment_type")]
    pub segment_type: String,
    /// Identifier of the source document.
    #[serde(default = "default_source_id")]
    pub source_id: String,
    /// Location on the page.
    #[serde(default)]
    pub bounding_box: BoundingBox,
}

fn default_segment_type() -> String {
    DEFAULT_SEGMENT_TYPE.to_string()
}

fn default_source_id() -> String {
    DEFAULT_SOURCE_ID.to_string()
}

impl Segment {
    /// Create a segment with an explicit layout label.
    #[must_use]
    pub fn new(text: impl Into<String>, segment_type: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page_number: 0,
            segment_number: 0,
            segment_type: segment_type.into(),
            source_id: default_source_id(),
            bounding_box: BoundingBox::default(),
        }
    }

    /// Wrap raw text as a single plain segment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lexner_core::Segment;
    ///
    /// let seg = Segment::from_text("Decree 12/2020 of the Ministry");
    /// assert_eq!(seg.segment_type, "Text");
    /// assert_eq!(seg.source_id, "default");
    /// ```
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(text, DEFAULT_SEGMENT_TYPE)
    }

    /// Set page and reading-order position.
    #[must_use]
    pub fn at(mut self, page_number: u32, segment_number: u32) -> Self {
        self.page_number = page_number;
        self.segment_number = segment_number;
        self
    }

    /// Set the source document id.
    #[must_use]
    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }

    /// Set the bounding box.
    #[must_use]
    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    /// Length of the text in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Case-insensitive comparison of the layout label.
    #[must_use]
    pub fn has_type(&self, label: &str) -> bool {
        self.segment_type.trim().eq_ignore_ascii_case(label.trim())
    }

    /// True when the text is empty or only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_field_name() {
        let seg = Segment::new("Results", "Title").at(2, 7);
        let json = serde_json::to_value(&seg).unwrap();
        assert_eq!(json["type"], "Title");
        assert_eq!(json["page_number"], 2);
        assert!(json.get("segment_type").is_none());
    }

    #[test]
    fn test_partial_json_defaults() {
        let seg: Segment = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(seg.segment_type, "Text");
        assert_eq!(seg.source_id, "default");
        assert_eq!(seg.bounding_box, BoundingBox::default());
    }

    #[test]
    fn test_has_type_ignores_case() {
        let seg = Segment::new("x", "Section Header");
        assert!(seg.has_type("section header"));
        assert!(!seg.has_type("title"));
    }

    #[test]
    fn test_char_len_counts_chars() {
        assert_eq!(Segment::from_text("Díaz").char_len(), 4);
        assert!(Segment::from_text("  \n").is_blank());
    }
}
