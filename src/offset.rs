//! Byte ↔ character offsets for segment text.
//!
//! `regex` and `str::match_indices` report byte offsets; entity offsets are
//! character offsets into the segment. For ASCII text the two coincide and no
//! table is built.
//!
//! ```text
//! "Según el «Anexo»"
//!  bytes:  S=0 e=1 g=2 ú=3..5 n=5 ...  «=10..12 A=12
//!  chars:  S=0 e=1 g=2 ú=3    n=4 ...  «=9      A=10
//! ```

use std::ops::Range;

/// Offset table for one text.
#[derive(Debug, Clone)]
pub struct CharOffsets {
    /// Byte start of every char, plus the text length. Empty for ASCII.
    starts: Vec<usize>,
    byte_len: usize,
}

impl CharOffsets {
    /// Build the table for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let starts = if text.is_ascii() {
            Vec::new()
        } else {
            text.char_indices()
                .map(|(byte, _)| byte)
                .chain(std::iter::once(text.len()))
                .collect()
        };
        Self {
            starts,
            byte_len: text.len(),
        }
    }

    /// Whether byte and char offsets coincide.
    #[must_use]
    pub fn is_ascii(&self) -> bool {
        self.starts.is_empty()
    }

    /// Number of chars in the text.
    #[must_use]
    pub fn char_count(&self) -> usize {
        if self.is_ascii() {
            self.byte_len
        } else {
            self.starts.len() - 1
        }
    }

    /// Char index containing `byte`. Past-the-end offsets clamp to the char count.
    #[must_use]
    pub fn to_char(&self, byte: usize) -> usize {
        if self.is_ascii() {
            return byte.min(self.byte_len);
        }
        let idx = match self.starts.binary_search(&byte) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        idx.min(self.char_count())
    }

    /// Byte offset where char `ch` starts. Past-the-end indices clamp to the text length.
    #[must_use]
    pub fn to_byte(&self, ch: usize) -> usize {
        if self.is_ascii() {
            ch.min(self.byte_len)
        } else {
            self.starts.get(ch).copied().unwrap_or(self.byte_len)
        }
    }

    /// Char span of a byte range.
    #[must_use]
    pub fn char_span(&self, bytes: Range<usize>) -> (usize, usize) {
        (self.to_char(bytes.start), self.to_char(bytes.end))
    }

    /// Byte range of a char span.
    #[must_use]
    pub fn byte_range(&self, start: usize, end: usize) -> Range<usize> {
        self.to_byte(start)..self.to_byte(end)
    }

    /// Substring between two char offsets; empty if out of range.
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str, start: usize, end: usize) -> &'a str {
        text.get(self.byte_range(start, end)).unwrap_or("")
    }
}
