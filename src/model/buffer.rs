//! The shared text arena every span indexes into.

use serde::{Serialize, Serializer};

/// Zero-width space, the stand-in for an intentionally empty paragraph.
pub const EMPTY_MARKER: char = '\u{200B}';

/// Object replacement character, the stand-in for an inline image.
pub const IMAGE_PLACEHOLDER: char = '\u{FFFC}';

/// A single ordered sequence of Unicode scalar values.
///
/// Offsets and lengths are counted in scalar values (`char`s), not bytes.
/// The buffer is append-only while a document is being encoded and read-only
/// once decoding starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    /// Byte position of every char in `text`.
    starts: Vec<usize>,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `text`.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let starts = text.char_indices().map(|(i, _)| i).collect();
        Self { text, starts }
    }

    /// Number of scalar values in the buffer.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// The whole buffer as a string.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Append `text` and return the `(offset, length)` it occupies.
    pub fn push_str(&mut self, text: &str) -> (usize, usize) {
        let offset = self.len();
        let base = self.text.len();
        self.starts.extend(text.char_indices().map(|(i, _)| base + i));
        self.text.push_str(text);
        (offset, self.len() - offset)
    }

    /// Append a single character and return its offset.
    pub fn push(&mut self, c: char) -> usize {
        let offset = self.len();
        self.starts.push(self.text.len());
        self.text.push(c);
        offset
    }

    /// Slice `[offset, offset + length)`, or `None` if it leaves the buffer.
    pub fn slice(&self, offset: usize, length: usize) -> Option<&str> {
        let end = offset.checked_add(length)?;
        if end > self.len() {
            return None;
        }
        Some(&self.text[self.byte_pos(offset)..self.byte_pos(end)])
    }

    /// Slice `[offset, offset + length)` clamped to the buffer end.
    ///
    /// An offset past the end yields an empty string.
    pub fn slice_clamped(&self, offset: usize, length: usize) -> &str {
        let start = offset.min(self.len());
        let end = offset.saturating_add(length).min(self.len());
        &self.text[self.byte_pos(start)..self.byte_pos(end)]
    }

    fn byte_pos(&self, char_index: usize) -> usize {
        self.starts
            .get(char_index)
            .copied()
            .unwrap_or(self.text.len())
    }
}

impl Serialize for TextBuffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_returns_char_ranges() {
        let mut buf = TextBuffer::new();
        assert_eq!(buf.push_str("Merhaba "), (0, 8));
        assert_eq!(buf.push_str("dünya"), (8, 5));
        assert_eq!(buf.push(IMAGE_PLACEHOLDER), 13);
        assert_eq!(buf.len(), 14);
        assert_eq!(buf.slice(8, 5), Some("dünya"));
    }

    #[test]
    fn test_slice_out_of_range() {
        let buf = TextBuffer::from_text("0123456789");
        assert_eq!(buf.slice(5, 1000), None);
        assert_eq!(buf.slice(usize::MAX, 2), None);
        assert_eq!(buf.slice(10, 0), Some(""));
    }

    #[test]
    fn test_slice_clamped() {
        let buf = TextBuffer::from_text("0123456789");
        assert_eq!(buf.slice_clamped(5, 1000), "56789");
        assert_eq!(buf.slice_clamped(42, 3), "");
        assert_eq!(buf.slice_clamped(2, 3), "234");
    }

    #[test]
    fn test_multibyte_offsets() {
        let buf = TextBuffer::from_text("ağaç\u{200B}şı");
        assert_eq!(buf.len(), 7);
        assert_eq!(buf.slice(4, 1), Some("\u{200B}"));
        assert_eq!(buf.slice(5, 2), Some("şı"));
    }
}
