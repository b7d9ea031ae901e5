//! The span model: one text buffer plus offset-indexed paragraphs.

use serde::Serialize;

use super::buffer::{TextBuffer, EMPTY_MARKER, IMAGE_PLACEHOLDER};
use super::span::{
    Alignment, ImageDescriptor, Inline, ParagraphDescriptor, SpanDescriptor, SpanStyle,
};
use crate::error::{Error, Result};

/// Intermediate representation shared by every conversion.
///
/// All text lives in [`TextBuffer`]; paragraphs only hold `(offset, length)`
/// windows into it. A model is built fresh for one conversion and dropped
/// once the target representation has been produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpanModel {
    /// The text arena
    pub buffer: TextBuffer,
    /// Paragraphs in document order
    pub paragraphs: Vec<ParagraphDescriptor>,
}

impl SpanModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model over an existing buffer, typically while decoding.
    pub fn with_buffer(buffer: TextBuffer) -> Self {
        Self {
            buffer,
            paragraphs: Vec::new(),
        }
    }

    /// The canonical empty document: one paragraph holding one body-styled
    /// span over a single zero-width space.
    pub fn empty_document() -> Self {
        let mut model = Self::new();
        let mut para = ParagraphDescriptor::new(Alignment::Start);
        model.append_char(&mut para, EMPTY_MARKER, SpanStyle::body());
        model.push_paragraph(para);
        model
    }

    /// Append `text` to the buffer and add a span covering it to `para`.
    ///
    /// Returns the new span's `(offset, length)`.
    pub fn append_span(
        &mut self,
        para: &mut ParagraphDescriptor,
        text: &str,
        style: SpanStyle,
    ) -> (usize, usize) {
        let (offset, length) = self.buffer.push_str(text);
        para.add_span(SpanDescriptor::new(offset, length, style));
        (offset, length)
    }

    /// Append a single character and add a one-character span to `para`.
    pub fn append_char(&mut self, para: &mut ParagraphDescriptor, c: char, style: SpanStyle) {
        let offset = self.buffer.push(c);
        para.add_span(SpanDescriptor::new(offset, 1, style));
    }

    /// Append an image placeholder and add an image descriptor to `para`.
    pub fn append_image(
        &mut self,
        para: &mut ParagraphDescriptor,
        data: Vec<u8>,
        style: SpanStyle,
    ) -> usize {
        let offset = self.buffer.push(IMAGE_PLACEHOLDER);
        para.add_image(ImageDescriptor::new(offset, data).with_style(style));
        offset
    }

    /// Add a finished paragraph.
    pub fn push_paragraph(&mut self, para: ParagraphDescriptor) {
        self.paragraphs.push(para);
    }

    /// Number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Check whether the model carries no paragraphs or no text.
    pub fn is_blank(&self) -> bool {
        self.paragraphs.is_empty() || self.buffer.is_empty()
    }

    /// Replace a blank model with [`SpanModel::empty_document`].
    pub fn ensure_non_empty(&mut self) {
        if self.is_blank() {
            log::debug!("blank document, substituting the empty-paragraph marker");
            *self = Self::empty_document();
        }
    }

    /// Text of one inline, clamped to the buffer.
    pub fn inline_text(&self, inline: &Inline) -> &str {
        self.buffer.slice_clamped(inline.offset(), inline.length())
    }

    /// Text of one span, clamped to the buffer.
    pub fn span_text(&self, span: &SpanDescriptor) -> &str {
        self.buffer.slice_clamped(span.offset, span.length)
    }

    /// Concatenated span text of a paragraph (images excluded).
    pub fn paragraph_text(&self, para: &ParagraphDescriptor) -> String {
        para.spans().map(|span| self.span_text(span)).collect()
    }

    /// Total number of image descriptors.
    pub fn image_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.images().count()).sum()
    }

    /// Check that every inline lies inside the buffer and that no two
    /// inlines overlap.
    pub fn validate(&self) -> Result<()> {
        let buffer_len = self.buffer.len();
        let mut ranges: Vec<(usize, usize)> = Vec::new();

        for item in self.paragraphs.iter().flat_map(|p| p.items.iter()) {
            let (offset, length) = (item.offset(), item.length());
            if offset.checked_add(length).map_or(true, |end| end > buffer_len) {
                return Err(Error::encoding(
                    offset,
                    length,
                    buffer_len,
                    "span extends past the end of the text buffer",
                ));
            }
            if let Inline::Image(image) = item {
                if image.length != 1 {
                    return Err(Error::encoding(
                        offset,
                        length,
                        buffer_len,
                        "image must occupy exactly one placeholder character",
                    ));
                }
            }
            if length > 0 {
                ranges.push((offset, offset + length));
            }
        }

        ranges.sort_unstable();
        for pair in ranges.windows(2) {
            if pair[1].0 < pair[0].1 {
                return Err(Error::encoding(
                    pair[1].0,
                    pair[1].1 - pair[1].0,
                    buffer_len,
                    "span overlaps the preceding span",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let model = SpanModel::empty_document();
        assert_eq!(model.paragraph_count(), 1);
        assert_eq!(model.buffer.as_str(), "\u{200B}");
        let spans: Vec<_> = model.paragraphs[0].spans().collect();
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].offset, spans[0].length), (0, 1));
    }

    #[test]
    fn test_ensure_non_empty() {
        let mut model = SpanModel::new();
        model.ensure_non_empty();
        assert_eq!(model, SpanModel::empty_document());

        let mut model = SpanModel::new();
        let mut para = ParagraphDescriptor::new(Alignment::End);
        model.append_span(&mut para, "x", SpanStyle::body());
        model.push_paragraph(para);
        let before = model.clone();
        model.ensure_non_empty();
        assert_eq!(model, before);
    }

    #[test]
    fn test_append_keeps_spans_contiguous() {
        let mut model = SpanModel::new();
        let mut para = ParagraphDescriptor::default();
        assert_eq!(model.append_span(&mut para, "Hello ", SpanStyle::body()), (0, 6));
        assert_eq!(model.append_span(&mut para, "world", SpanStyle::body()), (6, 5));
        assert_eq!(model.append_image(&mut para, vec![0xFF], SpanStyle::default()), 11);
        model.push_paragraph(para);

        assert_eq!(model.paragraph_text(&model.paragraphs[0]), "Hello world");
        assert_eq!(model.buffer.as_str().chars().last(), Some(IMAGE_PLACEHOLDER));
        assert_eq!(model.image_count(), 1);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_validate_out_of_range() {
        let mut model = SpanModel::with_buffer(TextBuffer::from_text("0123456789"));
        let mut para = ParagraphDescriptor::default();
        para.add_span(SpanDescriptor::new(5, 1000, SpanStyle::default()));
        model.push_paragraph(para);
        assert!(matches!(model.validate(), Err(Error::Encoding { offset: 5, .. })));
    }

    #[test]
    fn test_validate_overlap() {
        let mut model = SpanModel::with_buffer(TextBuffer::from_text("0123456789"));
        let mut para = ParagraphDescriptor::default();
        para.add_span(SpanDescriptor::new(0, 5, SpanStyle::default()));
        para.add_span(SpanDescriptor::new(3, 4, SpanStyle::default()));
        model.push_paragraph(para);
        assert!(model.validate().is_err());
    }
}
