//! Paragraph, span and image descriptors.

use base64::Engine;
use serde::{Serialize, Serializer};

/// Font family used when a run does not declare one.
pub const DEFAULT_FONT_FAMILY: &str = "Times New Roman";

/// Font size in points used when a run does not declare one.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Start (left in LTR text), the default
    #[default]
    Start,
    /// Centered
    Center,
    /// End (right in LTR text)
    End,
    /// Justified
    Justify,
}

impl Alignment {
    /// The numeric code stored in the UDF `Alignment` attribute.
    pub fn code(&self) -> &'static str {
        match self {
            Alignment::Start => "0",
            Alignment::Center => "1",
            Alignment::End => "2",
            Alignment::Justify => "3",
        }
    }

    /// Parse a UDF alignment code. Unknown codes map to [`Alignment::Start`].
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => Alignment::Center,
            "2" => Alignment::End,
            "3" => Alignment::Justify,
            "0" => Alignment::Start,
            other => {
                log::debug!("unknown alignment code {:?}, using start", other);
                Alignment::Start
            }
        }
    }
}

/// Character styling attached to a span.
///
/// `family` and `size` are optional so that unstyled spans (such as page
/// separators) survive a UDF round trip without gaining attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpanStyle {
    /// Font family name
    pub family: Option<String>,
    /// Font size in points
    pub size: Option<f32>,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
}

impl SpanStyle {
    /// The body style: Times New Roman, 12pt, upright.
    pub fn body() -> Self {
        Self {
            family: Some(DEFAULT_FONT_FAMILY.to_string()),
            size: Some(DEFAULT_FONT_SIZE),
            bold: false,
            italic: false,
        }
    }

    /// Set the font family.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Set the font size in points.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set bold.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Font family, falling back to the default.
    pub fn family_or_default(&self) -> &str {
        self.family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY)
    }

    /// Font size, falling back to the default.
    pub fn size_or_default(&self) -> f32 {
        self.size.unwrap_or(DEFAULT_FONT_SIZE)
    }
}

/// A styled run of characters, stored as a window into the text buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanDescriptor {
    /// First character, in scalar values from the buffer start
    pub offset: usize,
    /// Number of characters
    pub length: usize,
    /// Styling
    pub style: SpanStyle,
}

impl SpanDescriptor {
    /// Create a span descriptor.
    pub fn new(offset: usize, length: usize, style: SpanStyle) -> Self {
        Self {
            offset,
            length,
            style,
        }
    }

    /// End offset (exclusive).
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }
}

/// An inline image occupying one placeholder character of the buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageDescriptor {
    /// Offset of the placeholder character
    pub offset: usize,
    /// Always 1 for images produced by this crate
    pub length: usize,
    /// Encoded image bytes (PNG for PDF imports)
    #[serde(serialize_with = "serialize_base64")]
    pub data: Vec<u8>,
    /// Styling carried by the UDF `<image>` element
    pub style: SpanStyle,
}

impl ImageDescriptor {
    /// Create an image descriptor at `offset`.
    pub fn new(offset: usize, data: Vec<u8>) -> Self {
        Self {
            offset,
            length: 1,
            data,
            style: SpanStyle::default(),
        }
    }

    /// Set the style.
    pub fn with_style(mut self, style: SpanStyle) -> Self {
        self.style = style;
        self
    }

    /// End offset (exclusive).
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }
}

fn serialize_base64<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
}

/// Inline content of a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    /// Styled text
    Span(SpanDescriptor),
    /// Embedded image
    Image(ImageDescriptor),
}

impl Inline {
    /// Start offset.
    pub fn offset(&self) -> usize {
        match self {
            Inline::Span(s) => s.offset,
            Inline::Image(i) => i.offset,
        }
    }

    /// Length in characters.
    pub fn length(&self) -> usize {
        match self {
            Inline::Span(s) => s.length,
            Inline::Image(i) => i.length,
        }
    }

    /// End offset (exclusive).
    pub fn end(&self) -> usize {
        self.offset().saturating_add(self.length())
    }
}

/// One paragraph: alignment, indents and an ordered list of inlines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParagraphDescriptor {
    /// Paragraph alignment
    pub alignment: Alignment,
    /// Left indent in points
    pub left_indent: f32,
    /// Right indent in points
    pub right_indent: f32,
    /// Spans and images in document order
    pub items: Vec<Inline>,
}

impl ParagraphDescriptor {
    /// Create an empty paragraph with the given alignment.
    pub fn new(alignment: Alignment) -> Self {
        Self {
            alignment,
            ..Default::default()
        }
    }

    /// Add a span.
    pub fn add_span(&mut self, span: SpanDescriptor) {
        self.items.push(Inline::Span(span));
    }

    /// Add an image.
    pub fn add_image(&mut self, image: ImageDescriptor) {
        self.items.push(Inline::Image(image));
    }

    /// Iterate over the text spans only.
    pub fn spans(&self) -> impl Iterator<Item = &SpanDescriptor> {
        self.items.iter().filter_map(|item| match item {
            Inline::Span(s) => Some(s),
            Inline::Image(_) => None,
        })
    }

    /// Iterate over the images only.
    pub fn images(&self) -> impl Iterator<Item = &ImageDescriptor> {
        self.items.iter().filter_map(|item| match item {
            Inline::Image(i) => Some(i),
            Inline::Span(_) => None,
        })
    }

    /// Check if the paragraph has no inlines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_codes() {
        for alignment in [
            Alignment::Start,
            Alignment::Center,
            Alignment::End,
            Alignment::Justify,
        ] {
            assert_eq!(Alignment::from_code(alignment.code()), alignment);
        }
        assert_eq!(Alignment::from_code("9"), Alignment::Start);
        assert_eq!(Alignment::from_code(""), Alignment::Start);
    }

    #[test]
    fn test_span_style_defaults() {
        let style = SpanStyle::default();
        assert_eq!(style.family_or_default(), "Times New Roman");
        assert_eq!(style.size_or_default(), 12.0);
        assert!(style.family.is_none());

        let body = SpanStyle::body();
        assert_eq!(body.family.as_deref(), Some("Times New Roman"));
        assert_eq!(body.size, Some(12.0));
    }

    #[test]
    fn test_paragraph_filters() {
        let mut para = ParagraphDescriptor::new(Alignment::Center);
        para.add_span(SpanDescriptor::new(0, 3, SpanStyle::body()));
        para.add_image(ImageDescriptor::new(3, vec![1, 2, 3]));
        assert_eq!(para.spans().count(), 1);
        assert_eq!(para.images().count(), 1);
        assert_eq!(para.items[1].end(), 4);
    }
}
