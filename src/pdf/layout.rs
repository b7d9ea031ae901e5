//! Page geometry for generated PDFs.

/// A4 width in points.
pub const A4_WIDTH: f32 = 595.276;

/// A4 height in points.
pub const A4_HEIGHT: f32 = 841.89;

/// Page geometry and body text metrics used by the PDF generator.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    /// Page width in points
    pub page_width: f32,
    /// Page height in points
    pub page_height: f32,
    /// Left margin in points
    pub margin_left: f32,
    /// Right margin in points
    pub margin_right: f32,
    /// Top margin in points
    pub margin_top: f32,
    /// Bottom margin in points
    pub margin_bottom: f32,
    /// Body font size in points
    pub font_size: f32,
    /// Baseline-to-baseline distance in points
    pub leading: f32,
    /// Vertical space after each paragraph in points
    pub paragraph_spacing: f32,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin_left: 72.0,
            margin_right: 72.0,
            margin_top: 72.0,
            margin_bottom: 72.0,
            font_size: 10.0,
            leading: 12.0,
            paragraph_spacing: 5.0,
        }
    }
}

impl PdfLayout {
    /// Create the default A4 layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size in points.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set all four margins in points.
    pub fn with_margins(mut self, margin: f32) -> Self {
        self.margin_left = margin;
        self.margin_right = margin;
        self.margin_top = margin;
        self.margin_bottom = margin;
        self
    }

    /// Set the body font size; leading follows at 1.2×.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self.leading = size * 1.2;
        self
    }

    /// Set the space after each paragraph.
    pub fn with_paragraph_spacing(mut self, spacing: f32) -> Self {
        self.paragraph_spacing = spacing;
        self
    }

    /// Width available to a line of text.
    pub fn text_width(&self) -> f32 {
        (self.page_width - self.margin_left - self.margin_right).max(1.0)
    }
}
