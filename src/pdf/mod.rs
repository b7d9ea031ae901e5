//! PDF import and export through the span model.
//!
//! Import takes what a PDF extractor reports per page (plain text and
//! embedded raster images) and lays it into a [`SpanModel`]. Export turns a
//! span model into [`Flowable`]s: markup-annotated paragraphs and spacers
//! that the generator lays out onto pages.

mod layout;

#[cfg(feature = "pdf")]
mod backend;
#[cfg(feature = "pdf")]
mod generator;
#[cfg(feature = "pdf")]
mod metrics;

pub use layout::{PdfLayout, A4_HEIGHT, A4_WIDTH};

#[cfg(feature = "pdf")]
pub use backend::extract_pages;
#[cfg(feature = "pdf")]
pub use generator::generate;

use quick_xml::escape::escape;

use crate::error::{Error, Result};
use crate::model::{Alignment, ParagraphDescriptor, SpanModel, SpanStyle};
use crate::options::ErrorMode;

/// Source encoding of an extracted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// JPEG stream (`DCTDecode`)
    Jpeg,
    /// PNG file
    Png,
    /// Uncompressed 8-bit samples
    Raw {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
        /// Samples per pixel (1 = gray, 3 = RGB)
        components: u8,
    },
}

/// A raster image embedded in a PDF page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedImage {
    /// Encoded or raw sample bytes
    pub data: Vec<u8>,
    /// How `data` is encoded
    pub encoding: ImageEncoding,
}

impl ExtractedImage {
    /// Create an extracted image.
    pub fn new(data: Vec<u8>, encoding: ImageEncoding) -> Self {
        Self { data, encoding }
    }
}

/// Text and images of one PDF page, in extraction order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedPage {
    /// Plain page text
    pub text: String,
    /// Embedded raster images
    pub images: Vec<ExtractedImage>,
}

impl ExtractedPage {
    /// Create a page with text only.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            images: Vec::new(),
        }
    }

    /// Add an image.
    pub fn with_image(mut self, image: ExtractedImage) -> Self {
        self.images.push(image);
        self
    }
}

/// Paragraph alignment understood by the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PdfAlignment {
    /// Ragged right
    #[default]
    Left,
    /// Centered
    Center,
    /// Ragged left
    Right,
    /// Both edges flush, last line left
    Justify,
}

impl From<Alignment> for PdfAlignment {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::Start => PdfAlignment::Left,
            Alignment::Center => PdfAlignment::Center,
            Alignment::End => PdfAlignment::Right,
            Alignment::Justify => PdfAlignment::Justify,
        }
    }
}

/// A paragraph of inline markup (`<b>`, `<i>`, XML escapes).
#[derive(Debug, Clone, PartialEq)]
pub struct StyledParagraph {
    /// Escaped text with bold/italic tags
    pub markup: String,
    /// Paragraph alignment
    pub alignment: PdfAlignment,
}

/// One unit of PDF page flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Flowable {
    /// Styled paragraph
    Paragraph(StyledParagraph),
    /// Vertical gap in points
    Spacer(f32),
}

/// Style of the images the importer writes.
fn imported_image_style() -> SpanStyle {
    SpanStyle::body().with_size(10.0)
}

/// Projects PDF content into and out of the span model.
#[derive(Debug, Clone, Default)]
pub struct PdfAdapter {
    mode: ErrorMode,
    layout: PdfLayout,
}

impl PdfAdapter {
    /// Create an adapter with lenient error handling and the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error handling mode used when re-encoding images.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the layout; its paragraph spacing sizes the exported spacers.
    pub fn with_layout(mut self, layout: PdfLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Build a span model from extracted pages.
    ///
    /// Each page becomes one paragraph: a body-styled span over the page
    /// text followed by one image descriptor per image. Pages are separated
    /// by a paragraph holding a single unstyled `\n` span.
    pub fn import(&self, pages: &[ExtractedPage]) -> Result<SpanModel> {
        let mut model = SpanModel::new();

        for (index, page) in pages.iter().enumerate() {
            let mut para = ParagraphDescriptor::default();

            if !page.text.is_empty() {
                model.append_span(&mut para, &page.text, SpanStyle::body());
            }

            for (image_index, image) in page.images.iter().enumerate() {
                match reencode_png(image) {
                    Ok(png) => {
                        model.append_image(&mut para, png, imported_image_style());
                    }
                    Err(e) if self.mode.is_lenient() => {
                        log::warn!(
                            "skipping image {} on page {}: {}",
                            image_index + 1,
                            index + 1,
                            e
                        );
                    }
                    Err(e) => return Err(e),
                }
            }

            if !para.is_empty() {
                model.push_paragraph(para);
            }

            if index + 1 < pages.len() {
                let mut separator = ParagraphDescriptor::default();
                model.append_span(&mut separator, "\n", SpanStyle::default());
                model.push_paragraph(separator);
            }
        }

        log::debug!(
            "imported {} pages: {} characters, {} images",
            pages.len(),
            model.buffer.len(),
            model.image_count()
        );

        model.ensure_non_empty();
        Ok(model)
    }

    /// Project a span model into paragraphs and spacers.
    ///
    /// Images are not rendered. Paragraphs whose text is empty or whitespace
    /// are dropped; every kept paragraph is followed by a spacer. A paragraph
    /// holding only the empty-paragraph marker is kept and renders as a
    /// blank line.
    pub fn export(&self, model: &SpanModel) -> Vec<Flowable> {
        let mut flow = Vec::with_capacity(model.paragraph_count() * 2);

        for para in &model.paragraphs {
            let mut markup = String::new();
            let mut has_text = false;

            for span in para.spans() {
                let text = model.span_text(span);
                has_text |= !text.trim().is_empty();
                push_markup(&mut markup, text, &span.style);
            }

            if !has_text {
                continue;
            }

            flow.push(Flowable::Paragraph(StyledParagraph {
                markup,
                alignment: para.alignment.into(),
            }));
            flow.push(Flowable::Spacer(self.layout.paragraph_spacing));
        }

        flow
    }
}

/// Append `text` escaped and wrapped in tags matching its bold/italic flags.
fn push_markup(markup: &mut String, text: &str, style: &SpanStyle) {
    let escaped = escape(text);
    match (style.bold, style.italic) {
        (true, true) => {
            markup.push_str("<b><i>");
            markup.push_str(&escaped);
            markup.push_str("</i></b>");
        }
        (true, false) => {
            markup.push_str("<b>");
            markup.push_str(&escaped);
            markup.push_str("</b>");
        }
        (false, true) => {
            markup.push_str("<i>");
            markup.push_str(&escaped);
            markup.push_str("</i>");
        }
        (false, false) => markup.push_str(&escaped),
    }
}

/// Re-encode an extracted image as PNG.
#[cfg(feature = "pdf")]
fn reencode_png(image: &ExtractedImage) -> Result<Vec<u8>> {
    use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    let decoded = match image.encoding {
        ImageEncoding::Png => image::load_from_memory_with_format(&image.data, ImageFormat::Png)?,
        ImageEncoding::Jpeg => {
            image::load_from_memory_with_format(&image.data, ImageFormat::Jpeg)?
        }
        ImageEncoding::Raw {
            width,
            height,
            components,
        } => {
            let expected = width as usize * height as usize * components as usize;
            if image.data.len() < expected {
                return Err(Error::Image(format!(
                    "{}x{} image with {} components needs {} bytes, got {}",
                    width,
                    height,
                    components,
                    expected,
                    image.data.len()
                )));
            }
            let samples = image.data[..expected].to_vec();
            let decoded = match components {
                1 => GrayImage::from_raw(width, height, samples).map(DynamicImage::ImageLuma8),
                3 => RgbImage::from_raw(width, height, samples).map(DynamicImage::ImageRgb8),
                n => {
                    return Err(Error::Image(format!(
                        "unsupported component count {}",
                        n
                    )))
                }
            };
            decoded.ok_or_else(|| {
                Error::Image("image buffer does not match dimensions".to_string())
            })?
        }
    };

    let mut out = Cursor::new(Vec::new());
    decoded.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Without the image codecs only PNG input can be carried through as is.
#[cfg(not(feature = "pdf"))]
fn reencode_png(image: &ExtractedImage) -> Result<Vec<u8>> {
    match image.encoding {
        ImageEncoding::Png => Ok(image.data.clone()),
        _ => Err(Error::UnsupportedCapability("Image re-encoding")),
    }
}
