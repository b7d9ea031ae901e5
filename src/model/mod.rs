//! Span model types shared by every conversion.
//!
//! This module defines the intermediate representation (IR) that every
//! conversion pivots through: a single text buffer and an ordered list of
//! paragraphs whose spans and images are `(offset, length)` windows into it.
//! Spans never own their text.

mod buffer;
mod document;
mod span;

pub use buffer::{TextBuffer, EMPTY_MARKER, IMAGE_PLACEHOLDER};
pub use document::SpanModel;
pub use span::{
    Alignment, ImageDescriptor, Inline, ParagraphDescriptor, SpanDescriptor, SpanStyle,
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE,
};
