//! Run-based rich-text documents (the word-processor model).
//!
//! A [`RichDocument`] is an ordered list of paragraphs, each with an optional
//! alignment and ordered styled runs. It is read from and written to DOCX by
//! [`read_docx`] and [`write_docx`], and mapped to and from the span model by
//! [`RichDocCodec`].

mod codec;
mod docx;

pub use codec::RichDocCodec;
pub use docx::{read_docx, write_docx};

use serde::Serialize;

use crate::model::Alignment;

/// A rich-text document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RichDocument {
    /// Paragraphs in document order
    pub paragraphs: Vec<RichParagraph>,
}

impl RichDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a paragraph.
    pub fn add_paragraph(&mut self, paragraph: RichParagraph) {
        self.paragraphs.push(paragraph);
    }

    /// Number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }
}

/// A paragraph of styled runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RichParagraph {
    /// Declared alignment; `None` when absent or unrecognized
    pub alignment: Option<Alignment>,
    /// Full paragraph text as read from the source
    text: String,
    /// Styled runs in order
    pub runs: Vec<RichRun>,
}

impl RichParagraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph holding plain text without any runs.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Append a run (builder form).
    pub fn with_run(mut self, run: RichRun) -> Self {
        self.add_run(run);
        self
    }

    /// Append a run; its text extends the paragraph text.
    pub fn add_run(&mut self, run: RichRun) {
        self.text.push_str(&run.text);
        self.runs.push(run);
    }

    /// Full paragraph text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check whether the runs spell out exactly the paragraph text.
    pub fn runs_cover_text(&self) -> bool {
        if self.runs.is_empty() {
            return false;
        }
        let mut rest = self.text.as_str();
        for run in &self.runs {
            match rest.strip_prefix(run.text.as_str()) {
                Some(tail) => rest = tail,
                None => return false,
            }
        }
        rest.is_empty()
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RichRun {
    /// The text content
    pub text: String,
    /// Font family, if declared
    pub font_family: Option<String>,
    /// Font size in points, if declared
    pub font_size: Option<f32>,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
}

impl RichRun {
    /// Create a new run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set bold.
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic.
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set the font size in points.
    pub fn size(mut self, points: f32) -> Self {
        self.font_size = Some(points);
        self
    }

    /// Set the font family.
    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
