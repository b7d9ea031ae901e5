//! Conversion options and configuration.

use crate::pdf::PdfLayout;

/// How malformed input is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Fail on the first inconsistency
    Strict,
    /// Clamp out-of-range spans, default unparsable numbers, skip bad images
    #[default]
    Lenient,
}

impl ErrorMode {
    /// Check if this is lenient mode.
    pub fn is_lenient(&self) -> bool {
        matches!(self, ErrorMode::Lenient)
    }
}

/// Options for a single conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Page geometry and text metrics for PDF output
    pub layout: PdfLayout,
}

impl ConvertOptions {
    /// Create new conversion options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail on the first inconsistency.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Tolerate slightly malformed input (the default).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set PDF page layout.
    pub fn with_layout(mut self, layout: PdfLayout) -> Self {
        self.layout = layout;
        self
    }
}
