//! # udfconv
//!
//! Document model codec between Word documents (DOCX), UDF and PDF.
//!
//! UDF is a zip-packaged XML format that stores the whole document text as
//! one string and describes paragraphs, styled runs and images as
//! `(offset, length)` windows into it. Every conversion in this crate
//! pivots through that representation, [`SpanModel`].
//!
//! ## Quick Start
//!
//! ```no_run
//! let outcome = udfconv::docx_to_udf("dilekce.docx", "dilekce.udf");
//! if outcome.success {
//!     println!("{}", outcome.message);
//! } else {
//!     eprintln!("{}", outcome.message);
//! }
//! ```
//!
//! Working with the model directly:
//!
//! ```no_run
//! use udfconv::{RichDocCodec, UdfCodec};
//!
//! fn main() -> udfconv::Result<()> {
//!     let bytes = std::fs::read("dilekce.udf")?;
//!     let model = UdfCodec::new().decode(&bytes)?;
//!     let doc = RichDocCodec::decode(&model);
//!     println!("{} paragraphs", doc.paragraph_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Offset-exact codec**: spans and images always point at the text they describe
//! - **Lenient or strict decoding**: clamp inconsistent offsets or reject them
//! - **PDF import/export** (`pdf` feature): lopdf-backed extraction and generation
//! - **Atomic output**: a destination file is either complete or absent
//! - **Parallel batches**: Uses Rayon across files

pub mod batch;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod options;
pub mod pdf;
pub mod richdoc;
pub mod udf;

// Re-export commonly used types
pub use batch::{bundle_outputs, convert_batch, convert_jobs, BatchEntry};
pub use convert::{
    convert_file, ConversionKind, ConversionOutcome, Converted, ConverterRegistry,
    DocumentConverter,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, SourceFormat};
pub use error::{Error, ErrorKind, Result};
pub use model::{
    Alignment, ImageDescriptor, Inline, ParagraphDescriptor, SpanDescriptor, SpanModel,
    SpanStyle, TextBuffer,
};
pub use options::{ConvertOptions, ErrorMode};
pub use pdf::{Flowable, PdfAdapter, PdfLayout};
pub use richdoc::{RichDocCodec, RichDocument, RichParagraph, RichRun};
pub use udf::{JsonFormat, UdfCodec};

use std::path::Path;

/// Convert a Word document to UDF.
///
/// Never fails: the outcome carries either the success message or the
/// categorized error.
///
/// # Example
///
/// ```no_run
/// let outcome = udfconv::docx_to_udf("dilekce.docx", "dilekce.udf");
/// assert!(outcome.success, "{}", outcome.message);
/// ```
pub fn docx_to_udf<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> ConversionOutcome {
    run(ConversionKind::DocxToUdf, src.as_ref(), dst.as_ref())
}

/// Convert a UDF file to a Word document.
pub fn udf_to_docx<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> ConversionOutcome {
    run(ConversionKind::UdfToDocx, src.as_ref(), dst.as_ref())
}

/// Convert a PDF to UDF, one paragraph per page.
///
/// Requires the `pdf` feature.
pub fn pdf_to_udf<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> ConversionOutcome {
    run(ConversionKind::PdfToUdf, src.as_ref(), dst.as_ref())
}

/// Convert a UDF file to PDF using the default A4 layout.
///
/// Requires the `pdf` feature.
pub fn udf_to_pdf<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> ConversionOutcome {
    run(ConversionKind::UdfToPdf, src.as_ref(), dst.as_ref())
}

fn run(kind: ConversionKind, src: &Path, dst: &Path) -> ConversionOutcome {
    convert_file(kind, src, dst, &ConvertOptions::default())
}
