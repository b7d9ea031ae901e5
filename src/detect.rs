//! Source format detection.

use crate::error::{Error, Result};
use crate::udf::CONTENT_ENTRY;
use std::io::Cursor;
use std::path::Path;

/// A document format this crate can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// PDF document
    Pdf,
    /// UDF archive (zip with `content.xml`)
    Udf,
    /// Word document (zip with `word/document.xml`)
    Docx,
}

impl SourceFormat {
    /// Conventional file extension, lowercase without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Pdf => "pdf",
            SourceFormat::Udf => "udf",
            SourceFormat::Docx => "docx",
        }
    }

    /// Parse a file extension (case-insensitive, leading dot allowed).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(SourceFormat::Pdf),
            "udf" => Some(SourceFormat::Udf),
            "docx" => Some(SourceFormat::Docx),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SourceFormat::Pdf => "PDF",
            SourceFormat::Udf => "UDF",
            SourceFormat::Docx => "DOCX",
        })
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Local file header signature of a zip archive.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Word body part inside a DOCX archive.
const DOCX_BODY: &str = "word/document.xml";

/// Detect the format of a file.
///
/// # Example
/// ```no_run
/// use udfconv::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("dilekce.udf").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let data = std::fs::read(path)?;
    detect_format_from_bytes(&data)
}

/// Detect the format of an in-memory document.
///
/// PDFs are recognised by their header. Zip archives are told apart by
/// their entries, so the whole archive must be present.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<SourceFormat> {
    if is_pdf_bytes(data) {
        return Ok(SourceFormat::Pdf);
    }
    if !data.starts_with(ZIP_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|_| Error::UnknownFormat)?;
    let mut names = archive.file_names();
    let format = names.find_map(|name| match name {
        CONTENT_ENTRY => Some(SourceFormat::Udf),
        DOCX_BODY => Some(SourceFormat::Docx),
        _ => None,
    });

    format.ok_or(Error::UnknownFormat)
}

/// Check if bytes start with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}
