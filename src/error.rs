//! Error types for udfconv library.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for udfconv operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting documents.
#[derive(Error, Debug)]
pub enum Error {
    /// The source document could not be read (corrupt or unreadable container).
    #[error("Cannot read source document {path}: {reason}")]
    SourceRead {
        /// Source name (file name or `<memory>`)
        path: String,
        /// What went wrong
        reason: String,
    },

    /// The UDF archive does not contain the expected `content.xml` entry.
    #[error("Invalid UDF container: {0}")]
    InvalidContainer(String),

    /// The UDF `content` section is absent or empty.
    #[error("UDF content not found: {0}")]
    MissingContent(String),

    /// A required capability (PDF reading or writing) is not available.
    #[error("{0} support is not available in this build")]
    UnsupportedCapability(&'static str),

    /// An offset/length pair is inconsistent with the text buffer.
    #[error("Span [{offset}, +{length}) is invalid for a buffer of {buffer_len} characters: {reason}")]
    Encoding {
        /// Span start offset
        offset: usize,
        /// Span length
        length: usize,
        /// Length of the text buffer in characters
        buffer_len: usize,
        /// Description of the inconsistency
        reason: String,
    },

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// Zip archive error.
    #[error("Zip error: {0}")]
    Zip(String),

    /// Image decoding or re-encoding error.
    #[error("Image error: {0}")]
    Image(String),

    /// PDF structure error while reading.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// The PDF output could not be laid out or serialized.
    #[error("PDF generation failed: {0}")]
    PdfGeneration(String),

    /// The input is not a PDF, UDF or DOCX document.
    #[error("Unknown or unsupported document format")]
    UnknownFormat,

    /// No converter exists for the requested source/target pair.
    #[error("Unsupported conversion: {0}")]
    UnsupportedConversion(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Tagged error category, used to render one message per kind at the
/// conversion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unreadable or corrupt source document
    SourceRead,
    /// UDF zip without `content.xml`
    InvalidContainer,
    /// UDF `content` section absent or empty
    MissingContent,
    /// PDF reading or writing unavailable
    UnsupportedCapability,
    /// Offset/length inconsistency
    Encoding,
    /// File system failure around the conversion
    Io,
    /// Anything else
    Internal,
}

impl ErrorKind {
    /// Short human-readable summary for this kind.
    pub fn summary(&self) -> &'static str {
        match self {
            ErrorKind::SourceRead => "Source document could not be read",
            ErrorKind::InvalidContainer => "Invalid UDF file",
            ErrorKind::MissingContent => "No content found",
            ErrorKind::UnsupportedCapability => "Required PDF support is not installed",
            ErrorKind::Encoding => "Inconsistent text offsets",
            ErrorKind::Io => "File system error",
            ErrorKind::Internal => "Conversion failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.summary())
    }
}

impl Error {
    /// Build a [`Error::SourceRead`] for the given source name.
    pub fn source_read(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::SourceRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`Error::Encoding`] for an out-of-range or overlapping span.
    pub fn encoding(
        offset: usize,
        length: usize,
        buffer_len: usize,
        reason: impl Into<String>,
    ) -> Self {
        Error::Encoding {
            offset,
            length,
            buffer_len,
            reason: reason.into(),
        }
    }

    /// The tagged category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SourceRead { .. }
            | Error::UnknownFormat
            | Error::Xml(_)
            | Error::Image(_)
            | Error::Pdf(_) => ErrorKind::SourceRead,
            Error::InvalidContainer(_) | Error::Zip(_) => ErrorKind::InvalidContainer,
            Error::MissingContent(_) => ErrorKind::MissingContent,
            Error::UnsupportedCapability(_) => ErrorKind::UnsupportedCapability,
            Error::Encoding { .. } => ErrorKind::Encoding,
            Error::Io(_) => ErrorKind::Io,
            Error::PdfGeneration(_) | Error::UnsupportedConversion(_) | Error::Other(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => {
                Error::InvalidContainer("required archive entry is missing".to_string())
            }
            _ => Error::Zip(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}

#[cfg(feature = "pdf")]
impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedCapability("PDF generation");
        assert_eq!(
            err.to_string(),
            "PDF generation support is not available in this build"
        );

        let err = Error::encoding(5, 1000, 10, "span exceeds buffer");
        assert_eq!(
            err.to_string(),
            "Span [5, +1000) is invalid for a buffer of 10 characters: span exceeds buffer"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            Error::InvalidContainer("x".into()).kind(),
            ErrorKind::InvalidContainer
        );
        assert_eq!(Error::source_read("a.docx", "bad").kind(), ErrorKind::SourceRead);
        assert_eq!(Error::encoding(0, 1, 0, "x").kind(), ErrorKind::Encoding);
        assert_eq!(Error::Pdf("x".into()).kind(), ErrorKind::SourceRead);
        assert_eq!(
            Error::PdfGeneration("cannot write PDF".into()).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_zip_missing_entry_is_invalid_container() {
        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, Error::InvalidContainer(_)));
    }
}
