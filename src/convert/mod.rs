//! Document converters and the conversion boundary.
//!
//! Every converter pivots through [`SpanModel`](crate::model::SpanModel):
//! DOCX and PDF sources are encoded into it and written out as UDF, UDF
//! sources are decoded from it and written out as DOCX or PDF. Converters
//! are registered by name and by `(source, target)` extension pair.
//!
//! # Example
//!
//! ```no_run
//! use udfconv::convert::{ConversionKind, ConvertOptions, convert_file};
//! use std::path::Path;
//!
//! let outcome = convert_file(
//!     ConversionKind::DocxToUdf,
//!     Path::new("dilekce.docx"),
//!     Path::new("dilekce.udf"),
//!     &ConvertOptions::default(),
//! );
//! println!("{}", outcome.message);
//! ```

mod docx;
mod pdf;

pub use docx::{DocxToUdf, UdfToDocx};
pub use pdf::{PdfToUdf, UdfToPdf};

pub use crate::options::{ConvertOptions, ErrorMode};

use crate::error::{Error, ErrorKind, Result};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Bytes produced by a converter.
#[derive(Debug, Clone)]
pub struct Converted {
    /// Target document bytes
    pub bytes: Vec<u8>,

    /// Extra detail for the status message (e.g. page count)
    pub note: Option<String>,
}

impl Converted {
    /// Create a conversion result without a note.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, note: None }
    }

    /// Attach a note for the status message.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Trait for document converters.
///
/// A converter turns one source format into one target format. Extensions
/// are lowercase without the leading dot (e.g. `"udf"`).
pub trait DocumentConverter: Send + Sync {
    /// Get the name of this converter (e.g. `"docx-to-udf"`).
    fn name(&self) -> &str;

    /// Source file extension.
    fn source_extension(&self) -> &str;

    /// Target file extension.
    fn target_extension(&self) -> &str;

    /// Convert an in-memory document. `source_name` labels errors.
    fn convert_bytes(
        &self,
        bytes: &[u8],
        source_name: &str,
        options: &ConvertOptions,
    ) -> Result<Converted>;

    /// Convert the file at `path`.
    fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<Converted> {
        let name = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|e| Error::source_read(name.as_str(), e))?;
        self.convert_bytes(&bytes, &name, options)
    }

    /// Check if this converter handles `source` → `target`.
    fn supports(&self, source: &str, target: &str) -> bool {
        self.source_extension().eq_ignore_ascii_case(source)
            && self.target_extension().eq_ignore_ascii_case(target)
    }
}

/// The four supported conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    /// Word document to UDF
    DocxToUdf,
    /// UDF to Word document
    UdfToDocx,
    /// PDF to UDF
    PdfToUdf,
    /// UDF to PDF
    UdfToPdf,
}

impl ConversionKind {
    /// All conversions.
    pub const ALL: [ConversionKind; 4] = [
        ConversionKind::DocxToUdf,
        ConversionKind::UdfToDocx,
        ConversionKind::PdfToUdf,
        ConversionKind::UdfToPdf,
    ];

    /// Registry name of the conversion.
    pub fn name(&self) -> &'static str {
        match self {
            ConversionKind::DocxToUdf => "docx-to-udf",
            ConversionKind::UdfToDocx => "udf-to-docx",
            ConversionKind::PdfToUdf => "pdf-to-udf",
            ConversionKind::UdfToPdf => "udf-to-pdf",
        }
    }

    /// Look up a conversion by name (`docx-to-udf`, `docx_to_udf`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Source file extension.
    pub fn source_extension(&self) -> &'static str {
        match self {
            ConversionKind::DocxToUdf => "docx",
            ConversionKind::PdfToUdf => "pdf",
            ConversionKind::UdfToDocx | ConversionKind::UdfToPdf => "udf",
        }
    }

    /// Target file extension.
    pub fn target_extension(&self) -> &'static str {
        match self {
            ConversionKind::DocxToUdf | ConversionKind::PdfToUdf => "udf",
            ConversionKind::UdfToDocx => "docx",
            ConversionKind::UdfToPdf => "pdf",
        }
    }

    /// The converter implementing this conversion.
    pub fn converter(&self) -> Arc<dyn DocumentConverter> {
        match self {
            ConversionKind::DocxToUdf => Arc::new(DocxToUdf::new()),
            ConversionKind::UdfToDocx => Arc::new(UdfToDocx::new()),
            ConversionKind::PdfToUdf => Arc::new(PdfToUdf::new()),
            ConversionKind::UdfToPdf => Arc::new(UdfToPdf::new()),
        }
    }

    fn success_message(&self) -> String {
        format!(
            "{} successfully converted to {}",
            self.source_extension().to_ascii_uppercase(),
            self.target_extension().to_ascii_uppercase()
        )
    }
}

impl std::fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Registry for document converters.
///
/// The registry maps names and `(source, target)` extension pairs to
/// converters.
pub struct ConverterRegistry {
    by_pair: HashMap<(String, String), Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            by_pair: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the four built-in converters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in ConversionKind::ALL {
            registry.register(kind.converter());
        }
        registry
    }

    /// Register a converter under its name and extension pair.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        let pair = (
            converter.source_extension().to_lowercase(),
            converter.target_extension().to_lowercase(),
        );
        self.by_pair.insert(pair, converter.clone());
        self.by_name
            .insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Get the converter for `source` → `target` extensions.
    pub fn get_by_extensions(
        &self,
        source: &str,
        target: &str,
    ) -> Option<Arc<dyn DocumentConverter>> {
        self.by_pair
            .get(&(source.to_lowercase(), target.to_lowercase()))
            .cloned()
    }

    /// Check if `source` → `target` is supported.
    pub fn supports(&self, source: &str, target: &str) -> bool {
        self.get_by_extensions(source, target).is_some()
    }

    /// All registered `(source, target)` pairs, sorted.
    pub fn supported_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<_> = self
            .by_pair
            .keys()
            .map(|(s, t)| (s.as_str(), t.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Convert the file at `path` to the `target` extension.
    pub fn convert(&self, path: &Path, target: &str, options: &ConvertOptions) -> Result<Converted> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::Other("File has no extension".into()))?;

        self.lookup(ext, target)?.convert(path, options)
    }

    /// Convert bytes of the `source` extension to the `target` extension.
    pub fn convert_bytes(
        &self,
        bytes: &[u8],
        source: &str,
        target: &str,
        options: &ConvertOptions,
    ) -> Result<Converted> {
        self.lookup(source, target)?
            .convert_bytes(bytes, "<memory>", options)
    }

    fn lookup(&self, source: &str, target: &str) -> Result<Arc<dyn DocumentConverter>> {
        self.get_by_extensions(source, target).ok_or_else(|| {
            Error::UnsupportedConversion(format!("{} to {}", source, target))
        })
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Result of one file conversion at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    /// Whether the output file was written
    pub success: bool,

    /// Human-readable status
    pub message: String,

    /// Error category on failure
    pub error_kind: Option<ErrorKind>,

    /// Output path on success
    pub output: Option<PathBuf>,
}

impl ConversionOutcome {
    /// A successful conversion that wrote `output`.
    pub fn success(message: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_kind: None,
            output: Some(output.into()),
        }
    }

    /// A failed conversion.
    pub fn failure(error: &Error) -> Self {
        let kind = error.kind();
        Self {
            success: false,
            message: format!("{}: {}", kind.summary(), error),
            error_kind: Some(kind),
            output: None,
        }
    }
}

/// Convert `src` into `dst` and report the result.
///
/// Never fails: errors become a failed [`ConversionOutcome`]. The output
/// is written to a temporary file next to `dst` and moved into place, so
/// `dst` is either complete or untouched.
pub fn convert_file(
    kind: ConversionKind,
    src: &Path,
    dst: &Path,
    options: &ConvertOptions,
) -> ConversionOutcome {
    convert_with(kind.converter().as_ref(), kind.success_message(), src, dst, options)
}

/// Like [`convert_file`] for any converter.
pub fn convert_file_with(
    converter: &dyn DocumentConverter,
    src: &Path,
    dst: &Path,
    options: &ConvertOptions,
) -> ConversionOutcome {
    let message = format!(
        "{} successfully converted to {}",
        converter.source_extension().to_ascii_uppercase(),
        converter.target_extension().to_ascii_uppercase()
    );
    convert_with(converter, message, src, dst, options)
}

fn convert_with(
    converter: &dyn DocumentConverter,
    message: String,
    src: &Path,
    dst: &Path,
    options: &ConvertOptions,
) -> ConversionOutcome {
    log::info!(
        "{}: {} -> {}",
        converter.name(),
        src.display(),
        dst.display()
    );

    let result = converter
        .convert(src, options)
        .and_then(|converted| write_atomic(dst, &converted.bytes).map(|_| converted.note));

    match result {
        Ok(Some(note)) => ConversionOutcome::success(format!("{message} ({note})"), dst),
        Ok(None) => ConversionOutcome::success(message, dst),
        Err(e) => {
            log::warn!("{} failed for {}: {}", converter.name(), src.display(), e);
            ConversionOutcome::failure(&e)
        }
    }
}

/// Write `bytes` to `dst` through a temporary file in the same directory.
pub fn write_atomic(dst: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dst).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
