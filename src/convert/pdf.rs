//! PDF ↔ UDF converters.
//!
//! Both need the `pdf` feature; without it they fail with
//! [`UnsupportedCapability`](crate::error::Error::UnsupportedCapability),
//! logged once per process.

use crate::error::Result;
use crate::pdf::PdfAdapter;
use crate::udf::UdfCodec;

use super::{ConvertOptions, Converted, DocumentConverter};

/// PDF to UDF.
#[derive(Debug, Clone, Default)]
pub struct PdfToUdf {
    _private: (),
}

impl PdfToUdf {
    /// Create a new PDF → UDF converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for PdfToUdf {
    fn name(&self) -> &str {
        "pdf-to-udf"
    }

    fn source_extension(&self) -> &str {
        "pdf"
    }

    fn target_extension(&self) -> &str {
        "udf"
    }

    fn convert_bytes(
        &self,
        bytes: &[u8],
        source_name: &str,
        options: &ConvertOptions,
    ) -> Result<Converted> {
        let pages = extract(bytes, source_name, options)?;
        let model = PdfAdapter::new()
            .with_error_mode(options.error_mode)
            .import(&pages)?;
        let udf = UdfCodec::new()
            .with_error_mode(options.error_mode)
            .encode(&model)?;
        Ok(Converted::new(udf).with_note(format!("{} pages", pages.len())))
    }
}

/// UDF to PDF.
#[derive(Debug, Clone, Default)]
pub struct UdfToPdf {
    _private: (),
}

impl UdfToPdf {
    /// Create a new UDF → PDF converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for UdfToPdf {
    fn name(&self) -> &str {
        "udf-to-pdf"
    }

    fn source_extension(&self) -> &str {
        "udf"
    }

    fn target_extension(&self) -> &str {
        "pdf"
    }

    fn convert_bytes(
        &self,
        bytes: &[u8],
        _source_name: &str,
        options: &ConvertOptions,
    ) -> Result<Converted> {
        ensure_generation()?;
        let model = UdfCodec::new()
            .with_error_mode(options.error_mode)
            .decode(bytes)?;
        let flow = PdfAdapter::new()
            .with_layout(options.layout.clone())
            .export(&model);
        Ok(Converted::new(generate(&flow, options)?))
    }
}

#[cfg(feature = "pdf")]
fn extract(
    bytes: &[u8],
    source_name: &str,
    options: &ConvertOptions,
) -> Result<Vec<crate::pdf::ExtractedPage>> {
    crate::pdf::extract_pages(bytes, source_name, options.error_mode)
}

#[cfg(not(feature = "pdf"))]
fn extract(
    _bytes: &[u8],
    _source_name: &str,
    _options: &ConvertOptions,
) -> Result<Vec<crate::pdf::ExtractedPage>> {
    Err(missing_capability("PDF reading"))
}

#[cfg(feature = "pdf")]
fn ensure_generation() -> Result<()> {
    Ok(())
}

#[cfg(not(feature = "pdf"))]
fn ensure_generation() -> Result<()> {
    Err(missing_capability("PDF generation"))
}

#[cfg(feature = "pdf")]
fn generate(flow: &[crate::pdf::Flowable], options: &ConvertOptions) -> Result<Vec<u8>> {
    crate::pdf::generate(flow, &options.layout)
}

#[cfg(not(feature = "pdf"))]
fn generate(_flow: &[crate::pdf::Flowable], _options: &ConvertOptions) -> Result<Vec<u8>> {
    Err(missing_capability("PDF generation"))
}

/// Build the capability error, warning about the build configuration once.
#[cfg(not(feature = "pdf"))]
fn missing_capability(what: &'static str) -> crate::error::Error {
    static WARN_ONCE: std::sync::Once = std::sync::Once::new();
    WARN_ONCE.call_once(|| {
        log::warn!("built without the `pdf` feature, PDF conversions are unavailable");
    });
    crate::error::Error::UnsupportedCapability(what)
}
