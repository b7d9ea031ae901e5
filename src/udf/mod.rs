//! UDF container codec.
//!
//! A UDF file is a zip archive holding a single `content.xml` entry. The
//! entry carries all document text in one CDATA section and describes
//! paragraphs as `(startOffset, length)` windows into that text.
//!
//! ```no_run
//! use udfconv::udf::UdfCodec;
//!
//! let bytes = std::fs::read("letter.udf")?;
//! let model = UdfCodec::new().decode(&bytes)?;
//! println!("{} paragraphs", model.paragraph_count());
//! # Ok::<(), udfconv::Error>(())
//! ```

mod reader;
mod template;
mod writer;

pub use template::{CONTENT_ENTRY, ELEMENTS_RESOLVER, FORMAT_ID};

use crate::error::{Error, Result};
use crate::model::SpanModel;
use crate::options::ErrorMode;

/// Encodes span models into UDF archives and decodes them back.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdfCodec {
    mode: ErrorMode,
}

impl UdfCodec {
    /// Create a lenient codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error handling mode used when decoding.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Render the `content.xml` text without packaging it.
    ///
    /// Blank models are written as the canonical empty document.
    pub fn to_xml(&self, model: &SpanModel) -> Result<String> {
        if model.is_blank() {
            return Ok(writer::render_xml(&SpanModel::empty_document()));
        }
        model.validate()?;
        Ok(writer::render_xml(model))
    }

    /// Encode `model` as UDF archive bytes.
    pub fn encode(&self, model: &SpanModel) -> Result<Vec<u8>> {
        let xml = self.to_xml(model)?;
        let bytes = writer::package(&xml)?;
        log::debug!(
            "encoded {} paragraphs into {} bytes",
            model.paragraph_count(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Decode UDF archive bytes into a span model.
    pub fn decode(&self, bytes: &[u8]) -> Result<SpanModel> {
        let xml = reader::unpack(bytes)?;
        reader::parse_xml(&xml, self.mode)
    }

    /// Decode a bare `content.xml` document.
    pub fn decode_xml(&self, xml: &str) -> Result<SpanModel> {
        reader::parse_xml(xml, self.mode)
    }
}

/// JSON output format for [`to_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Dump a span model as JSON, for inspecting decoded UDF files.
pub fn to_json(model: &SpanModel, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(model),
        JsonFormat::Compact => serde_json::to_string(model),
    };

    result.map_err(|e| Error::Other(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParagraphDescriptor, SpanStyle};

    fn sample() -> SpanModel {
        let mut model = SpanModel::new();
        let mut para = ParagraphDescriptor::default();
        model.append_span(&mut para, "Merhaba", SpanStyle::body().with_bold(true));
        model.push_paragraph(para);
        model
    }

    #[test]
    fn test_encode_decode() {
        let codec = UdfCodec::new();
        let bytes = codec.encode(&sample()).unwrap();
        assert_eq!(&bytes[..2], b"PK");

        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_blank_model_encodes_marker() {
        let xml = UdfCodec::new().to_xml(&SpanModel::new()).unwrap();
        assert!(xml.contains("<content><![CDATA[\u{200B}]]></content>"));
        assert!(xml.contains("<content startOffset=\"0\" length=\"1\""));
    }

    #[test]
    fn test_encode_rejects_inconsistent_model() {
        let mut model = sample();
        model.paragraphs[0]
            .add_span(crate::model::SpanDescriptor::new(3, 100, SpanStyle::default()));
        assert!(matches!(
            UdfCodec::new().encode(&model),
            Err(Error::Encoding { .. })
        ));
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"buffer\": \"Merhaba\""));
        assert!(json.contains('\n'));

        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }
}
