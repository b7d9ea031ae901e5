//! DOCX ↔ UDF converters.

use crate::error::Result;
use crate::richdoc::{read_docx, write_docx, RichDocCodec};
use crate::udf::UdfCodec;

use super::{ConvertOptions, Converted, DocumentConverter};

/// Word document to UDF.
#[derive(Debug, Clone, Default)]
pub struct DocxToUdf {
    _private: (),
}

impl DocxToUdf {
    /// Create a new DOCX → UDF converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for DocxToUdf {
    fn name(&self) -> &str {
        "docx-to-udf"
    }

    fn source_extension(&self) -> &str {
        "docx"
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
        let doc = read_docx(bytes, source_name)?;
        let model = RichDocCodec::encode(&doc);
        let udf = UdfCodec::new()
            .with_error_mode(options.error_mode)
            .encode(&model)?;
        Ok(Converted::new(udf))
    }
}

/// UDF to Word document.
#[derive(Debug, Clone, Default)]
pub struct UdfToDocx {
    _private: (),
}

impl UdfToDocx {
    /// Create a new UDF → DOCX converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for UdfToDocx {
    fn name(&self) -> &str {
        "udf-to-docx"
    }

    fn source_extension(&self) -> &str {
        "udf"
    }

    fn target_extension(&self) -> &str {
        "docx"
    }

    fn convert_bytes(
        &self,
        bytes: &[u8],
        _source_name: &str,
        options: &ConvertOptions,
    ) -> Result<Converted> {
        let model = UdfCodec::new()
            .with_error_mode(options.error_mode)
            .decode(bytes)?;
        let doc = RichDocCodec::decode(&model);
        Ok(Converted::new(write_docx(&doc)?))
    }
}
