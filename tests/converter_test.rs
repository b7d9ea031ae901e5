//! Integration tests for the converter module.

use std::path::Path;
use std::sync::Arc;
use udfconv::convert::{
    convert_file, convert_file_with, ConversionKind, ConvertOptions, Converted,
    ConverterRegistry, DocumentConverter, ErrorMode,
};
use udfconv::error::{Error, ErrorKind, Result};
use udfconv::model::{Alignment, ParagraphDescriptor, SpanModel, SpanStyle};
use udfconv::udf::UdfCodec;

/// Mock converter for testing.
struct MockConverter {
    source: &'static str,
    target: &'static str,
    name: &'static str,
    fail: bool,
}

impl MockConverter {
    fn new(source: &'static str, target: &'static str, name: &'static str) -> Self {
        Self {
            source,
            target,
            name,
            fail: false,
        }
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl DocumentConverter for MockConverter {
    fn name(&self) -> &str {
        self.name
    }

    fn source_extension(&self) -> &str {
        self.source
    }

    fn target_extension(&self) -> &str {
        self.target
    }

    fn convert_bytes(
        &self,
        bytes: &[u8],
        _source_name: &str,
        _options: &ConvertOptions,
    ) -> Result<Converted> {
        if self.fail {
            return Err(Error::MissingContent("mock".to_string()));
        }
        Ok(Converted::new(bytes.to_ascii_uppercase()).with_note("mock"))
    }
}

fn sample_udf(text: &str) -> Vec<u8> {
    let mut model = SpanModel::new();
    let mut para = ParagraphDescriptor::new(Alignment::Center);
    model.append_span(&mut para, text, SpanStyle::body().with_bold(true));
    model.push_paragraph(para);
    UdfCodec::new().encode(&model).unwrap()
}

#[test]
fn test_convert_options_builder() {
    let options = ConvertOptions::new().strict();
    assert_eq!(options.error_mode, ErrorMode::Strict);

    let options = options.lenient();
    assert_eq!(options.error_mode, ErrorMode::Lenient);
    assert_eq!(ConvertOptions::default().error_mode, ErrorMode::Lenient);
}

#[test]
fn test_converter_registry_new() {
    let registry = ConverterRegistry::new();

    // Empty registry should support nothing
    assert!(!registry.supports("docx", "udf"));
    assert!(registry.supported_pairs().is_empty());
}

#[test]
fn test_converter_registry_with_defaults() {
    let registry = ConverterRegistry::with_defaults();

    assert_eq!(
        registry.supported_pairs(),
        vec![("docx", "udf"), ("pdf", "udf"), ("udf", "docx"), ("udf", "pdf")]
    );
    assert!(registry.supports("UDF", "DOCX")); // Case insensitive
    assert!(!registry.supports("pdf", "docx"));
}

#[test]
fn test_converter_registry_register() {
    let mut registry = ConverterRegistry::new();
    registry.register(Arc::new(MockConverter::new("txt", "udf", "text-to-udf")));

    assert!(registry.supports("txt", "udf"));
    assert!(registry.supports("TXT", "UDF"));
    assert!(!registry.supports("udf", "txt"));
    assert!(registry.get_by_name("Text-To-Udf").is_some());
}

#[test]
fn test_converter_registry_register_replaces_pair() {
    let mut registry = ConverterRegistry::with_defaults();
    registry.register(Arc::new(MockConverter::new("docx", "udf", "mock")));

    let converter = registry.get_by_extensions("docx", "udf").unwrap();
    assert_eq!(converter.name(), "mock");
    assert_eq!(registry.supported_pairs().len(), 4);
}

#[test]
fn test_registry_convert_bytes() {
    let mut registry = ConverterRegistry::new();
    registry.register(Arc::new(MockConverter::new("txt", "udf", "mock")));

    let converted = registry
        .convert_bytes(b"abc", "txt", "udf", &ConvertOptions::default())
        .unwrap();
    assert_eq!(converted.bytes, b"ABC");
    assert_eq!(converted.note.as_deref(), Some("mock"));

    let err = registry
        .convert_bytes(b"abc", "udf", "txt", &ConvertOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedConversion(_)));
}

#[test]
fn test_registry_convert_path_without_extension() {
    let registry = ConverterRegistry::with_defaults();
    let err = registry
        .convert(Path::new("README"), "udf", &ConvertOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Other(_)));
}

#[test]
fn test_registry_udf_to_docx() {
    let registry = ConverterRegistry::with_defaults();
    let converted = registry
        .convert_bytes(&sample_udf("Sayın"), "udf", "docx", &ConvertOptions::default())
        .unwrap();
    assert!(converted.bytes.starts_with(b"PK"));
}

#[test]
fn test_convert_file_with_note() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in.txt");
    let dst = dir.path().join("out.udf");
    std::fs::write(&src, b"hello").unwrap();

    let converter = MockConverter::new("txt", "udf", "mock");
    let outcome = convert_file_with(&converter, &src, &dst, &ConvertOptions::default());

    assert!(outcome.success);
    assert_eq!(outcome.message, "TXT successfully converted to UDF (mock)");
    assert_eq!(std::fs::read(&dst).unwrap(), b"HELLO");
}

#[test]
fn test_failed_conversion_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in.txt");
    let dst = dir.path().join("out.udf");
    std::fs::write(&src, b"hello").unwrap();

    let converter = MockConverter::new("txt", "udf", "mock").failing();
    let outcome = convert_file_with(&converter, &src, &dst, &ConvertOptions::default());

    assert!(!outcome.success);
    assert_eq!(outcome.error_kind, Some(ErrorKind::MissingContent));
    assert!(outcome.output.is_none());
    assert!(!dst.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_convert_file_invalid_udf() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("broken.udf");
    std::fs::write(&src, b"definitely not a zip").unwrap();
    let dst = dir.path().join("broken.docx");

    let outcome = convert_file(
        ConversionKind::UdfToDocx,
        &src,
        &dst,
        &ConvertOptions::default(),
    );

    assert!(!outcome.success);
    assert_eq!(outcome.error_kind, Some(ErrorKind::InvalidContainer));
    assert!(outcome.message.starts_with("Invalid UDF file"));
    assert!(!dst.exists());
}

#[test]
fn test_convert_file_overwrites_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in.udf");
    let dst = dir.path().join("in.docx");
    std::fs::write(&src, sample_udf("Merhaba")).unwrap();
    std::fs::write(&dst, b"stale").unwrap();

    let outcome = convert_file(
        ConversionKind::UdfToDocx,
        &src,
        &dst,
        &ConvertOptions::default(),
    );

    assert!(outcome.success, "{}", outcome.message);
    assert!(std::fs::read(&dst).unwrap().starts_with(b"PK"));
}

#[test]
fn test_conversion_kind_converters() {
    for kind in ConversionKind::ALL {
        let converter = kind.converter();
        assert_eq!(converter.name(), kind.name());
        assert_eq!(converter.source_extension(), kind.source_extension());
        assert_eq!(converter.target_extension(), kind.target_extension());
    }
}
