//! Integration tests for the PDF adapters and converters.
#![cfg(feature = "pdf")]

use std::io::Cursor;

use udfconv::convert::{ConvertOptions, DocumentConverter, PdfToUdf, UdfToPdf};
use udfconv::model::{Alignment, ParagraphDescriptor, SpanModel, SpanStyle, IMAGE_PLACEHOLDER};
use udfconv::pdf::{
    generate, ExtractedImage, ExtractedPage, Flowable, ImageEncoding, PdfAdapter, PdfAlignment,
    PdfLayout,
};
use udfconv::richdoc::{RichDocCodec, RichDocument, RichParagraph};
use udfconv::udf::UdfCodec;

fn png_pixel() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn sample_model() -> SpanModel {
    let mut model = SpanModel::new();

    let mut title = ParagraphDescriptor::new(Alignment::Center);
    model.append_span(&mut title, "DİLEKÇE", SpanStyle::body().with_bold(true));
    model.push_paragraph(title);

    let mut blank = ParagraphDescriptor::new(Alignment::Start);
    model.append_span(&mut blank, "   ", SpanStyle::body());
    model.push_paragraph(blank);

    let mut body = ParagraphDescriptor::new(Alignment::Justify);
    model.append_span(&mut body, "Merhaba ", SpanStyle::body());
    model.append_span(&mut body, "dünya", SpanStyle::body().with_italic(true));
    model.append_image(&mut body, png_pixel(), SpanStyle::body());
    model.push_paragraph(body);

    model
}

#[test]
fn test_image_accounting() {
    let text = "a".repeat(1000);
    let page = ExtractedPage::with_text(text)
        .with_image(ExtractedImage::new(png_pixel(), ImageEncoding::Png))
        .with_image(ExtractedImage::new(
            vec![0, 128, 255, 64],
            ImageEncoding::Raw {
                width: 2,
                height: 2,
                components: 1,
            },
        ));

    let model = PdfAdapter::new().import(&[page]).unwrap();
    assert_eq!(model.buffer.len(), 1002);

    let images: Vec<_> = model.paragraphs[0].images().collect();
    assert_eq!(images.len(), 2);
    assert_eq!((images[0].offset, images[0].length), (1000, 1));
    assert_eq!((images[1].offset, images[1].length), (1001, 1));
    assert!(images[1].data.starts_with(b"\x89PNG"));
    assert_eq!(
        model.buffer.slice(1000, 2),
        Some(format!("{IMAGE_PLACEHOLDER}{IMAGE_PLACEHOLDER}").as_str())
    );
}

#[test]
fn test_page_separators() {
    let pages = vec![
        ExtractedPage::with_text("birinci"),
        ExtractedPage::with_text("ikinci"),
    ];
    let model = PdfAdapter::new().import(&pages).unwrap();

    assert_eq!(model.buffer.as_str(), "birinci\nikinci");
    assert_eq!(model.paragraph_count(), 3);
    let separator = model.paragraphs[1].spans().next().unwrap();
    assert_eq!(model.span_text(separator), "\n");
    assert_eq!(separator.style, SpanStyle::default());
    model.validate().unwrap();
}

#[test]
fn test_export_drops_blank_and_spaces_the_rest() {
    let layout = PdfLayout::default().with_paragraph_spacing(8.0);
    let flow = PdfAdapter::new().with_layout(layout).export(&sample_model());

    assert_eq!(flow.len(), 4);
    match &flow[0] {
        Flowable::Paragraph(p) => {
            assert_eq!(p.markup, "<b>DİLEKÇE</b>");
            assert_eq!(p.alignment, PdfAlignment::Center);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(flow[1], Flowable::Spacer(8.0));
    match &flow[2] {
        Flowable::Paragraph(p) => {
            assert_eq!(p.markup, "Merhaba <i>dünya</i>");
            assert_eq!(p.alignment, PdfAlignment::Justify);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_empty_paragraph_exports_as_blank_line() {
    let mut doc = RichDocument::new();
    doc.add_paragraph(RichParagraph::with_text("one"));
    doc.add_paragraph(RichParagraph::new());
    doc.add_paragraph(RichParagraph::with_text("two"));

    let model = RichDocCodec::encode(&doc);
    let flow = PdfAdapter::new().export(&model);

    assert_eq!(flow.len(), 6);
    match &flow[2] {
        Flowable::Paragraph(p) => assert_eq!(p.markup, "\u{200B}"),
        other => panic!("unexpected {:?}", other),
    }

    let bytes = generate(&flow, &PdfLayout::default()).unwrap();
    assert_eq!(lopdf::Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
}

#[test]
fn test_udf_to_pdf_to_udf() {
    let options = ConvertOptions::default();
    let udf = UdfCodec::new().encode(&sample_model()).unwrap();

    let pdf = UdfToPdf::new().convert_bytes(&udf, "in.udf", &options).unwrap();
    assert!(pdf.bytes.starts_with(b"%PDF-"));

    let back = PdfToUdf::new()
        .convert_bytes(&pdf.bytes, "in.pdf", &options)
        .unwrap();
    assert_eq!(back.note.as_deref(), Some("1 pages"));

    let model = UdfCodec::new().decode(&back.bytes).unwrap();
    assert!(model.buffer.as_str().contains("Merhaba"));
    assert_eq!(model.image_count(), 0);
}

#[test]
fn test_generate_respects_layout() {
    let layout = PdfLayout::default().with_page_size(300.0, 400.0);
    let flow = PdfAdapter::new()
        .with_layout(layout.clone())
        .export(&sample_model());
    let bytes = generate(&flow, &layout).unwrap();

    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_empty_pdf_import_is_empty_document() {
    let model = PdfAdapter::new()
        .import(&[ExtractedPage::default()])
        .unwrap();
    assert_eq!(model, SpanModel::empty_document());
}
