//! Round-trip and offset tests for the rich-text ↔ span model ↔ UDF path.

use udfconv::model::{Alignment, SpanModel, DEFAULT_FONT_FAMILY, EMPTY_MARKER};
use udfconv::richdoc::{read_docx, write_docx, RichDocCodec, RichDocument, RichParagraph, RichRun};
use udfconv::udf::UdfCodec;

fn petition() -> RichDocument {
    let mut doc = RichDocument::new();
    doc.add_paragraph(
        RichParagraph::new()
            .with_alignment(Alignment::Center)
            .with_run(RichRun::new("ANKARA NÖBETÇİ ASLİYE HUKUK MAHKEMESİNE").bold(true).size(14.0)),
    );
    doc.add_paragraph(RichParagraph::new());
    doc.add_paragraph(
        RichParagraph::new()
            .with_alignment(Alignment::Justify)
            .with_run(RichRun::new("Davacı: "))
            .with_run(RichRun::new("Ayşe Yılmaz").bold(true))
            .with_run(RichRun::new(" (vekili Av. ").italic(true).family("Arial"))
            .with_run(RichRun::new("Mehmet Öz").bold(true).italic(true).size(11.6))
            .with_run(RichRun::new(")")),
    );
    doc.add_paragraph(
        RichParagraph::new()
            .with_alignment(Alignment::End)
            .with_run(RichRun::new("Tarih: 01.02.2024")),
    );
    doc
}

fn through_udf(model: &SpanModel) -> SpanModel {
    let codec = UdfCodec::new();
    codec.decode(&codec.encode(model).unwrap()).unwrap()
}

#[test]
fn test_round_trip_preserves_runs() {
    let doc = petition();
    let back = RichDocCodec::decode(&through_udf(&RichDocCodec::encode(&doc)));

    assert_eq!(back.paragraph_count(), doc.paragraph_count());
    for (original, decoded) in doc.paragraphs.iter().zip(&back.paragraphs) {
        assert_eq!(decoded.text(), original.text());
        assert_eq!(decoded.runs.len(), original.runs.len());
        for (a, b) in original.runs.iter().zip(&decoded.runs) {
            assert_eq!(b.text, a.text);
            assert_eq!(b.bold, a.bold);
            assert_eq!(b.italic, a.italic);
            assert_eq!(b.font_size, Some(a.font_size.map_or(12.0, f32::round)));
            assert_eq!(
                b.font_family.as_deref(),
                Some(a.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY))
            );
        }
    }
}

#[test]
fn test_round_trip_preserves_alignment() {
    let doc = petition();
    let back = RichDocCodec::decode(&through_udf(&RichDocCodec::encode(&doc)));

    let alignments: Vec<_> = back.paragraphs.iter().map(|p| p.alignment).collect();
    assert_eq!(
        alignments,
        vec![
            Some(Alignment::Center),
            Some(Alignment::Start),
            Some(Alignment::Justify),
            Some(Alignment::End)
        ]
    );
}

#[test]
fn test_offset_integrity() {
    let doc = petition();
    let model = RichDocCodec::encode(&doc);
    model.validate().unwrap();

    let mut cursor = 0;
    for (para, original) in model.paragraphs.iter().zip(&doc.paragraphs) {
        let expected = if original.text().is_empty() {
            EMPTY_MARKER.to_string()
        } else {
            original.text().to_string()
        };
        assert_eq!(model.paragraph_text(para), expected);

        for span in para.spans() {
            assert_eq!(span.offset, cursor, "gap or overlap before span");
            cursor += span.length;
        }
    }
    assert_eq!(cursor, model.buffer.len());
}

#[test]
fn test_offsets_count_characters_not_bytes() {
    let mut doc = RichDocument::new();
    doc.add_paragraph(
        RichParagraph::new()
            .with_run(RichRun::new("İğüş"))
            .with_run(RichRun::new("x").bold(true)),
    );
    let model = RichDocCodec::encode(&doc);

    let spans: Vec<_> = model.paragraphs[0].spans().collect();
    assert_eq!((spans[0].offset, spans[0].length), (0, 4));
    assert_eq!((spans[1].offset, spans[1].length), (4, 1));
    assert_eq!(model.span_text(spans[1]), "x");
}

#[test]
fn test_empty_document_law() {
    let mut only_empty = RichDocument::new();
    only_empty.add_paragraph(RichParagraph::new());
    only_empty.add_paragraph(RichParagraph::new());

    for doc in [RichDocument::new(), only_empty] {
        let model = RichDocCodec::encode(&doc);
        assert_eq!(model.paragraph_count(), 1);

        let spans: Vec<_> = model.paragraphs[0].spans().collect();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].length, 1);
        assert_eq!(model.span_text(spans[0]), "\u{200B}");
    }
}

#[test]
fn test_empty_paragraph_decodes_without_runs() {
    let back = RichDocCodec::decode(&through_udf(&RichDocCodec::encode(&petition())));
    assert_eq!(back.paragraphs[1].text(), "");
    assert!(back.paragraphs[1].runs.is_empty());
}

#[test]
fn test_paragraph_without_runs_gets_one_span() {
    let mut doc = RichDocument::new();
    doc.add_paragraph(RichParagraph::with_text("plain text only"));
    let model = RichDocCodec::encode(&doc);

    let spans: Vec<_> = model.paragraphs[0].spans().collect();
    assert_eq!(spans.len(), 1);
    assert_eq!(model.span_text(spans[0]), "plain text only");
    assert!(!spans[0].style.bold);
}

#[test]
fn test_docx_file_round_trip() {
    let docx = write_docx(&petition()).unwrap();
    let read = read_docx(&docx, "petition.docx").unwrap();

    let model = through_udf(&RichDocCodec::encode(&read));
    let back = read_docx(&write_docx(&RichDocCodec::decode(&model)).unwrap(), "back.docx").unwrap();

    assert_eq!(back.paragraph_count(), 4);
    assert_eq!(back.paragraphs[0].text(), "ANKARA NÖBETÇİ ASLİYE HUKUK MAHKEMESİNE");
    assert_eq!(back.paragraphs[0].alignment, Some(Alignment::Center));
    assert!(back.paragraphs[0].runs[0].bold);
    assert_eq!(back.paragraphs[2].text(), "Davacı: Ayşe Yılmaz (vekili Av. Mehmet Öz)");
    assert_eq!(back.paragraphs[3].alignment, Some(Alignment::End));
}
