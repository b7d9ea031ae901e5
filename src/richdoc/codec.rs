//! Mapping between rich-text runs and the span model.

use super::{RichDocument, RichParagraph, RichRun};
use crate::model::{
    ParagraphDescriptor, SpanModel, SpanStyle, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE,
    EMPTY_MARKER,
};

/// Converts [`RichDocument`]s to and from [`SpanModel`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichDocCodec;

impl RichDocCodec {
    /// Encode a rich-text document into a span model.
    ///
    /// Every paragraph's text is appended to the buffer in order and each
    /// non-empty run becomes one span starting at the running cursor. Empty
    /// paragraphs carry a single zero-width space. A document with no
    /// paragraphs, or only empty ones, becomes [`SpanModel::empty_document`].
    pub fn encode(doc: &RichDocument) -> SpanModel {
        if doc.paragraphs.iter().all(|p| p.text().is_empty()) {
            return SpanModel::empty_document();
        }

        let mut model = SpanModel::new();
        for paragraph in &doc.paragraphs {
            let mut para = ParagraphDescriptor::new(paragraph.alignment.unwrap_or_default());

            if paragraph.text().is_empty() {
                model.append_char(&mut para, EMPTY_MARKER, SpanStyle::body());
            } else if paragraph.runs_cover_text() {
                for run in paragraph.runs.iter().filter(|r| !r.is_empty()) {
                    model.append_span(&mut para, &run.text, run_style(run));
                }
            } else {
                // Runs missing or out of step with the text: one span for all.
                log::debug!(
                    "paragraph runs do not cover its text, emitting a single span of {} chars",
                    paragraph.text().chars().count()
                );
                model.append_span(&mut para, paragraph.text(), SpanStyle::body());
            }

            model.push_paragraph(para);
        }

        log::debug!(
            "encoded {} paragraphs into {} characters",
            model.paragraph_count(),
            model.buffer.len()
        );
        model
    }

    /// Decode a span model into a rich-text document.
    ///
    /// Images have no counterpart in the run model and are skipped.
    pub fn decode(model: &SpanModel) -> RichDocument {
        let mut doc = RichDocument::new();
        let marker = EMPTY_MARKER.to_string();

        for para in &model.paragraphs {
            let mut paragraph = RichParagraph::new().with_alignment(para.alignment);

            if model.paragraph_text(para) != marker {
                for span in para.spans() {
                    let text = model.span_text(span);
                    if text.is_empty() {
                        continue;
                    }
                    let mut run = RichRun::new(text)
                        .bold(span.style.bold)
                        .italic(span.style.italic);
                    if let Some(size) = span.style.size {
                        run = run.size(size);
                    }
                    if let Some(family) = &span.style.family {
                        run = run.family(family.clone());
                    }
                    paragraph.add_run(run);
                }
            }

            let skipped = para.images().count();
            if skipped > 0 {
                log::debug!("skipping {} image(s) with no run representation", skipped);
            }

            doc.add_paragraph(paragraph);
        }

        doc
    }
}

fn run_style(run: &RichRun) -> SpanStyle {
    SpanStyle {
        family: Some(
            run.font_family
                .clone()
                .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
        ),
        size: Some(run.font_size.map_or(DEFAULT_FONT_SIZE, f32::round)),
        bold: run.bold,
        italic: run.italic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Alignment;

    fn sample() -> RichDocument {
        let mut doc = RichDocument::new();
        doc.add_paragraph(
            RichParagraph::new()
                .with_alignment(Alignment::Center)
                .with_run(RichRun::new("Title").bold(true).size(16.0)),
        );
        doc.add_paragraph(RichParagraph::new());
        doc.add_paragraph(
            RichParagraph::new()
                .with_run(RichRun::new("plain "))
                .with_run(RichRun::new(""))
                .with_run(RichRun::new("emph").italic(true).family("Arial")),
        );
        doc
    }

    #[test]
    fn test_encode_offsets() {
        let model = RichDocCodec::encode(&sample());
        assert_eq!(model.buffer.as_str(), "Title\u{200B}plain emph");
        assert_eq!(model.paragraph_count(), 3);

        let spans: Vec<_> = model.paragraphs[2].spans().collect();
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].offset, spans[0].length), (6, 6));
        assert_eq!((spans[1].offset, spans[1].length), (12, 4));
        assert_eq!(spans[1].style.family.as_deref(), Some("Arial"));
        assert_eq!(spans[0].style.family.as_deref(), Some("Times New Roman"));
        assert_eq!(model.paragraphs[0].alignment, Alignment::Center);
    }

    #[test]
    fn test_encode_empty_documents() {
        let expected = SpanModel::empty_document();
        assert_eq!(RichDocCodec::encode(&RichDocument::new()), expected);

        let mut doc = RichDocument::new();
        doc.add_paragraph(RichParagraph::new());
        doc.add_paragraph(RichParagraph::new().with_run(RichRun::new("")));
        assert_eq!(RichDocCodec::encode(&doc), expected);
    }

    #[test]
    fn test_encode_rounds_font_size() {
        let mut doc = RichDocument::new();
        doc.add_paragraph(RichParagraph::new().with_run(RichRun::new("x").size(10.5)));
        let model = RichDocCodec::encode(&doc);
        let span = model.paragraphs[0].spans().next().unwrap();
        assert_eq!(span.style.size, Some(11.0));
    }

    #[test]
    fn test_encode_text_without_runs() {
        let mut doc = RichDocument::new();
        doc.add_paragraph(RichParagraph::with_text("no runs here"));
        let model = RichDocCodec::encode(&doc);
        let spans: Vec<_> = model.paragraphs[0].spans().collect();
        assert_eq!(spans.len(), 1);
        assert_eq!(model.span_text(spans[0]), "no runs here");
        assert_eq!(spans[0].style, SpanStyle::body());
    }

    #[test]
    fn test_decode_restores_runs() {
        let doc = RichDocCodec::decode(&RichDocCodec::encode(&sample()));
        assert_eq!(doc.paragraph_count(), 3);
        assert_eq!(doc.paragraphs[0].runs[0].text, "Title");
        assert!(doc.paragraphs[0].runs[0].bold);
        assert_eq!(doc.paragraphs[0].runs[0].font_size, Some(16.0));
        assert!(doc.paragraphs[1].runs.is_empty());
        assert_eq!(doc.paragraphs[2].runs.len(), 2);
        assert!(doc.paragraphs[2].runs[1].italic);
        assert_eq!(doc.paragraphs[2].text(), "plain emph");
    }

    #[test]
    fn test_decode_skips_images() {
        let mut model = SpanModel::new();
        let mut para = ParagraphDescriptor::default();
        model.append_span(&mut para, "before", SpanStyle::body());
        model.append_image(&mut para, vec![1, 2, 3], SpanStyle::default());
        model.push_paragraph(para);

        let doc = RichDocCodec::decode(&model);
        assert_eq!(doc.paragraphs[0].runs.len(), 1);
        assert_eq!(doc.paragraphs[0].text(), "before");
    }
}
