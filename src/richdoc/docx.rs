//! DOCX reading (zip + quick-xml) and writing (docx-rs).

use std::io::{Cursor, Read};

use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run, RunFonts};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use super::{RichDocument, RichParagraph, RichRun};
use crate::error::{Error, Result};
use crate::model::Alignment;

/// Main document part inside the DOCX package.
const DOCUMENT_PART: &str = "word/document.xml";

/// Read a DOCX package into a [`RichDocument`].
///
/// Only body-level paragraphs are read; table contents, headers and
/// footers are not part of the run model. `source` names the input in
/// error messages.
pub fn read_docx(bytes: &[u8], source: &str) -> Result<RichDocument> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| Error::source_read(source, e))?;

    let mut xml = String::new();
    {
        let mut entry = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| Error::source_read(source, format!("{DOCUMENT_PART}: {e}")))?;
        entry
            .read_to_string(&mut xml)
            .map_err(|e| Error::source_read(source, e))?;
    }

    parse_document_xml(&xml).map_err(|e| Error::source_read(source, e))
}

/// Parse the `word/document.xml` part.
pub(crate) fn parse_document_xml(xml: &str) -> Result<RichDocument> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut doc = RichDocument::new();
    // Local names of the currently open elements.
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraph: Option<RichParagraph> = None;
    let mut run: Option<RichRun> = None;
    let mut in_text = false;
    // Depth inside a run child that carries no run text (text boxes,
    // drawings, `mc:AlternateContent`).
    let mut skipped = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(_) if skipped > 0 => skipped += 1,
            Event::End(_) if skipped > 0 => skipped -= 1,
            Event::Empty(_) if skipped > 0 => {}
            Event::Start(e) => {
                let parent = stack.last().map(Vec::as_slice);
                if run.is_some()
                    && parent == Some(b"r".as_slice())
                    && !is_run_content(e.local_name().as_ref())
                {
                    skipped = 1;
                    continue;
                }
                let is_body_paragraph = parent == Some(b"body".as_slice());
                handle_element(&e, parent, is_body_paragraph, &mut paragraph, &mut run)?;
                if run.is_some()
                    && parent == Some(b"r".as_slice())
                    && e.local_name().as_ref() == b"t"
                {
                    in_text = true;
                }
                stack.push(e.local_name().as_ref().to_vec());
            }
            Event::Empty(e) => {
                let parent = stack.last().map(Vec::as_slice);
                if e.local_name().as_ref() == b"p" && parent == Some(b"body".as_slice()) {
                    doc.add_paragraph(RichParagraph::new());
                } else {
                    handle_element(&e, parent, false, &mut paragraph, &mut run)?;
                }
            }
            Event::Text(e) if in_text => {
                if let Some(run) = run.as_mut() {
                    run.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) if in_text => {
                if let Some(run) = run.as_mut() {
                    run.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(e) => {
                stack.pop();
                let parent = stack.last().map(Vec::as_slice);
                match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"r" if is_word_run(e.name().as_ref()) => {
                        if let (Some(para), Some(finished)) = (paragraph.as_mut(), run.take()) {
                            para.add_run(finished);
                        }
                    }
                    b"p" if parent == Some(b"body".as_slice()) => {
                        if let Some(para) = paragraph.take() {
                            doc.add_paragraph(para);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    log::debug!("read {} paragraphs from DOCX", doc.paragraph_count());
    Ok(doc)
}

fn handle_element(
    e: &BytesStart<'_>,
    parent: Option<&[u8]>,
    is_body_paragraph: bool,
    paragraph: &mut Option<RichParagraph>,
    run: &mut Option<RichRun>,
) -> Result<()> {
    let name = e.local_name();
    match name.as_ref() {
        b"p" if is_body_paragraph => *paragraph = Some(RichParagraph::new()),
        b"jc" if parent == Some(b"pPr".as_slice()) => {
            if let Some(para) = paragraph.as_mut() {
                para.alignment = attr_value(e, b"val")?.as_deref().and_then(alignment_from_jc);
            }
        }
        b"r" if paragraph.is_some() && run.is_none() && is_word_run(e.name().as_ref()) => {
            *run = Some(RichRun::default());
        }
        b"tab" if parent == Some(b"r".as_slice()) => push_char(run, '\t'),
        b"br" | b"cr" if parent == Some(b"r".as_slice()) => push_char(run, '\n'),
        prop if parent == Some(b"rPr".as_slice()) => {
            if let Some(run) = run.as_mut() {
                apply_run_property(run, prop, e)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn apply_run_property(run: &mut RichRun, prop: &[u8], e: &BytesStart<'_>) -> Result<()> {
    match prop {
        b"b" => run.bold = toggle_value(e)?,
        b"i" => run.italic = toggle_value(e)?,
        b"sz" => {
            if let Some(half_points) = attr_value(e, b"val")?.and_then(|v| v.parse::<f32>().ok()) {
                run.font_size = Some(half_points / 2.0);
            }
        }
        b"rFonts" => {
            let family = match attr_value(e, b"ascii")? {
                Some(f) => Some(f),
                None => attr_value(e, b"hAnsi")?,
            };
            if family.is_some() {
                run.font_family = family;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Direct run children whose content belongs to the run itself.
fn is_run_content(local: &[u8]) -> bool {
    matches!(local, b"rPr" | b"t" | b"tab" | b"br" | b"cr")
}

fn is_word_run(qualified: &[u8]) -> bool {
    qualified == b"w:r" || qualified == b"r"
}

fn push_char(run: &mut Option<RichRun>, c: char) {
    if let Some(run) = run.as_mut() {
        run.text.push(c);
    }
}

fn attr_value(e: &BytesStart<'_>, local: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == local {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// `<w:b/>` means on; `w:val` of `0`, `false` or `off` turns it off.
fn toggle_value(e: &BytesStart<'_>) -> Result<bool> {
    Ok(!matches!(
        attr_value(e, b"val")?.as_deref(),
        Some("0") | Some("false") | Some("off")
    ))
}

fn alignment_from_jc(value: &str) -> Option<Alignment> {
    match value {
        "left" | "start" => Some(Alignment::Start),
        "center" => Some(Alignment::Center),
        "right" | "end" => Some(Alignment::End),
        "both" | "distribute" => Some(Alignment::Justify),
        other => {
            log::debug!("unrecognized paragraph justification {:?}", other);
            None
        }
    }
}

/// Write a [`RichDocument`] as a DOCX package.
pub fn write_docx(doc: &RichDocument) -> Result<Vec<u8>> {
    let mut docx = Docx::new();

    for paragraph in &doc.paragraphs {
        let mut para = Paragraph::new();
        if let Some(alignment) = paragraph.alignment {
            para = para.align(alignment_type(alignment));
        }
        for run in paragraph.runs.iter().filter(|r| !r.is_empty()) {
            para = para.add_run(build_run(run));
        }
        docx = docx.add_paragraph(para);
    }

    let mut buffer = Vec::new();
    docx.build()
        .pack(&mut Cursor::new(&mut buffer))
        .map_err(|e| Error::Other(format!("Failed to pack DOCX: {e}")))?;
    Ok(buffer)
}

fn build_run(run: &RichRun) -> Run {
    let mut out = Run::new();

    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            out = out.add_break(BreakType::TextWrapping);
        }
        for (j, part) in line.split('\t').enumerate() {
            if j > 0 {
                out = out.add_tab();
            }
            if !part.is_empty() {
                out = out.add_text(part);
            }
        }
    }

    if run.bold {
        out = out.bold();
    }
    if run.italic {
        out = out.italic();
    }
    if let Some(size) = run.font_size {
        out = out.size((size * 2.0).round() as usize);
    }
    if let Some(family) = &run.font_family {
        out = out.fonts(RunFonts::new().ascii(family).hi_ansi(family));
    }
    out
}

fn alignment_type(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Start => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::End => AlignmentType::Right,
        Alignment::Justify => AlignmentType::Both,
    }
}
