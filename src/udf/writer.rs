//! SpanModel → `content.xml` → zip.

use std::fmt::Write as _;
use std::io::{Cursor, Write};

use base64::Engine;
use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::template::{AFTER_CONTENT, CONTENT_ENTRY, HEAD, TAIL};
use crate::error::Result;
use crate::model::{
    ImageDescriptor, Inline, ParagraphDescriptor, SpanDescriptor, SpanModel, SpanStyle,
};

/// Render the full `content.xml` document for `model`.
pub(crate) fn render_xml(model: &SpanModel) -> String {
    let text = model.buffer.as_str();
    let mut xml = String::with_capacity(
        HEAD.len() + AFTER_CONTENT.len() + TAIL.len() + text.len() + model.paragraphs.len() * 128,
    );

    xml.push_str(HEAD);
    push_cdata_body(&mut xml, text);
    xml.push_str(AFTER_CONTENT);

    for (i, para) in model.paragraphs.iter().enumerate() {
        if i > 0 {
            xml.push('\n');
        }
        push_paragraph(&mut xml, para);
    }

    xml.push_str(TAIL);
    xml
}

/// Package `content.xml` into a deflate-compressed zip archive.
pub(crate) fn package(xml: &str) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(CONTENT_ENTRY, options)?;
    zip.write_all(xml.as_bytes())?;
    Ok(zip.finish()?.into_inner())
}

/// Write `text` as the body of a CDATA section.
///
/// `]]>` cannot appear inside CDATA, so it is split across two adjacent
/// sections. Characters XML 1.0 forbids are replaced one-for-one with
/// U+FFFD and carriage returns become line feeds (parsers normalize CR LF
/// to a single LF), keeping every offset valid.
fn push_cdata_body(xml: &mut String, text: &str) {
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        push_xml_chars(xml, &rest[..pos]);
        xml.push_str("]]]]><![CDATA[>");
        rest = &rest[pos + 3..];
    }
    push_xml_chars(xml, rest);
}

fn push_xml_chars(xml: &mut String, text: &str) {
    xml.extend(text.chars().map(|c| match c {
        '\r' => '\n',
        c if is_xml_char(c) => c,
        _ => char::REPLACEMENT_CHARACTER,
    }));
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

fn push_paragraph(xml: &mut String, para: &ParagraphDescriptor) {
    let _ = write!(
        xml,
        "<paragraph Alignment=\"{}\" LeftIndent=\"{:.1}\" RightIndent=\"{:.1}\">",
        para.alignment.code(),
        para.left_indent,
        para.right_indent
    );
    for item in &para.items {
        match item {
            Inline::Span(span) => push_span(xml, span),
            Inline::Image(image) => push_image(xml, image),
        }
    }
    xml.push_str("</paragraph>");
}

fn push_span(xml: &mut String, span: &SpanDescriptor) {
    let _ = write!(
        xml,
        "<content startOffset=\"{}\" length=\"{}\"",
        span.offset, span.length
    );
    push_style(xml, &span.style, true);
    xml.push_str(" />");
}

fn push_image(xml: &mut String, image: &ImageDescriptor) {
    let _ = write!(
        xml,
        "<image startOffset=\"{}\" length=\"{}\"",
        image.offset, image.length
    );
    push_style(xml, &image.style, false);
    xml.push_str(" imageData=\"");
    xml.push_str(&base64::engine::general_purpose::STANDARD.encode(&image.data));
    xml.push_str("\" />");
}

/// Append style attributes. `bold`/`italic` are written only when set.
fn push_style(xml: &mut String, style: &SpanStyle, with_flags: bool) {
    if with_flags && style.bold {
        xml.push_str(" bold=\"true\"");
    }
    if with_flags && style.italic {
        xml.push_str(" italic=\"true\"");
    }
    if let Some(family) = &style.family {
        xml.push_str(" family=\"");
        xml.push_str(&escape(family.as_str()));
        xml.push('"');
    }
    if let Some(size) = style.size {
        let _ = write!(xml, " size=\"{}\"", size.round() as i64);
    }
}
