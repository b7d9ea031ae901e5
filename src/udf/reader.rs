//! zip → `content.xml` → SpanModel.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use base64::Engine;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::template::CONTENT_ENTRY;
use crate::error::{Error, Result};
use crate::model::{
    Alignment, ImageDescriptor, ParagraphDescriptor, SpanDescriptor, SpanModel, SpanStyle,
    TextBuffer,
};
use crate::options::ErrorMode;

/// Extract `content.xml` from a UDF archive.
pub(crate) fn unpack(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::InvalidContainer(format!("not a zip archive: {e}")))?;

    let mut entry = archive.by_name(CONTENT_ENTRY).map_err(|e| match e {
        ZipError::FileNotFound => Error::InvalidContainer(format!("no {CONTENT_ENTRY} entry")),
        other => Error::from(other),
    })?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| Error::Xml(format!("{CONTENT_ENTRY} is not valid UTF-8: {e}")))?;
    Ok(xml)
}

/// Raw `<content>`/`<image>` element inside a paragraph.
#[derive(Debug)]
struct RawItem {
    is_image: bool,
    attrs: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct RawParagraph {
    attrs: HashMap<String, String>,
    items: Vec<RawItem>,
}

/// The variable sections of a parsed `content.xml`.
#[derive(Debug, Default)]
struct RawTemplate {
    content: Option<String>,
    paragraphs: Option<Vec<RawParagraph>>,
}

/// Parse `content.xml` into a span model.
pub(crate) fn parse_xml(xml: &str, mode: ErrorMode) -> Result<SpanModel> {
    let raw = scan(xml)?;

    let content = match raw.content {
        Some(text) if !text.is_empty() => text,
        Some(_) => return Err(Error::MissingContent("content element is empty".into())),
        None => return Err(Error::MissingContent("no content element".into())),
    };
    let text = strip_cdata_markers(&content);
    let mut model = SpanModel::with_buffer(TextBuffer::from_text(text));

    let Some(paragraphs) = raw.paragraphs else {
        log::debug!("no elements section, treating the content as one paragraph");
        let mut para = ParagraphDescriptor::default();
        para.add_span(SpanDescriptor::new(0, model.buffer.len(), SpanStyle::body()));
        model.push_paragraph(para);
        return Ok(model);
    };

    let buffer_len = model.buffer.len();
    for raw_para in paragraphs {
        let alignment = Alignment::from_code(
            raw_para.attrs.get("Alignment").map(String::as_str).unwrap_or("0"),
        );
        let mut para = ParagraphDescriptor::new(alignment);
        para.left_indent = indent_attr(&raw_para.attrs, "LeftIndent");
        para.right_indent = indent_attr(&raw_para.attrs, "RightIndent");

        for item in raw_para.items {
            let offset = numeric_attr(&item.attrs, "startOffset", mode)?;
            let length = numeric_attr(&item.attrs, "length", mode)?;
            let (offset, length) = fit_range(offset, length, buffer_len, mode)?;
            let style = read_style(&item.attrs);

            if item.is_image {
                if let Some(image) = read_image(&item.attrs, offset, length, style, mode)? {
                    para.add_image(image);
                }
            } else {
                para.add_span(SpanDescriptor::new(offset, length, style));
            }
        }

        model.push_paragraph(para);
    }

    log::debug!(
        "decoded {} paragraphs over {} characters",
        model.paragraph_count(),
        buffer_len
    );
    Ok(model)
}

/// Walk the document and collect the top-level `content` text and the
/// `elements/paragraph/{content,image}` structure.
fn scan(xml: &str) -> Result<RawTemplate> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut raw = RawTemplate::default();
    let mut path: Vec<Vec<u8>> = Vec::new();

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                visit_element(e, &path, &mut raw)?;
                if !is_empty {
                    path.push(e.local_name().as_ref().to_vec());
                }
            }
            Event::Text(e) if in_top_content(&path) => {
                let text = e.unescape()?;
                raw.content.get_or_insert_with(String::new).push_str(&text);
            }
            Event::CData(e) if in_top_content(&path) => {
                let bytes = e.into_inner();
                let text = std::str::from_utf8(&bytes)
                    .map_err(|err| Error::Xml(format!("content is not valid UTF-8: {err}")))?;
                raw.content.get_or_insert_with(String::new).push_str(text);
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(raw)
}

fn visit_element(e: &BytesStart<'_>, path: &[Vec<u8>], raw: &mut RawTemplate) -> Result<()> {
    let name = e.local_name();
    match (path.len(), name.as_ref()) {
        (1, b"content") => {
            raw.content.get_or_insert_with(String::new);
        }
        (1, b"elements") => {
            raw.paragraphs.get_or_insert_with(Vec::new);
        }
        (2, b"paragraph") if path[1] == b"elements" => {
            let attrs = collect_attrs(e)?;
            if let Some(paragraphs) = raw.paragraphs.as_mut() {
                paragraphs.push(RawParagraph {
                    attrs,
                    items: Vec::new(),
                });
            }
        }
        (3, item @ (b"content" | b"image")) if path[1] == b"elements" && path[2] == b"paragraph" => {
            let attrs = collect_attrs(e)?;
            if let Some(para) = raw.paragraphs.as_mut().and_then(|p| p.last_mut()) {
                para.items.push(RawItem {
                    is_image: item == b"image",
                    attrs,
                });
            }
        }
        _ => {}
    }
    Ok(())
}

fn in_top_content(path: &[Vec<u8>]) -> bool {
    path.len() == 2 && path[1] == b"content"
}

fn collect_attrs(e: &BytesStart<'_>) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        attrs.insert(key, attr.unescape_value()?.into_owned());
    }
    Ok(attrs)
}

/// Some producers leave literal CDATA markers in the text node.
fn strip_cdata_markers(text: &str) -> &str {
    text.strip_prefix("<![CDATA[")
        .and_then(|t| t.strip_suffix("]]>"))
        .unwrap_or(text)
}

fn numeric_attr(attrs: &HashMap<String, String>, key: &str, mode: ErrorMode) -> Result<usize> {
    let Some(value) = attrs.get(key) else {
        return Ok(0);
    };
    match value.trim().parse::<usize>() {
        Ok(n) => Ok(n),
        Err(_) if mode.is_lenient() => {
            log::warn!("unparsable {}={:?}, using 0", key, value);
            Ok(0)
        }
        Err(_) => Err(Error::encoding(
            0,
            0,
            0,
            format!("attribute {key}={value:?} is not a non-negative integer"),
        )),
    }
}

fn indent_attr(attrs: &HashMap<String, String>, key: &str) -> f32 {
    attrs
        .get(key)
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Apply the out-of-range policy: clamp in lenient mode, fail in strict mode.
fn fit_range(
    offset: usize,
    length: usize,
    buffer_len: usize,
    mode: ErrorMode,
) -> Result<(usize, usize)> {
    if offset.checked_add(length).is_some_and(|end| end <= buffer_len) {
        return Ok((offset, length));
    }
    if !mode.is_lenient() {
        return Err(Error::encoding(
            offset,
            length,
            buffer_len,
            "span extends past the end of the content",
        ));
    }
    let start = offset.min(buffer_len);
    let clamped = length.min(buffer_len - start);
    log::warn!(
        "span [{}, +{}) exceeds content of {} characters, clamped to [{}, +{})",
        offset,
        length,
        buffer_len,
        start,
        clamped
    );
    Ok((start, clamped))
}

fn read_style(attrs: &HashMap<String, String>) -> SpanStyle {
    SpanStyle {
        family: attrs.get("family").cloned(),
        size: attrs.get("size").and_then(|s| match s.trim().parse::<f32>() {
            Ok(size) if size.is_finite() && size > 0.0 => Some(size),
            _ => {
                log::warn!("ignoring font size {:?}", s);
                None
            }
        }),
        bold: attrs.get("bold").is_some_and(|v| v == "true"),
        italic: attrs.get("italic").is_some_and(|v| v == "true"),
    }
}

fn read_image(
    attrs: &HashMap<String, String>,
    offset: usize,
    length: usize,
    style: SpanStyle,
    mode: ErrorMode,
) -> Result<Option<ImageDescriptor>> {
    if length != 1 {
        if !mode.is_lenient() {
            return Err(Error::encoding(offset, length, 0, "image must have length 1"));
        }
        log::warn!("image at offset {} has length {}, skipping", offset, length);
        return Ok(None);
    }

    let encoded = attrs.get("imageData").map(String::as_str).unwrap_or("");
    match base64::engine::general_purpose::STANDARD.decode(encoded.trim()) {
        Ok(data) if !data.is_empty() => {
            Ok(Some(ImageDescriptor::new(offset, data).with_style(style)))
        }
        Ok(_) => {
            log::warn!("image at offset {} has no data, skipping", offset);
            Ok(None)
        }
        Err(e) if mode.is_lenient() => {
            log::warn!("image at offset {} has invalid base64 ({}), skipping", offset, e);
            Ok(None)
        }
        Err(e) => Err(Error::Image(format!("invalid imageData at offset {offset}: {e}"))),
    }
}
