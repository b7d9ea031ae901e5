//! Page text and image extraction backed by lopdf.

use lopdf::{Dictionary, Document, Object, ObjectId};

use super::{ExtractedImage, ExtractedPage, ImageEncoding};
use crate::error::{Error, Result};
use crate::options::ErrorMode;

/// Extract text and raster images from every page of a PDF.
///
/// `source` names the document in error messages. A document that cannot
/// be loaded is a [`Error::SourceRead`]; a page whose text cannot be
/// extracted is skipped in lenient mode.
pub fn extract_pages(data: &[u8], source: &str, mode: ErrorMode) -> Result<Vec<ExtractedPage>> {
    let doc = Document::load_mem(data).map_err(|e| Error::source_read(source, e))?;
    if doc.is_encrypted() {
        return Err(Error::source_read(source, "document is encrypted"));
    }

    let pages = doc.get_pages();
    let mut extracted = Vec::with_capacity(pages.len());

    for (page_num, page_id) in pages {
        let text = match doc.extract_text(&[page_num]) {
            Ok(text) => text,
            Err(e) if mode.is_lenient() => {
                log::warn!("Failed to extract text from page {}: {}", page_num, e);
                String::new()
            }
            Err(e) => return Err(Error::source_read(source, format!("page {page_num}: {e}"))),
        };

        let images = page_images(&doc, page_id);
        log::debug!(
            "page {}: {} characters, {} images",
            page_num,
            text.chars().count(),
            images.len()
        );
        extracted.push(ExtractedPage { text, images });
    }

    Ok(extracted)
}

/// Image XObjects referenced from a page's resources, in dictionary order.
fn page_images(doc: &Document, page_id: ObjectId) -> Vec<ExtractedImage> {
    let Some(xobjects) = doc
        .get_dictionary(page_id)
        .ok()
        .and_then(|page| page.get(b"Resources").ok())
        .and_then(|res| resolve_dict(doc, res))
        .and_then(|res| res.get(b"XObject").ok())
        .and_then(|xobj| resolve_dict(doc, xobj))
    else {
        return Vec::new();
    };

    let mut images = Vec::new();
    for (name, obj) in xobjects.iter() {
        let Ok(obj_ref) = obj.as_reference() else {
            continue;
        };
        match extract_xobject(doc, obj_ref) {
            Ok(Some(image)) => images.push(image),
            Ok(None) => {}
            Err(e) => log::warn!(
                "skipping XObject {}: {}",
                String::from_utf8_lossy(name),
                e
            ),
        }
    }
    images
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(r) => doc.get_dictionary(*r).ok(),
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

/// Read one XObject. Non-image XObjects yield `None`.
fn extract_xobject(doc: &Document, obj_ref: ObjectId) -> Result<Option<ExtractedImage>> {
    let Object::Stream(stream) = doc.get_object(obj_ref)? else {
        return Err(Error::Image("XObject is not a stream".to_string()));
    };
    let dict = &stream.dict;

    match dict.get(b"Subtype").and_then(|s| s.as_name()) {
        Ok(b"Image") => {}
        _ => return Ok(None),
    }

    let filters = filter_names(dict);
    match filters.as_slice() {
        [f] if f == "DCTDecode" => {
            return Ok(Some(ExtractedImage::new(
                stream.content.clone(),
                ImageEncoding::Jpeg,
            )));
        }
        [] => {}
        [f] if f == "FlateDecode" => {}
        other => {
            return Err(Error::Image(format!("unsupported image filter {:?}", other)));
        }
    }

    let width = dimension(dict, b"Width")?;
    let height = dimension(dict, b"Height")?;
    let bits = dict
        .get(b"BitsPerComponent")
        .and_then(|b| b.as_i64())
        .unwrap_or(8);
    if bits != 8 {
        return Err(Error::Image(format!("{} bits per component", bits)));
    }

    let components = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|cs| color_components(doc, cs))
        .ok_or_else(|| Error::Image("unsupported color space".to_string()))?;

    let data = if filters.is_empty() {
        stream.content.clone()
    } else {
        stream.decompressed_content()?
    };

    Ok(Some(ExtractedImage::new(
        data,
        ImageEncoding::Raw {
            width,
            height,
            components,
        },
    )))
}

fn filter_names(dict: &Dictionary) -> Vec<String> {
    match dict.get(b"Filter") {
        Ok(Object::Name(n)) => vec![String::from_utf8_lossy(n).into_owned()],
        Ok(Object::Array(arr)) => arr
            .iter()
            .filter_map(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .collect(),
        _ => Vec::new(),
    }
}

fn dimension(dict: &Dictionary, key: &[u8]) -> Result<u32> {
    dict.get(key)
        .and_then(|v| v.as_i64())
        .ok()
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            Error::Image(format!(
                "missing or invalid /{}",
                String::from_utf8_lossy(key)
            ))
        })
}

/// Samples per pixel for gray and RGB color spaces, including ICC-based ones.
fn color_components(doc: &Document, cs: &Object) -> Option<u8> {
    match cs {
        Object::Name(name) => match name.as_slice() {
            b"DeviceGray" | b"CalGray" => Some(1),
            b"DeviceRGB" | b"CalRGB" => Some(3),
            _ => None,
        },
        Object::Reference(r) => color_components(doc, doc.get_object(*r).ok()?),
        Object::Array(arr) => match arr.first()?.as_name().ok()? {
            b"ICCBased" => {
                let Object::Stream(profile) = doc.get_object(arr.get(1)?.as_reference().ok()?).ok()?
                else {
                    return None;
                };
                match profile.dict.get(b"N").and_then(|n| n.as_i64()).ok()? {
                    1 => Some(1),
                    3 => Some(3),
                    _ => None,
                }
            }
            b"CalGray" => Some(1),
            b"CalRGB" => Some(3),
            _ => None,
        },
        _ => None,
    }
}
