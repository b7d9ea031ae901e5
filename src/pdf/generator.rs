//! Paragraph-flow PDF generator on top of lopdf.
//!
//! Lays [`Flowable`]s onto pages using the Helvetica base fonts: markup is
//! parsed into styled words, words are wrapped greedily into lines, lines
//! are aligned and the page breaks when the bottom margin is reached.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use quick_xml::events::Event;
use quick_xml::Reader;

use super::layout::PdfLayout;
use super::metrics::{self, Face, SPACE_WIDTH};
use super::{Flowable, PdfAlignment};
use crate::error::{Error, Result};

/// A run of text in one face inside a word, already WinAnsi-encoded.
#[derive(Debug, Clone, PartialEq)]
struct Piece {
    face: Face,
    bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Word {
    pieces: Vec<Piece>,
    width: f32,
}

impl Word {
    /// Append `c`; returns false when it had to be replaced with `?`.
    fn push(&mut self, c: char, face: Face, size: f32) -> bool {
        if matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}' | '\u{FFFC}') {
            return true;
        }
        let folded = metrics::fold(c);
        let Some(byte) = metrics::win_ansi(folded) else {
            return false;
        };
        let width = metrics::char_width(folded, face) as f32 * size / 1000.0;
        self.width += width;
        match self.pieces.last_mut() {
            Some(piece) if piece.face == face => piece.bytes.push(byte),
            _ => self.pieces.push(Piece {
                face,
                bytes: vec![byte],
            }),
        }
        folded != '?' || c == '?'
    }

    fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

#[derive(Debug, Default)]
struct Line {
    words: Vec<Word>,
    /// Words plus single spaces between them.
    width: f32,
}

/// Parse paragraph markup into words.
fn parse_words(markup: &str, size: f32) -> Result<Vec<Word>> {
    let wrapped = format!("<p>{markup}</p>");
    let mut reader = Reader::from_str(&wrapped);
    reader.trim_text(false);

    let mut words = Vec::new();
    let mut current = Word::default();
    let (mut bold, mut italic) = (0usize, 0usize);
    let mut replaced = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"b" | b"strong" => bold += 1,
                b"i" | b"em" => italic += 1,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"b" | b"strong" => bold = bold.saturating_sub(1),
                b"i" | b"em" => italic = italic.saturating_sub(1),
                _ => {}
            },
            Event::Text(e) => {
                let text = e.unescape()?;
                let face = Face::from_flags(bold > 0, italic > 0);
                for c in text.chars() {
                    if c.is_whitespace() {
                        if !current.is_empty() {
                            words.push(std::mem::take(&mut current));
                        }
                    } else if !current.push(c, face, size) {
                        replaced += 1;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !current.is_empty() {
        words.push(current);
    }
    if replaced > 0 {
        log::warn!(
            "{} characters have no Helvetica glyph and were replaced with '?'",
            replaced
        );
    }
    Ok(words)
}

/// Greedy line breaking. A word wider than the line sits on its own line.
fn wrap(words: Vec<Word>, max_width: f32, space: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::default();

    for word in words {
        let needed = if line.words.is_empty() {
            word.width
        } else {
            line.width + space + word.width
        };
        if needed > max_width && !line.words.is_empty() {
            lines.push(std::mem::take(&mut line));
            line.width = word.width;
        } else {
            line.width = needed;
        }
        line.words.push(word);
    }

    if !line.words.is_empty() {
        lines.push(line);
    }
    lines
}

/// Accumulates page content streams.
struct PageWriter<'a> {
    layout: &'a PdfLayout,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    /// Baseline of the next line.
    y: f32,
}

impl<'a> PageWriter<'a> {
    fn new(layout: &'a PdfLayout) -> Self {
        Self {
            layout,
            pages: Vec::new(),
            ops: Vec::new(),
            y: Self::first_baseline(layout),
        }
    }

    fn first_baseline(layout: &PdfLayout) -> f32 {
        layout.page_height - layout.margin_top - layout.font_size
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = Self::first_baseline(self.layout);
    }

    fn at_page_top(&self) -> bool {
        self.ops.is_empty() && self.y >= Self::first_baseline(self.layout)
    }

    fn break_if_full(&mut self) {
        if self.y < self.layout.margin_bottom && !self.at_page_top() {
            self.new_page();
        }
    }

    /// Advance one line without drawing anything.
    fn blank_line(&mut self) {
        self.break_if_full();
        self.y -= self.layout.leading;
    }

    fn space(&mut self, height: f32) {
        self.y -= height;
    }

    fn line(&mut self, line: &Line, alignment: PdfAlignment, last: bool) {
        self.break_if_full();

        let size = self.layout.font_size;
        let space = SPACE_WIDTH * size;
        let available = self.layout.text_width();
        let slack = (available - line.width).max(0.0);

        let (mut x, gap) = match alignment {
            PdfAlignment::Left => (0.0, space),
            PdfAlignment::Center => (slack / 2.0, space),
            PdfAlignment::Right => (slack, space),
            PdfAlignment::Justify if !last && line.words.len() > 1 => {
                (0.0, space + slack / (line.words.len() - 1) as f32)
            }
            PdfAlignment::Justify => (0.0, space),
        };
        x += self.layout.margin_left;

        self.ops.push(Operation::new("BT", vec![]));
        for word in &line.words {
            self.ops.push(Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    Object::Real(x),
                    Object::Real(self.y),
                ],
            ));
            for piece in &word.pieces {
                self.ops.push(Operation::new(
                    "Tf",
                    vec![
                        Object::Name(piece.face.resource_name().as_bytes().to_vec()),
                        Object::Real(size),
                    ],
                ));
                self.ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(
                        piece.bytes.clone(),
                        StringFormat::Hexadecimal,
                    )],
                ));
            }
            x += word.width + gap;
        }
        self.ops.push(Operation::new("ET", vec![]));

        self.y -= self.layout.leading;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(self.ops);
        }
        self.pages
    }
}

/// Lay out `flow` and serialize the resulting PDF.
pub fn generate(flow: &[Flowable], layout: &PdfLayout) -> Result<Vec<u8>> {
    let size = layout.font_size;
    let mut writer = PageWriter::new(layout);

    for item in flow {
        match item {
            Flowable::Paragraph(para) => {
                let words = parse_words(&para.markup, size).map_err(|e| {
                    Error::PdfGeneration(format!("invalid paragraph markup: {e}"))
                })?;
                let lines = wrap(words, layout.text_width(), SPACE_WIDTH * size);
                if lines.is_empty() {
                    writer.blank_line();
                }
                let count = lines.len();
                for (i, line) in lines.iter().enumerate() {
                    writer.line(line, para.alignment, i + 1 == count);
                }
            }
            Flowable::Spacer(height) => {
                if !writer.at_page_top() {
                    writer.space(*height);
                }
            }
        }
    }

    let pages = writer.finish();
    log::debug!("laid out {} flowables on {} pages", flow.len(), pages.len());
    write_document(pages, layout)
}

fn write_document(pages: Vec<Vec<Operation>>, layout: &PdfLayout) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for face in Face::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| Error::PdfGeneration(format!("cannot encode page content: {e}")))?;
        let stream = Stream::new(lopdf::Dictionary::new(), encoded);
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(layout.page_width),
                Object::Real(layout.page_height),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| Error::PdfGeneration(format!("cannot write PDF: {e}")))?;
    Ok(out)
}
