//! Helvetica metrics and WinAnsi encoding for the base-14 fonts.

use unicode_normalization::UnicodeNormalization;

/// One of the four Helvetica faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Face {
    Regular,
    Bold,
    Oblique,
    BoldOblique,
}

impl Face {
    pub(crate) const ALL: [Face; 4] = [Face::Regular, Face::Bold, Face::Oblique, Face::BoldOblique];

    pub(crate) fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => Face::Regular,
            (true, false) => Face::Bold,
            (false, true) => Face::Oblique,
            (true, true) => Face::BoldOblique,
        }
    }

    /// Resource name in the page font dictionary.
    pub(crate) fn resource_name(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
            Face::Oblique => "F3",
            Face::BoldOblique => "F4",
        }
    }

    pub(crate) fn base_font(self) -> &'static str {
        match self {
            Face::Regular => "Helvetica",
            Face::Bold => "Helvetica-Bold",
            Face::Oblique => "Helvetica-Oblique",
            Face::BoldOblique => "Helvetica-BoldOblique",
        }
    }

    fn is_bold(self) -> bool {
        matches!(self, Face::Bold | Face::BoldOblique)
    }
}

/// Advance widths of ASCII 32..=126 in 1/1000 em (obliques share these).
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Width of the space character, identical in every Helvetica face.
pub(crate) const SPACE_WIDTH: f32 = 0.278;

/// WinAnsi code points 0x80..=0x9F that differ from Latin-1.
const WIN_ANSI_EXTRA: [(char, u8, u16); 19] = [
    ('€', 0x80, 556),
    ('‚', 0x82, 222),
    ('„', 0x84, 333),
    ('…', 0x85, 1000),
    ('Š', 0x8A, 667),
    ('Œ', 0x8C, 1000),
    ('Ž', 0x8E, 611),
    ('‘', 0x91, 222),
    ('’', 0x92, 222),
    ('“', 0x93, 333),
    ('”', 0x94, 333),
    ('•', 0x95, 350),
    ('–', 0x96, 556),
    ('—', 0x97, 1000),
    ('™', 0x99, 1000),
    ('š', 0x9A, 500),
    ('œ', 0x9C, 944),
    ('ž', 0x9E, 500),
    ('Ÿ', 0x9F, 667),
];

/// Encode a character as a WinAnsi byte, if the encoding has it.
pub(crate) fn win_ansi(c: char) -> Option<u8> {
    match c {
        ' '..='~' => Some(c as u8),
        '\u{A0}'..='\u{FF}' => Some(c as u32 as u8),
        _ => WIN_ANSI_EXTRA
            .iter()
            .find(|(ch, _, _)| *ch == c)
            .map(|(_, code, _)| *code),
    }
}

/// Map `c` to a character the base fonts can show.
///
/// Letters outside WinAnsi are folded to their base letter (`ş` → `s`,
/// `İ` → `I`); anything else becomes `?`.
pub(crate) fn fold(c: char) -> char {
    if win_ansi(c).is_some() {
        return c;
    }
    if c.is_whitespace() {
        return ' ';
    }
    if c == 'ı' {
        return 'i';
    }
    c.nfd()
        .next()
        .filter(|base| win_ansi(*base).is_some())
        .unwrap_or('?')
}

/// Advance width of `c` in 1/1000 em. `c` must already be folded.
pub(crate) fn char_width(c: char, face: Face) -> u16 {
    let table = if face.is_bold() {
        &HELVETICA_BOLD
    } else {
        &HELVETICA
    };

    match c {
        ' '..='~' => table[c as usize - 32],
        '\u{A0}' => table[0],
        _ => {
            if let Some((_, _, width)) = WIN_ANSI_EXTRA.iter().find(|(ch, _, _)| *ch == c) {
                return *width;
            }
            // Accented Latin-1 letters take the width of their base letter.
            match c.nfd().next() {
                Some(base @ ' '..='~') => table[base as usize - 32],
                _ => 556,
            }
        }
    }
}
