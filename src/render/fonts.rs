//! Standard PDF fonts: selection, encoding and metrics.
//!
//! Documents use the base-14 fonts so nothing has to be embedded. Text faces
//! use `WinAnsiEncoding`; characters outside it fall back to the Symbol or
//! ZapfDingbats fonts when they have a glyph there, and to `?` otherwise.

/// A base-14 font face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    Symbol,
    ZapfDingbats,
}

impl FontFace {
    /// Every face, in resource order.
    pub const ALL: [FontFace; 8] = [
        FontFace::Helvetica,
        FontFace::HelveticaBold,
        FontFace::HelveticaOblique,
        FontFace::HelveticaBoldOblique,
        FontFace::Courier,
        FontFace::CourierBold,
        FontFace::Symbol,
        FontFace::ZapfDingbats,
    ];

    /// Pick the text face for a combination of inline styles.
    pub fn select(bold: bool, italic: bool, monospace: bool) -> Self {
        match (monospace, bold, italic) {
            (true, true, _) => FontFace::CourierBold,
            (true, false, _) => FontFace::Courier,
            (false, true, true) => FontFace::HelveticaBoldOblique,
            (false, true, false) => FontFace::HelveticaBold,
            (false, false, true) => FontFace::HelveticaOblique,
            (false, false, false) => FontFace::Helvetica,
        }
    }

    /// PostScript name written to the font dictionary.
    pub fn base_font(self) -> &'static str {
        match self {
            FontFace::Helvetica => "Helvetica",
            FontFace::HelveticaBold => "Helvetica-Bold",
            FontFace::HelveticaOblique => "Helvetica-Oblique",
            FontFace::HelveticaBoldOblique => "Helvetica-BoldOblique",
            FontFace::Courier => "Courier",
            FontFace::CourierBold => "Courier-Bold",
            FontFace::Symbol => "Symbol",
            FontFace::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Name of the face in the page resource dictionary.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontFace::Helvetica => "F1",
            FontFace::HelveticaBold => "F2",
            FontFace::HelveticaOblique => "F3",
            FontFace::HelveticaBoldOblique => "F4",
            FontFace::Courier => "F5",
            FontFace::CourierBold => "F6",
            FontFace::Symbol => "F7",
            FontFace::ZapfDingbats => "F8",
        }
    }

    /// Whether the face is declared with `WinAnsiEncoding`.
    ///
    /// Symbol and ZapfDingbats use their built-in encodings.
    pub fn is_text_face(self) -> bool {
        !matches!(self, FontFace::Symbol | FontFace::ZapfDingbats)
    }

    /// Whether every glyph has the same advance.
    pub fn is_monospace(self) -> bool {
        matches!(self, FontFace::Courier | FontFace::CourierBold)
    }

    fn is_bold(self) -> bool {
        matches!(
            self,
            FontFace::HelveticaBold | FontFace::HelveticaBoldOblique | FontFace::CourierBold
        )
    }

    /// Advance width of a byte in this face, in 1/1000 em.
    pub fn glyph_width(self, code: u8) -> u16 {
        match self {
            FontFace::Courier | FontFace::CourierBold => 600,
            FontFace::Symbol => symbol_width(code),
            FontFace::ZapfDingbats => dingbats_width(code),
            _ => helvetica_width(code, self.is_bold()),
        }
    }
}

/// A run of encoded bytes drawn with one face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRun {
    pub face: FontFace,
    pub bytes: Vec<u8>,
}

impl EncodedRun {
    /// Width of the run at `size` points.
    pub fn width(&self, size: f32) -> f32 {
        let units: u32 = self
            .bytes
            .iter()
            .map(|&b| u32::from(self.face.glyph_width(b)))
            .sum();
        units as f32 * size / 1000.0
    }
}

/// Encode `text` for drawing with `face`, splitting it wherever a character
/// needs the Symbol or ZapfDingbats font.
pub fn encode(text: &str, face: FontFace) -> Vec<EncodedRun> {
    let mut runs: Vec<EncodedRun> = Vec::new();
    for c in text.chars() {
        let Some((target, code)) = encode_char(c, face) else {
            continue;
        };
        match runs.last_mut() {
            Some(run) if run.face == target => run.bytes.push(code),
            _ => runs.push(EncodedRun {
                face: target,
                bytes: vec![code],
            }),
        }
    }
    runs
}

/// Width of `text` drawn with `face` at `size` points.
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    encode(text, face).iter().map(|run| run.width(size)).sum()
}

/// Map one character to a face and byte. `None` means the character has no
/// visible form and is dropped.
pub fn encode_char(c: char, face: FontFace) -> Option<(FontFace, u8)> {
    match c {
        // Variation selectors and joiners only modify neighbouring glyphs.
        '\u{FE0E}' | '\u{FE0F}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' => None,
        '\t' => Some((face, b' ')),
        _ => {
            if let Some(code) = win_ansi(c) {
                Some((face, code))
            } else if let Some(code) = dingbat(c) {
                Some((FontFace::ZapfDingbats, code))
            } else if let Some(code) = symbol(c) {
                Some((FontFace::Symbol, code))
            } else if c.is_control() {
                None
            } else {
                Some((face, b'?'))
            }
        }
    }
}

/// WinAnsiEncoding (Windows-1252) code for `c`.
pub fn win_ansi(c: char) -> Option<u8> {
    let code = match c {
        ' '..='~' => c as u8,
        '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(code)
}

fn dingbat(c: char) -> Option<u8> {
    let code = match c {
        '\u{2713}' => 0x33,
        '\u{2714}' => 0x34,
        '\u{2717}' => 0x37,
        '\u{2718}' => 0x38,
        '\u{2605}' => 0x48,
        '\u{25CF}' => 0x6C,
        '\u{25CB}' => 0x6D,
        '\u{25A0}' => 0x6E,
        '\u{2610}' | '\u{25A1}' => 0x6F,
        '\u{25B2}' => 0x73,
        '\u{25BC}' => 0x74,
        '\u{25C6}' => 0x75,
        '\u{2794}' => 0xD4,
        _ => return None,
    };
    Some(code)
}

fn symbol(c: char) -> Option<u8> {
    let code = match c {
        '\u{2264}' => 0xA3,
        '\u{221E}' => 0xA5,
        '\u{2194}' => 0xAB,
        '\u{2190}' => 0xAC,
        '\u{2191}' => 0xAD,
        '\u{2192}' => 0xAE,
        '\u{2193}' => 0xAF,
        '\u{2265}' => 0xB3,
        '\u{2260}' => 0xB9,
        '\u{2248}' => 0xBB,
        '\u{21D2}' => 0xDE,
        '\u{21D0}' => 0xDC,
        '\u{21D4}' => 0xDB,
        '\u{2211}' => 0xE5,
        '\u{03B1}' => 0x61,
        '\u{03B2}' => 0x62,
        '\u{03B4}' => 0x64,
        '\u{03BB}' => 0x6C,
        '\u{03C0}' => 0x70,
        '\u{0394}' => 0x44,
        _ => return None,
    };
    Some(code)
}

fn symbol_width(code: u8) -> u16 {
    match code {
        0xAB => 1042,
        0xAC | 0xAE | 0xDB | 0xDC | 0xDE => 987,
        0xAD | 0xAF => 603,
        0xA5 => 713,
        0xE5 => 713,
        0x44 | 0x61 => 631,
        0x62 => 549,
        0x64 => 494,
        0x6C => 549,
        0x70 => 549,
        _ => 549,
    }
}

fn dingbats_width(code: u8) -> u16 {
    match code {
        0x33 => 755,
        0x34 => 846,
        0x37 => 768,
        0x38 => 792,
        0x48 => 816,
        0x6C => 791,
        0x6D => 776,
        0x6E | 0x6F => 761,
        0x73 | 0x74 => 892,
        0x75 => 759,
        0xD4 => 838,
        _ => 788,
    }
}

/// Helvetica advance widths for 0x20..=0x7E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold advance widths for 0x20..=0x7E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

fn helvetica_width(code: u8, bold: bool) -> u16 {
    if (0x20..=0x7E).contains(&code) {
        let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
        return table[usize::from(code - 0x20)];
    }
    // Upper half shared between weights.
    match code {
        0x80 => 556,
        0x82 | 0x91 | 0x92 => {
            if bold {
                278
            } else {
                222
            }
        }
        0x84 | 0x93 | 0x94 => {
            if bold {
                500
            } else {
                333
            }
        }
        0x85 | 0x89 | 0x97 | 0x99 | 0x8C | 0xC6 => 1000,
        0x86 | 0x87 | 0x96 => 556,
        0x88 | 0x98 => 333,
        0x8B | 0x9B => 333,
        0x95 => 350,
        0x8A | 0x9A => 667,
        0x9C | 0xE6 => 944,
        0xA0 => 278,
        0xA1 | 0xAD => 333,
        0xA2..=0xA5 => 556,
        0xA6 => 260,
        0xA7 => 556,
        0xA8 | 0xAF | 0xB4 | 0xB8 => 333,
        0xA9 | 0xAE => 737,
        0xAA | 0xBA => 370,
        0xAB | 0xBB => 556,
        0xAC | 0xB1 | 0xD7 | 0xF7 => 584,
        0xB0 => 400,
        0xB2 | 0xB3 | 0xB9 => 333,
        0xB5 | 0xB6 => 556,
        0xB7 => 278,
        0xBC..=0xBE => 834,
        0xBF => 611,
        0xC0..=0xC5 => 667,
        0xC7 => 722,
        0xC8..=0xCB => 667,
        0xCC..=0xCF => 278,
        0xD0 | 0xD1 => 722,
        0xD2..=0xD6 | 0xD8 => 778,
        0xD9..=0xDC => 722,
        0xDD | 0xDE => 667,
        0xDF => 611,
        0xE7 | 0xFD | 0xFF => 500,
        0xEC..=0xEF => 278,
        0xF8 => 611,
        _ => 556,
    }
}
