//! Standard-14 font support for synthesized pages.
//!
//! Cover and divider pages draw with Helvetica and Helvetica-Bold, the
//! same standard fonts the catalog PDFs were authored against. Standard
//! fonts are not embedded; viewers supply them, and their metrics are
//! fixed by the published AFM tables. The width tables here cover the
//! WinAnsi range the engine actually draws (ASCII plus a handful of
//! Latin-1 symbols such as the registered-trademark sign).
//!
//! Text is emitted into content streams as PDF literal strings with
//! WinAnsiEncoding; bytes outside ASCII are written as octal escapes so
//! the stream itself stays ASCII-clean.

use lopdf::{Document, Object, ObjectId};

/// Helvetica advance widths for WinAnsi codes 0x20..=0x7E, in 1/1000ths
/// of the font size (Adobe AFM).
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for WinAnsi codes 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Fallback width for WinAnsi codes outside the tables (accented
/// Latin-1 letters and the like). Matches the lowercase body width.
const DEFAULT_WIDTH: u16 = 556;

/// The two faces used on synthesized pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreFont {
    Helvetica,
    HelveticaBold,
}

impl CoreFont {
    /// Resource name used in content streams (`/F1 12 Tf`).
    pub const fn resource_name(self) -> &'static str {
        match self {
            Self::Helvetica => "F1",
            Self::HelveticaBold => "F2",
        }
    }

    const fn base_font(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Advance width of one WinAnsi code, in 1/1000ths of the size.
    fn code_width(self, code: u8) -> u16 {
        let table = match self {
            Self::Helvetica => &HELVETICA_WIDTHS,
            Self::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        match code {
            0x20..=0x7E => table[usize::from(code) - 0x20],
            // Symbols the engine draws outside ASCII
            0xAE | 0xA9 => 737, // registered, copyright
            0x99 => 1000,       // trademark
            0xB0 => 400,        // degree
            0x95 => 350,        // bullet
            _ => DEFAULT_WIDTH,
        }
    }

    /// Measured width of `text` at `size`, in page units.
    ///
    /// This is the measurement the divider auto-shrink loop runs
    /// against, so it must agree with what gets drawn: it measures the
    /// WinAnsi-encoded form of the text.
    #[allow(clippy::cast_precision_loss)]
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let total: u32 = text
            .chars()
            .map(|c| u32::from(self.code_width(win_ansi_code(c))))
            .sum();
        total as f32 * size / 1000.0
    }
}

/// Map a char to its WinAnsiEncoding code.
///
/// ASCII passes through; 0xA0..=0xFF matches Latin-1; the 0x80..0x9F
/// window holds the Windows-1252 specials. Anything unmappable renders
/// as '?', mirroring how a missing glyph would read.
pub fn win_ansi_code(c: char) -> u8 {
    let cp = u32::from(c);
    match c {
        '\u{20}'..='\u{7E}' => cp as u8,
        '\u{A0}'..='\u{FF}' => cp as u8,
        '\u{20AC}' => 0x80, // euro
        '\u{2018}' => 0x91, // left single quote
        '\u{2019}' => 0x92, // right single quote
        '\u{201C}' => 0x93, // left double quote
        '\u{201D}' => 0x94, // right double quote
        '\u{2022}' => 0x95, // bullet
        '\u{2013}' => 0x96, // en dash
        '\u{2014}' => 0x97, // em dash
        '\u{2122}' => 0x99, // trademark
        _ => b'?',
    }
}

/// Encode text as the body of a PDF literal string.
///
/// Backslash and parentheses are escaped; non-ASCII WinAnsi codes are
/// written as `\ddd` octal escapes.
pub fn encode_literal(text: &str) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match win_ansi_code(c) {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            code @ 0x20..=0x7E => out.push(char::from(code)),
            code => {
                let _ = write!(out, "\\{code:03o}");
            }
        }
    }
    out
}

/// Font objects embedded once per build and shared by every
/// synthesized page.
#[derive(Debug, Clone, Copy)]
pub struct FontResources {
    resources_id: ObjectId,
}

impl FontResources {
    /// Register both faces in the document and build the shared
    /// Resources dictionary synthesized pages reference.
    pub fn embed(doc: &mut Document) -> Self {
        let regular = add_standard_font(doc, CoreFont::Helvetica);
        let bold = add_standard_font(doc, CoreFont::HelveticaBold);

        let fonts = lopdf::Dictionary::from_iter([
            (
                CoreFont::Helvetica.resource_name(),
                Object::Reference(regular),
            ),
            (
                CoreFont::HelveticaBold.resource_name(),
                Object::Reference(bold),
            ),
        ]);
        let resources = lopdf::Dictionary::from_iter([("Font", Object::Dictionary(fonts))]);
        let resources_id = doc.add_object(Object::Dictionary(resources));

        Self { resources_id }
    }

    /// Shared Resources dictionary for a synthesized page.
    pub const fn resources_ref(self) -> Object {
        Object::Reference(self.resources_id)
    }
}

fn add_standard_font(doc: &mut Document, font: CoreFont) -> ObjectId {
    doc.add_object(lopdf::Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        (
            "BaseFont",
            Object::Name(font.base_font().as_bytes().to_vec()),
        ),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]))
}
