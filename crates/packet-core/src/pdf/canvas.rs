//! Drawing surface for synthesized pages.
//!
//! # Coordinate System
//!
//! PDF uses a **bottom-left origin** coordinate system where:
//! - (0, 0) is at the bottom-left corner of the page
//! - X increases to the right
//! - Y increases upward
//!
//! Every synthesized page is US Letter (612x792 units). The canvas
//! accumulates raw content-stream operators; the packet accumulator
//! turns it into a page object with the build's shared font resources.

use std::fmt::Write;

use super::font::{CoreFont, encode_literal};

/// Page width in PDF units (US Letter).
pub const PAGE_WIDTH: f32 = 612.0;

/// Page height in PDF units (US Letter).
pub const PAGE_HEIGHT: f32 = 792.0;

/// An RGB color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Content-stream builder for one synthesized page.
///
/// Operators are appended in call order; later draws paint over
/// earlier ones.
#[derive(Debug, Default)]
pub struct PageCanvas {
    content: String,
}

impl PageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a line of text with its baseline at (x, y).
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, font: CoreFont, color: Rgb) {
        let _ = writeln!(
            self.content,
            "BT\n{} {} {} rg\n/{} {} Tf\n{} {} Td\n({}) Tj\nET",
            color.r,
            color.g,
            color.b,
            font.resource_name(),
            size,
            x,
            y,
            encode_literal(text),
        );
    }

    /// Draw a line of text horizontally centered on the page.
    pub fn draw_text_centered(&mut self, text: &str, y: f32, size: f32, font: CoreFont, color: Rgb) {
        let width = font.text_width(text, size);
        self.draw_text(text, (PAGE_WIDTH - width) / 2.0, y, size, font, color);
    }

    /// Stroke a straight line between two points.
    pub fn draw_line(&mut self, start: (f32, f32), end: (f32, f32), thickness: f32, color: Rgb) {
        let _ = writeln!(
            self.content,
            "{} {} {} RG\n{} w\n{} {} m\n{} {} l\nS",
            color.r, color.g, color.b, thickness, start.0, start.1, end.0, end.1,
        );
    }

    /// Fill a rectangle with its lower-left corner at (x, y).
    pub fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        let _ = writeln!(
            self.content,
            "{} {} {} rg\n{} {} {} {} re\nf",
            color.r, color.g, color.b, x, y, width, height,
        );
    }

    /// Finished content stream bytes, bracketed by a saved graphics
    /// state so page content never leaks operator state.
    pub fn into_content(self) -> Vec<u8> {
        format!("q\n{}Q\n", self.content).into_bytes()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn text_emits_tj_with_font_and_position() {
        let mut canvas = PageCanvas::new();
        canvas.draw_text(
            "MAXTERRA",
            50.0,
            712.0,
            36.0,
            CoreFont::HelveticaBold,
            Rgb::new(0.1, 0.1, 0.4),
        );
        let content = String::from_utf8(canvas.into_content()).unwrap();
        assert!(content.contains("/F2 36 Tf"));
        assert!(content.contains("50 712 Td"));
        assert!(content.contains("(MAXTERRA) Tj"));
    }

    #[test]
    fn centered_text_offsets_by_half_measured_width() {
        let mut canvas = PageCanvas::new();
        let width = CoreFont::Helvetica.text_width("X", 10.0);
        canvas.draw_text_centered("X", 100.0, 10.0, CoreFont::Helvetica, Rgb::new(0.0, 0.0, 0.0));
        let content = String::from_utf8(canvas.into_content()).unwrap();
        let expected_x = (PAGE_WIDTH - width) / 2.0;
        assert!(content.contains(&format!("{expected_x} 100 Td")));
    }

    #[test]
    fn rect_and_line_use_fill_and_stroke_operators() {
        let mut canvas = PageCanvas::new();
        canvas.draw_rect(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT, Rgb::new(0.98, 0.98, 0.99));
        canvas.draw_line((50.0, 742.0), (562.0, 742.0), 3.0, Rgb::new(0.1, 0.1, 0.4));
        let content = String::from_utf8(canvas.into_content()).unwrap();
        assert!(content.contains("0 0 612 792 re\nf"));
        assert!(content.contains("3 w"));
        assert!(content.contains("50 742 m\n562 742 l\nS"));
    }

    #[test]
    fn content_is_bracketed_by_graphics_state() {
        let content = String::from_utf8(PageCanvas::new().into_content()).unwrap();
        assert!(content.starts_with("q\n"));
        assert!(content.ends_with("Q\n"));
    }
}
