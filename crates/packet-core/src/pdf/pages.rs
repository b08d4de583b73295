//! Cover and divider page synthesis.
//!
//! Layout runs top-down with a vertical cursor. The cover is assumed to
//! fit one page; a very long document list keeps decrementing the
//! cursor and draws past the bottom margin rather than paginating.

use crate::model::{DocumentRef, FormData, status_label};

use super::canvas::{PAGE_HEIGHT, PAGE_WIDTH, PageCanvas, Rgb};
use super::font::CoreFont;

const BRAND_NAVY: Rgb = Rgb::new(0.1, 0.1, 0.4);
const HEADING_GRAY: Rgb = Rgb::new(0.2, 0.2, 0.2);
const BODY_GRAY: Rgb = Rgb::new(0.3, 0.3, 0.3);
const FOOTER_GRAY: Rgb = Rgb::new(0.5, 0.5, 0.5);
const DIVIDER_BACKGROUND: Rgb = Rgb::new(0.98, 0.98, 0.99);
const CATEGORY_GRAY: Rgb = Rgb::new(0.4, 0.4, 0.5);
const BRAND_SLATE: Rgb = Rgb::new(0.3, 0.3, 0.4);

const MARGIN: f32 = 50.0;
const VALUE_COLUMN_X: f32 = 200.0;
const FIELD_ROW_HEIGHT: f32 = 25.0;
const LIST_ROW_HEIGHT: f32 = 20.0;
const LIST_INDENT_X: f32 = 70.0;

/// Divider title sizing: shrink from 28 down to a 16-point floor until
/// the measured width fits the page minus side margins.
const TITLE_MAX_SIZE: f32 = 28.0;
const TITLE_MIN_SIZE: f32 = 16.0;
const TITLE_MAX_WIDTH: f32 = PAGE_WIDTH - 120.0;

const BRAND_WORDMARK: &str = "MAXTERRA\u{AE}";
const COPYRIGHT_LINE: &str = "(c) 2025 NEXGEN Building Products, LLC";

/// Synthesize the cover page for a build.
///
/// The "Included Documents" section lists every requested document in
/// input order, regardless of whether its content later resolves.
pub fn cover_page(form: &FormData, documents: &[DocumentRef]) -> PageCanvas {
    let mut canvas = PageCanvas::new();
    let mut y = PAGE_HEIGHT - 80.0;

    // Title block
    canvas.draw_text("MAXTERRA", MARGIN, y, 36.0, CoreFont::HelveticaBold, BRAND_NAVY);
    y -= 40.0;
    canvas.draw_text(
        "Submittal Package",
        MARGIN,
        y,
        24.0,
        CoreFont::Helvetica,
        HEADING_GRAY,
    );
    y -= 60.0;
    canvas.draw_line((MARGIN, y), (PAGE_WIDTH - MARGIN, y), 2.0, BRAND_NAVY);
    y -= 40.0;

    // Form fields, one row per non-empty value
    let mut field = |canvas: &mut PageCanvas, label: &str, value: &str| {
        if value.is_empty() {
            return;
        }
        canvas.draw_text(label, MARGIN, y, 12.0, CoreFont::HelveticaBold, HEADING_GRAY);
        canvas.draw_text(value, VALUE_COLUMN_X, y, 12.0, CoreFont::Helvetica, BODY_GRAY);
        y -= FIELD_ROW_HEIGHT;
    };

    field(&mut canvas, "Submitted To:", &form.submitted_to);
    field(&mut canvas, "Project Name:", &form.project_name);
    if let Some(number) = &form.project_number {
        field(&mut canvas, "Project Number:", number);
    }
    field(&mut canvas, "Prepared By:", &form.prepared_by);
    field(&mut canvas, "Contact:", &form.phone_email);
    field(&mut canvas, "Date:", &form.date);
    field(&mut canvas, "Product Size:", &form.product_size);

    // Status section: only the flags that are set
    y -= 20.0;
    canvas.draw_text("Status:", MARGIN, y, 12.0, CoreFont::HelveticaBold, HEADING_GRAY);
    y -= 20.0;
    for key in form.checked_status() {
        canvas.draw_text(
            &format!("[X] {}", status_label(key)),
            LIST_INDENT_X,
            y,
            11.0,
            CoreFont::Helvetica,
            BODY_GRAY,
        );
        y -= LIST_ROW_HEIGHT;
    }

    // Included documents, numbered in input order
    y -= 10.0;
    canvas.draw_text(
        "Included Documents:",
        MARGIN,
        y,
        12.0,
        CoreFont::HelveticaBold,
        HEADING_GRAY,
    );
    y -= FIELD_ROW_HEIGHT;
    for (index, document) in documents.iter().enumerate() {
        canvas.draw_text(
            &format!("{}. {}", index + 1, document.name),
            LIST_INDENT_X,
            y,
            11.0,
            CoreFont::Helvetica,
            BODY_GRAY,
        );
        y -= LIST_ROW_HEIGHT;
    }

    canvas.draw_text(COPYRIGHT_LINE, MARGIN, 50.0, 10.0, CoreFont::Helvetica, FOOTER_GRAY);

    canvas
}

/// Synthesize the divider page inserted before one document's pages.
pub fn divider_page(title: &str, category: &str) -> PageCanvas {
    let mut canvas = PageCanvas::new();
    let center_y = PAGE_HEIGHT / 2.0;

    canvas.draw_rect(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT, DIVIDER_BACKGROUND);
    canvas.draw_line(
        (MARGIN, PAGE_HEIGHT - MARGIN),
        (PAGE_WIDTH - MARGIN, PAGE_HEIGHT - MARGIN),
        3.0,
        BRAND_NAVY,
    );
    canvas.draw_line((MARGIN, MARGIN), (PAGE_WIDTH - MARGIN, MARGIN), 3.0, BRAND_NAVY);

    canvas.draw_text_centered(
        &category.to_uppercase(),
        center_y + 60.0,
        14.0,
        CoreFont::Helvetica,
        CATEGORY_GRAY,
    );

    let title_size = fit_title_size(title);
    canvas.draw_text_centered(title, center_y, title_size, CoreFont::HelveticaBold, BRAND_NAVY);

    canvas.draw_text_centered(
        BRAND_WORDMARK,
        center_y - 60.0,
        16.0,
        CoreFont::HelveticaBold,
        BRAND_SLATE,
    );

    canvas
}

/// Largest integer size in [16, 28] at which the title fits the
/// divider width; floors at 16 even if the title still overflows.
pub fn fit_title_size(title: &str) -> f32 {
    let mut size = TITLE_MAX_SIZE;
    while CoreFont::HelveticaBold.text_width(title, size) > TITLE_MAX_WIDTH && size > TITLE_MIN_SIZE
    {
        size -= 1.0;
    }
    size
}
