use crate::error::{AppError, Result};
use printpdf::{BuiltinFont, Mm, PdfDocument};

pub const TITLE: &str = "Life Simulation Log";

// US Letter, in points
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 50.0;
const BOTTOM_LIMIT: f32 = 60.0;
const TITLE_GAP: f32 = 20.0;
const LINE_HEIGHT: f32 = 14.0;
const MAX_LINE_CHARS: usize = 110;

fn pt(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn pdf_err(e: impl std::fmt::Display) -> AppError {
    AppError::PdfError(e.to_string())
}

/// Render log lines into a paginated PDF: a bold title, then one line of
/// text per entry.
pub fn render_log(lines: &[String]) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(TITLE, pt(PAGE_WIDTH), pt(PAGE_HEIGHT), "Layer 1");
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_err)?;

    let mut current = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT - MARGIN;

    current.use_text(TITLE, 14.0, pt(MARGIN), pt(y), &bold);
    y -= TITLE_GAP;

    for line in lines {
        if y < BOTTOM_LIMIT {
            let (page, layer) = doc.add_page(pt(PAGE_WIDTH), pt(PAGE_HEIGHT), "Layer 1");
            current = doc.get_page(page).get_layer(layer);
            y = PAGE_HEIGHT - MARGIN;
        }
        current.use_text(truncate(line), 10.0, pt(MARGIN), pt(y), &regular);
        y -= LINE_HEIGHT;
    }

    doc.save_to_bytes().map_err(pdf_err)
}

fn truncate(line: &str) -> String {
    line.chars().take(MAX_LINE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_log() {
        let bytes = render_log(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_spans_multiple_pages() {
        let per_page = ((PAGE_HEIGHT - MARGIN - BOTTOM_LIMIT) / LINE_HEIGHT) as usize + 1;
        let lines: Vec<String> = (0..per_page * 3)
            .map(|i| format!("[2024-01-01 00:00:00 UTC] Event number {}", i))
            .collect();

        let bytes = render_log(&lines).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let long = "é".repeat(200);
        assert_eq!(truncate(&long).chars().count(), MAX_LINE_CHARS);
        assert_eq!(truncate("short"), "short");
    }
}
