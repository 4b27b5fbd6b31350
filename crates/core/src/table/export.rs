//! Table export: text grid and markdown serialization.

use crate::geometry::BBox;
use crate::page::TextProvider;
use crate::table::grid::Table;
use crate::table::types::Char;
use crate::table::words;

/// A glyph belongs to a rectangle when the overlap covers more than this
/// share of the glyph's own area.
const GLYPH_OVERLAP_RATIO: f64 = 0.5;

/// Default [`TextProvider`]: resolves text from a page's characters.
pub struct CharTextProvider<'a> {
    chars: &'a [Char],
    x_tolerance: f64,
    y_tolerance: f64,
}

impl<'a> CharTextProvider<'a> {
    pub fn new(chars: &'a [Char], x_tolerance: f64, y_tolerance: f64) -> Self {
        Self {
            chars,
            x_tolerance,
            y_tolerance,
        }
    }
}

impl TextProvider for CharTextProvider<'_> {
    fn text_under_rect(&self, bbox: &BBox) -> String {
        let inside: Vec<Char> = self
            .chars
            .iter()
            .filter(|c| {
                let area = c.bbox.area();
                if area <= 0.0 {
                    return false;
                }
                match c.bbox.overlap(bbox) {
                    Some(o) => o.area() > GLYPH_OVERLAP_RATIO * area,
                    None => false,
                }
            })
            .cloned()
            .collect();
        words::extract_text(&inside, self.x_tolerance, self.y_tolerance)
    }
}

/// Extract a table as a row-by-column text grid.
///
/// Every row is padded with empty strings up to the table's column count,
/// so ragged tables export as rectangular grids.
pub fn extract_grid(table: &Table, provider: &dyn TextProvider) -> Vec<Vec<String>> {
    let col_count = table.col_count();
    table
        .rows
        .iter()
        .map(|row| {
            let mut out: Vec<String> = row
                .cells
                .iter()
                .map(|cell| provider.text_under_rect(cell))
                .collect();
            out.resize(col_count, String::new());
            out
        })
        .collect()
}

fn markdown_cell(text: &str) -> String {
    text.replace('\n', " ").replace('|', "\\|")
}

/// Serialize a table to a markdown grid.
///
/// The header row uses the table's header names with `Col<N>` filling any
/// columns beyond the header's width. Data rows skip the header row unless
/// the header was marked externally supplied.
pub fn to_markdown(table: &Table, provider: &dyn TextProvider) -> String {
    let col_count = table.col_count();
    if table.row_count() == 0 || col_count == 0 {
        return String::new();
    }
    let grid = extract_grid(table, provider);

    let mut out = String::new();
    out.push('|');
    for i in 0..col_count {
        let name = match table.header.names.get(i) {
            Some(name) if !name.is_empty() => markdown_cell(name),
            _ => format!("Col{}", i + 1),
        };
        out.push_str(&name);
        out.push('|');
    }
    out.push('\n');

    out.push('|');
    for _ in 0..col_count {
        out.push_str("---|");
    }
    out.push('\n');

    let start_row = if table.header.external { 0 } else { 1 };
    for row in grid.iter().skip(start_row) {
        out.push('|');
        for cell in row {
            out.push_str(&markdown_cell(cell));
            out.push('|');
        }
        out.push('\n');
    }
    out
}
