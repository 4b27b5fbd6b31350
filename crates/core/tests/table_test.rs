//! End-to-end table extraction tests over synthetic page content.

use pagegrid_core::geometry::BBox;
use pagegrid_core::page::{PageSource, TextProvider};
use pagegrid_core::table::{
    Char, Strategy, TableFinder, TableSettings, extract_grid, find_tables_in_pages, to_markdown,
};
use pagegrid_core::{LayoutError, Result};

fn make_char(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Char {
    Char {
        text: text.to_string(),
        bbox: BBox::new(x0, top, x1, bottom),
        doctop: top,
        fontname: "Helvetica".to_string(),
        size: bottom - top,
        upright: true,
        page: 0,
    }
}

/// Words laid out as a 4-row, 3-column grid: 25-unit words with 5-unit
/// gutters, so each char run closes as its own word.
fn word_grid_chars() -> Vec<Char> {
    let mut chars = Vec::new();
    for row in 0..4 {
        let top = row as f64 * 20.0;
        for col in 0..3 {
            let x0 = col as f64 * 30.0;
            chars.push(make_char("m", x0, top, x0 + 25.0, top + 10.0));
        }
    }
    chars
}

#[test]
fn text_strategy_builds_lattice_from_word_alignment() {
    let settings = TableSettings {
        vertical_strategy: Strategy::Text,
        horizontal_strategy: Strategy::Text,
        ..TableSettings::default()
    };
    let finder = TableFinder::new(
        BBox::new(0.0, 0.0, 90.0, 70.0),
        word_grid_chars(),
        &[],
        &settings,
    );
    let tables = finder.find_tables().unwrap();
    assert_eq!(tables.len(), 1);

    // Every word column contributes a left, right and center line (nine
    // vertical lines) and every word row a top and bottom line (eight
    // horizontal lines), so the lattice closes a 7x8 grid of cells.
    let table = &tables[0];
    assert_eq!(table.row_count(), 7);
    assert_eq!(table.col_count(), 8);
    assert_eq!(table.bbox, BBox::new(0.0, 0.0, 85.0, 70.0));
}

#[test]
fn lines_strategy_extracts_cell_text() {
    // A 2x2 grid of path rectangles with one word per cell.
    let mut paths = Vec::new();
    for row in 0..2 {
        for col in 0..2 {
            paths.push(BBox::new(
                col as f64 * 50.0,
                row as f64 * 20.0,
                (col + 1) as f64 * 50.0,
                (row + 1) as f64 * 20.0,
            ));
        }
    }
    let labels = [["a", "b"], ["c", "d"]];
    let mut chars = Vec::new();
    for (row, row_labels) in labels.iter().enumerate() {
        for (col, label) in row_labels.iter().enumerate() {
            let x0 = col as f64 * 50.0 + 5.0;
            let top = row as f64 * 20.0 + 5.0;
            chars.push(make_char(label, x0, top, x0 + 5.0, top + 10.0));
        }
    }

    let finder = TableFinder::new(
        BBox::new(0.0, 0.0, 100.0, 40.0),
        chars,
        &paths,
        &TableSettings::default(),
    );
    let tables = finder.find_tables().unwrap();
    assert_eq!(tables.len(), 1);

    let provider = finder.text_provider();
    let grid = extract_grid(&tables[0], &provider);
    assert_eq!(grid, vec![vec!["a", "b"], vec!["c", "d"]]);
    assert_eq!(tables[0].header.names, vec!["a", "b"]);

    let md = to_markdown(&tables[0], &provider);
    assert_eq!(md, "|a|b|\n|---|---|\n|c|d|\n");
}

struct DumpSource {
    pages: Vec<Option<Vec<Char>>>,
}

impl PageSource for DumpSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_bbox(&self, page: usize) -> Result<BBox> {
        if page >= self.pages.len() {
            return Err(LayoutError::InvalidPage(page));
        }
        Ok(BBox::new(0.0, 0.0, 612.0, 792.0))
    }

    fn page_chars(&self, page: usize) -> Result<Vec<Char>> {
        match self.pages.get(page) {
            Some(Some(chars)) => Ok(chars.clone()),
            Some(None) => Err(LayoutError::Extraction("damaged page".to_string())),
            None => Err(LayoutError::InvalidPage(page)),
        }
    }
}

#[test]
fn batch_processing_isolates_failing_pages() {
    let source = DumpSource {
        pages: vec![
            Some(word_grid_chars()),
            None,
            Some(word_grid_chars()),
        ],
    };
    let settings = TableSettings {
        vertical_strategy: Strategy::Text,
        horizontal_strategy: Strategy::Text,
        ..TableSettings::default()
    };
    let results = find_tables_in_pages(&source, &settings).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].tables.len(), 1);
    // The damaged page degrades to an empty result, not an error.
    assert!(results[1].tables.is_empty());
    assert_eq!(results[2].tables.len(), 1);
}

#[test]
fn header_text_becomes_column_names() {
    let mut paths = Vec::new();
    for row in 0..2 {
        for col in 0..2 {
            paths.push(BBox::new(
                col as f64 * 50.0,
                row as f64 * 20.0,
                (col + 1) as f64 * 50.0,
                (row + 1) as f64 * 20.0,
            ));
        }
    }
    // Header words only in the first row's cells.
    let chars = vec![
        make_char("x", 5.0, 5.0, 10.0, 15.0),
        make_char("y", 55.0, 5.0, 60.0, 15.0),
    ];
    let finder = TableFinder::new(
        BBox::new(0.0, 0.0, 100.0, 40.0),
        chars,
        &paths,
        &TableSettings::default(),
    );
    let tables = finder.find_tables().unwrap();
    assert_eq!(tables[0].header.names, vec!["x", "y"]);

    // Empty body cells export as empty strings under those names.
    let provider = finder.text_provider();
    let md = to_markdown(&tables[0], &provider);
    assert_eq!(md, "|x|y|\n|---|---|\n|||\n");
}

#[test]
fn text_provider_respects_area_rule() {
    let chars = vec![
        // Fully inside the left cell.
        make_char("a", 5.0, 5.0, 10.0, 15.0),
        // Straddling the cell border, majority in the right cell.
        make_char("b", 48.0, 5.0, 58.0, 15.0),
    ];
    let finder = TableFinder::new(
        BBox::new(0.0, 0.0, 100.0, 40.0),
        chars,
        &[],
        &TableSettings::default(),
    );
    let provider = finder.text_provider();
    assert_eq!(provider.text_under_rect(&BBox::new(0.0, 0.0, 50.0, 20.0)), "a");
    assert_eq!(
        provider.text_under_rect(&BBox::new(50.0, 0.0, 100.0, 20.0)),
        "b"
    );
}
