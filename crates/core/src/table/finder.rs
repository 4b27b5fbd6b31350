//! Table-finder orchestration.
//!
//! Owns all per-page working state (characters, candidate edges, resolved
//! settings); nothing persists across page-processing calls, so pages can
//! be processed on independent workers.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{LayoutError, Result};
use crate::geometry::{BBox, Orientation};
use crate::page::PageSource;
use crate::table::edges::{
    filter_edges, horizontal_edge, merge_edges, rect_to_edges, vertical_edge, words_to_edges_h,
    words_to_edges_v,
};
use crate::table::export::CharTextProvider;
use crate::table::grid::{Table, cells_to_tables, intersections_to_cells};
use crate::table::intersections::edges_to_intersections;
use crate::table::types::{Char, Edge, EdgeSource, ResolvedSettings, Strategy, TableSettings, Word};
use crate::table::words::extract_words;

// Working-buffer ceilings; exceeding one aborts the current page only.
const MAX_EDGES: usize = 10_000;
const MAX_INTERSECTIONS: usize = 100_000;
const MAX_CELLS: usize = 10_000;

/// Per-page table finder.
pub struct TableFinder {
    page_bbox: BBox,
    chars: Vec<Char>,
    path_edges: Vec<Edge>,
    settings: ResolvedSettings,
}

impl TableFinder {
    /// Build a finder over one page's extracted content.
    ///
    /// `paths` holds the collaborator's vector-path rectangles; pass an
    /// empty slice when the extractor recorded none.
    pub fn new(page_bbox: BBox, chars: Vec<Char>, paths: &[BBox], settings: &TableSettings) -> Self {
        let path_edges = paths
            .iter()
            .flat_map(|r| rect_to_edges(*r, EdgeSource::Path))
            .collect();
        Self {
            page_bbox,
            chars,
            path_edges,
            settings: settings.resolve(),
        }
    }

    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    /// Text provider over this page's characters, using the finder's text
    /// tolerances.
    pub fn text_provider(&self) -> CharTextProvider<'_> {
        CharTextProvider::new(
            &self.chars,
            self.settings.text_x_tolerance,
            self.settings.text_y_tolerance,
        )
    }

    fn axis_edges(&self, strategy: Strategy, orientation: Orientation, words: &[Word]) -> Vec<Edge> {
        let threshold = match orientation {
            Orientation::Horizontal => self.settings.min_words_horizontal,
            Orientation::Vertical => self.settings.min_words_vertical,
        };
        match strategy {
            Strategy::Lines if !self.path_edges.is_empty() => self
                .path_edges
                .iter()
                .filter(|e| e.orientation == orientation)
                .cloned()
                .collect(),
            Strategy::Lines => {
                // No path geometry on this page: the lines strategy
                // degrades to the text heuristics.
                debug!("no path edges; falling back to text strategy");
                self.words_edges(orientation, words, threshold)
            }
            Strategy::Text => self.words_edges(orientation, words, threshold),
        }
    }

    fn words_edges(&self, orientation: Orientation, words: &[Word], threshold: usize) -> Vec<Edge> {
        match orientation {
            Orientation::Horizontal => words_to_edges_h(words, threshold),
            Orientation::Vertical => words_to_edges_v(words, threshold),
        }
    }

    /// Gather, clean and filter the candidate gridlines for this page.
    pub(crate) fn collect_edges(&self) -> Result<Vec<Edge>> {
        let s = &self.settings;

        let needs_words = matches!(s.vertical_strategy, Strategy::Text)
            || matches!(s.horizontal_strategy, Strategy::Text)
            || self.path_edges.is_empty();
        let words = if needs_words {
            extract_words(&self.chars, s.text_x_tolerance, s.text_y_tolerance)
        } else {
            Vec::new()
        };

        let mut edges = self.axis_edges(s.vertical_strategy, Orientation::Vertical, &words);
        for &x in &s.explicit_vertical_lines {
            edges.push(vertical_edge(
                x,
                self.page_bbox.top,
                self.page_bbox.bottom,
                EdgeSource::Explicit,
            ));
        }
        edges.extend(self.axis_edges(s.horizontal_strategy, Orientation::Horizontal, &words));
        for &y in &s.explicit_horizontal_lines {
            edges.push(horizontal_edge(
                y,
                self.page_bbox.x0,
                self.page_bbox.x1,
                EdgeSource::Explicit,
            ));
        }
        debug!(raw = edges.len(), "collected candidate edges");

        if edges.len() > MAX_EDGES {
            return Err(LayoutError::BufferLimit {
                what: "edges",
                count: edges.len(),
                limit: MAX_EDGES,
            });
        }

        let edges = merge_edges(
            edges,
            s.snap_x_tolerance,
            s.snap_y_tolerance,
            s.join_x_tolerance,
            s.join_y_tolerance,
        );
        let edges = filter_edges(edges, s.edge_min_length);
        debug!(merged = edges.len(), "edges after snap/join/filter");
        Ok(edges)
    }

    /// Run the full pipeline: edges, intersections, cells, tables.
    ///
    /// Degenerate input (no characters, no edges) yields an empty table
    /// list at the first empty stage.
    pub fn find_tables(&self) -> Result<Vec<Table>> {
        let edges = self.collect_edges()?;
        if edges.is_empty() {
            return Ok(Vec::new());
        }

        let points = edges_to_intersections(
            &edges,
            self.settings.intersection_x_tolerance,
            self.settings.intersection_y_tolerance,
        );
        if points.len() > MAX_INTERSECTIONS {
            return Err(LayoutError::BufferLimit {
                what: "intersections",
                count: points.len(),
                limit: MAX_INTERSECTIONS,
            });
        }

        let cells = intersections_to_cells(&points);
        if cells.len() > MAX_CELLS {
            return Err(LayoutError::BufferLimit {
                what: "cells",
                count: cells.len(),
                limit: MAX_CELLS,
            });
        }
        debug!(
            intersections = points.len(),
            cells = cells.len(),
            "built cell lattice"
        );

        let provider = self.text_provider();
        let tables: Vec<Table> = cells_to_tables(cells)
            .into_iter()
            .map(|group| Table::from_cells(group, &provider))
            .collect();
        debug!(tables = tables.len(), "assembled tables");
        Ok(tables)
    }
}

/// Tables found on one page.
pub struct PageTables {
    pub page: usize,
    pub tables: Vec<Table>,
}

/// Find tables on every page of a source.
///
/// Pages are independent and fan out across rayon workers. A page whose
/// extraction or processing fails degrades to an empty result for that
/// page; an invalid page index fails the whole call.
pub fn find_tables_in_pages<S: PageSource + Sync>(
    source: &S,
    settings: &TableSettings,
) -> Result<Vec<PageTables>> {
    (0..source.page_count())
        .into_par_iter()
        .map(|page| {
            let bbox = source.page_bbox(page)?;
            let chars = match source.page_chars(page) {
                Ok(chars) => chars,
                Err(LayoutError::InvalidPage(p)) => return Err(LayoutError::InvalidPage(p)),
                Err(err) => {
                    warn!(page, %err, "page extraction failed; skipping page");
                    return Ok(PageTables {
                        page,
                        tables: Vec::new(),
                    });
                }
            };
            let paths = source.vector_paths(page).unwrap_or_default();
            let finder = TableFinder::new(bbox, chars, &paths, settings);
            match finder.find_tables() {
                Ok(tables) => Ok(PageTables { page, tables }),
                Err(err @ LayoutError::BufferLimit { .. }) => {
                    warn!(page, %err, "page exceeded working buffers; skipping page");
                    Ok(PageTables {
                        page,
                        tables: Vec::new(),
                    })
                }
                Err(err) => Err(err),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::words::make_char;

    fn page_bbox() -> BBox {
        BBox::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn explicit_lines_build_exact_grid() {
        // Four explicit gridlines per axis: a 3x3 table of 10x10 cells.
        let settings = TableSettings {
            explicit_vertical_lines: vec![0.0, 10.0, 20.0, 30.0],
            explicit_horizontal_lines: vec![0.0, 10.0, 20.0, 30.0],
            ..TableSettings::default()
        };
        let finder = TableFinder::new(
            BBox::new(0.0, 0.0, 30.0, 30.0),
            Vec::new(),
            &[],
            &settings,
        );
        let tables = finder.find_tables().unwrap();
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.col_count(), 3);
        assert_eq!(table.cells.len(), 9);
        for cell in &table.cells {
            assert_eq!(cell.width(), 10.0);
            assert_eq!(cell.height(), 10.0);
        }
        assert_eq!(table.bbox, BBox::new(0.0, 0.0, 30.0, 30.0));
    }

    #[test]
    fn lines_strategy_uses_path_rectangles() {
        let mut paths = Vec::new();
        for r in 0..2 {
            for c in 0..2 {
                paths.push(BBox::new(
                    c as f64 * 20.0,
                    r as f64 * 15.0,
                    (c + 1) as f64 * 20.0,
                    (r + 1) as f64 * 15.0,
                ));
            }
        }
        let finder = TableFinder::new(page_bbox(), Vec::new(), &paths, &TableSettings::default());
        let tables = finder.find_tables().unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].row_count(), 2);
        assert_eq!(tables[0].col_count(), 2);
    }

    #[test]
    fn empty_page_yields_no_tables() {
        let finder = TableFinder::new(page_bbox(), Vec::new(), &[], &TableSettings::default());
        assert!(finder.find_tables().unwrap().is_empty());
    }

    #[test]
    fn degenerate_edges_yield_no_tables() {
        // A single character can synthesize at most one enclosing cell,
        // and single-cell components are discarded.
        let chars = vec![make_char("x", BBox::new(0.0, 0.0, 5.0, 10.0))];
        let settings = TableSettings {
            vertical_strategy: Strategy::Text,
            horizontal_strategy: Strategy::Text,
            min_words_vertical: 1,
            min_words_horizontal: 1,
            ..TableSettings::default()
        };
        let finder = TableFinder::new(page_bbox(), chars, &[], &settings);
        assert!(finder.find_tables().unwrap().is_empty());
    }
}
