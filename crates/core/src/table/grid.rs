//! Cell construction and table assembly.
//!
//! Cells are derived from the intersection lattice, grouped into tables by
//! corner adjacency, then split into rows by y-clustering. The cell search
//! is O(n³) over the intersection count in the worst case; per-page
//! lattices are small enough that the simple shape is kept on purpose.

use std::collections::VecDeque;

use crate::geometry::{BBox, POINT_EPS, Point, approx_eq};
use crate::page::TextProvider;
use crate::table::clustering::cluster_objects;
use crate::table::intersections::Intersection;

/// Row-grouping tolerance for cell top coordinates.
const ROW_CLUSTER_TOLERANCE: f64 = 1.0;

fn points_coincide(a: Point, b: Point) -> bool {
    approx_eq(a.0, b.0, POINT_EPS) && approx_eq(a.1, b.1, POINT_EPS)
}

/// Two lattice points are connected when a single edge covers both.
fn edge_connects(a: &Intersection, b: &Intersection) -> bool {
    if approx_eq(a.point.0, b.point.0, POINT_EPS)
        && a.v_edges.iter().any(|id| b.v_edges.contains(id))
    {
        return true;
    }
    if approx_eq(a.point.1, b.point.1, POINT_EPS)
        && a.h_edges.iter().any(|id| b.h_edges.contains(id))
    {
        return true;
    }
    false
}

/// Derive cells from the intersection lattice.
///
/// Points are scanned in (y, x) order. For each top-left candidate the
/// nearest connected point below and to the right whose implied
/// bottom-right corner exists (and is connected on both sides) closes a
/// cell; one cell at most per top-left point.
pub(crate) fn intersections_to_cells(points: &[Intersection]) -> Vec<BBox> {
    let mut sorted: Vec<&Intersection> = points.iter().collect();
    sorted.sort_by(|a, b| {
        (a.point.1, a.point.0)
            .partial_cmp(&(b.point.1, b.point.0))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let find_point = |x: f64, y: f64| -> Option<usize> {
        sorted.iter().position(|p| points_coincide(p.point, (x, y)))
    };

    let mut cells = Vec::new();
    for (i, tl) in sorted.iter().enumerate() {
        let below: Vec<usize> = (i + 1..sorted.len())
            .filter(|&j| {
                approx_eq(sorted[j].point.0, tl.point.0, POINT_EPS)
                    && sorted[j].point.1 > tl.point.1 + POINT_EPS
            })
            .collect();
        let right: Vec<usize> = (i + 1..sorted.len())
            .filter(|&j| {
                approx_eq(sorted[j].point.1, tl.point.1, POINT_EPS)
                    && sorted[j].point.0 > tl.point.0 + POINT_EPS
            })
            .collect();

        'below: for &b in &below {
            if !edge_connects(tl, sorted[b]) {
                continue;
            }
            for &r in &right {
                if !edge_connects(tl, sorted[r]) {
                    continue;
                }
                let corner = (sorted[r].point.0, sorted[b].point.1);
                if let Some(br) = find_point(corner.0, corner.1) {
                    if edge_connects(sorted[br], sorted[r]) && edge_connects(sorted[br], sorted[b])
                    {
                        cells.push(BBox::new(tl.point.0, tl.point.1, corner.0, corner.1));
                        break 'below;
                    }
                }
            }
        }
    }
    cells
}

fn corners(b: &BBox) -> [Point; 4] {
    [
        (b.x0, b.top),
        (b.x1, b.top),
        (b.x0, b.bottom),
        (b.x1, b.bottom),
    ]
}

fn shares_corner(a: &BBox, b: &BBox) -> bool {
    corners(a)
        .iter()
        .any(|ca| corners(b).iter().any(|cb| points_coincide(*ca, *cb)))
}

/// Partition cells into connected components by corner adjacency.
///
/// Worklist flood-fill: a seed cell absorbs every unused cell sharing a
/// corner with any member, transitively. Single-cell components are not
/// tables and are discarded. Components are ordered by their topmost,
/// then leftmost cell.
pub(crate) fn cells_to_tables(cells: Vec<BBox>) -> Vec<Vec<BBox>> {
    if cells.is_empty() {
        return Vec::new();
    }

    let mut visited = vec![false; cells.len()];
    let mut tables: Vec<Vec<BBox>> = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    for start in 0..cells.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.clear();
        queue.push_back(start);
        let mut group: Vec<BBox> = Vec::new();
        while let Some(idx) = queue.pop_front() {
            group.push(cells[idx]);
            for (j, other) in cells.iter().enumerate() {
                if !visited[j] && shares_corner(&cells[idx], other) {
                    visited[j] = true;
                    queue.push_back(j);
                }
            }
        }
        tables.push(group);
    }

    tables.sort_by(|a, b| {
        let min_a = a
            .iter()
            .map(|c| (c.top, c.x0))
            .min_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap();
        let min_b = b
            .iter()
            .map(|c| (c.top, c.x0))
            .min_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap();
        min_a
            .partial_cmp(&min_b)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    tables.into_iter().filter(|t| t.len() > 1).collect()
}

/// One table row: member cells ordered left to right. Rows may hold fewer
/// cells than the table's column count; export pads the difference.
#[derive(Clone, Debug)]
pub struct Row {
    pub cells: Vec<BBox>,
}

/// The designated header row and its column names.
#[derive(Clone, Debug)]
pub struct TableHeader {
    pub bbox: BBox,
    pub cells: Vec<BBox>,
    pub names: Vec<String>,
    /// True when the header was supplied from outside the table body (for
    /// example a caption line above the grid). External headers leave the
    /// first data row in place on export.
    pub external: bool,
}

/// An assembled table: the connected cell component with derived rows and
/// header.
#[derive(Clone, Debug)]
pub struct Table {
    pub bbox: BBox,
    pub cells: Vec<BBox>,
    pub rows: Vec<Row>,
    pub header: TableHeader,
}

impl Table {
    /// Assemble a table from one connected cell component.
    pub(crate) fn from_cells(cells: Vec<BBox>, provider: &dyn TextProvider) -> Table {
        let bbox = BBox::union_all(&cells);
        let rows = build_rows(&cells);
        let header = build_header(&rows, provider);
        Table {
            bbox,
            cells,
            rows,
            header,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Derived column count: the widest row's length.
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }
}

fn build_rows(cells: &[BBox]) -> Vec<Row> {
    let clusters = cluster_objects(cells, |c| c.top, ROW_CLUSTER_TOLERANCE);
    clusters
        .into_iter()
        .map(|mut cluster| {
            cluster.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));
            Row { cells: cluster }
        })
        .collect()
}

/// Default header: the first row. Empty cell text falls back to
/// `Col<N>` names (1-indexed, left to right).
fn build_header(rows: &[Row], provider: &dyn TextProvider) -> TableHeader {
    let Some(first) = rows.first() else {
        return TableHeader {
            bbox: BBox::new(0.0, 0.0, 0.0, 0.0),
            cells: Vec::new(),
            names: Vec::new(),
            external: false,
        };
    };
    let names = first
        .cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let text = provider.text_under_rect(cell).trim().to_string();
            if text.is_empty() {
                format!("Col{}", i + 1)
            } else {
                text
            }
        })
        .collect();
    TableHeader {
        bbox: BBox::union_all(&first.cells),
        cells: first.cells.clone(),
        names,
        external: false,
    }
}
