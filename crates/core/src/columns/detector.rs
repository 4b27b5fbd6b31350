//! Column-band detection by vertical projection.
//!
//! Text blocks are projected onto the x-axis as an occupancy histogram;
//! wide zero-occupancy runs separate column bands. Every block is then
//! assigned to the band it overlaps best.

use tracing::debug;

use crate::columns::median_of;
use crate::columns::blocks::{BlockKind, PageBlock};
use crate::geometry::overlap_ratio;

/// Upper bound on histogram resolution.
const MAX_HISTOGRAM_BINS: usize = 1000;
/// A zero-occupancy run must exceed this many bins to split columns; a
/// content segment must exceed it to become a column.
const GAP_BIN_THRESHOLD: usize = 5;
/// Blocks wider than this share of the page are treated as spanning and
/// left out of the histogram.
const SPANNING_WIDTH_RATIO: f64 = 0.6;
/// Blocks narrower than this (bullets, icons) are left out of the
/// histogram.
const MIN_HISTOGRAM_BLOCK_WIDTH: f64 = 10.0;

/// One column band with membership statistics.
///
/// The medians are recomputed whenever membership changes; keep them in
/// sync through [`Column::recompute_stats`].
#[derive(Clone, Debug)]
pub struct Column {
    pub x0: f64,
    pub x1: f64,
    /// Indices into the page's block list.
    pub blocks: Vec<usize>,
    pub median_gap: f64,
    pub median_width: f64,
    pub median_height: f64,
}

/// Fallback inter-block gap when a column has too few gaps to measure.
pub(crate) const DEFAULT_MEDIAN_GAP: f64 = 10.0;
/// Consecutive blocks must overlap horizontally at least this much for
/// their gap to count toward the median.
const GAP_OVERLAP_RATIO: f64 = 0.4;

impl Column {
    fn new(x0: f64, x1: f64) -> Self {
        Self {
            x0,
            x1,
            blocks: Vec::new(),
            median_gap: DEFAULT_MEDIAN_GAP,
            median_width: 0.0,
            median_height: 0.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Recompute the membership medians (width, height, vertical gap).
    pub fn recompute_stats(&mut self, blocks: &[PageBlock]) {
        let widths: Vec<f64> = self
            .blocks
            .iter()
            .map(|&i| blocks[i].bbox.width())
            .collect();
        let heights: Vec<f64> = self
            .blocks
            .iter()
            .map(|&i| blocks[i].bbox.height())
            .collect();
        self.median_width = median_of(widths).unwrap_or(0.0);
        self.median_height = median_of(heights).unwrap_or(0.0);

        // Median vertical gap over horizontally-overlapping consecutive
        // text blocks, top to bottom.
        let mut members: Vec<&PageBlock> = self
            .blocks
            .iter()
            .map(|&i| &blocks[i])
            .filter(|b| b.kind == BlockKind::Text)
            .collect();
        members.sort_by(|a, b| {
            a.bbox
                .top
                .partial_cmp(&b.bbox.top)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut gaps = Vec::new();
        for pair in members.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if b.bbox.top > a.bbox.bottom {
                let ratio =
                    overlap_ratio(a.bbox.x0, a.bbox.x1, b.bbox.x0, b.bbox.x1);
                if ratio > GAP_OVERLAP_RATIO {
                    gaps.push(b.bbox.top - a.bbox.bottom);
                }
            }
        }
        self.median_gap = if gaps.len() < 2 {
            DEFAULT_MEDIAN_GAP
        } else {
            median_of(gaps).unwrap_or(DEFAULT_MEDIAN_GAP)
        };
    }
}

/// Detect column bands and assign every block to one.
///
/// Returns the bands in left-to-right order; each block's `column_id` is
/// set to its band index. Zero blocks yield zero columns; a page with no
/// qualifying gap yields exactly one column spanning the full page width.
pub fn detect_columns(blocks: &mut [PageBlock], page_width: f64) -> Vec<Column> {
    if blocks.is_empty() || page_width <= 0.0 {
        return Vec::new();
    }

    let bin_count = ((page_width / 2.0) as usize).clamp(1, MAX_HISTOGRAM_BINS);
    let bin_width = page_width / bin_count as f64;
    let mut occupancy = vec![false; bin_count];

    for block in blocks.iter() {
        let width = block.bbox.width();
        if width > SPANNING_WIDTH_RATIO * page_width || width < MIN_HISTOGRAM_BLOCK_WIDTH {
            continue;
        }
        let first = ((block.bbox.x0 / bin_width) as usize).min(bin_count - 1);
        let last = ((block.bbox.x1 / bin_width) as usize).min(bin_count - 1);
        for bin in occupancy.iter_mut().take(last + 1).skip(first) {
            *bin = true;
        }
    }

    let mut columns = build_bands(&occupancy, bin_width, page_width);
    debug!(columns = columns.len(), "detected column bands");

    // Assign each block to the band with the best horizontal overlap;
    // ties break to the lowest band index.
    for (idx, block) in blocks.iter_mut().enumerate() {
        let mut best = 0usize;
        let mut best_overlap = f64::NEG_INFINITY;
        for (c, col) in columns.iter().enumerate() {
            let ratio = overlap_ratio(block.bbox.x0, block.bbox.x1, col.x0, col.x1);
            if ratio > best_overlap {
                best_overlap = ratio;
                best = c;
            }
        }
        block.column_id = Some(best);
        columns[best].blocks.push(idx);
    }

    for col in &mut columns {
        col.recompute_stats(blocks);
    }
    columns
}

/// Turn the occupancy histogram into column bands.
fn build_bands(occupancy: &[bool], bin_width: f64, page_width: f64) -> Vec<Column> {
    let bin_count = occupancy.len();

    // Segments of occupied bins separated by zero runs wider than the gap
    // threshold; shorter runs stay inside a segment.
    let mut segments: Vec<(usize, usize)> = Vec::new();
    let mut seg_start: Option<usize> = None;
    let mut seg_end = 0usize;
    let mut i = 0usize;
    while i < bin_count {
        if occupancy[i] {
            if seg_start.is_none() {
                seg_start = Some(i);
            }
            seg_end = i;
            i += 1;
        } else {
            let run_start = i;
            while i < bin_count && !occupancy[i] {
                i += 1;
            }
            let run_len = i - run_start;
            if run_len > GAP_BIN_THRESHOLD {
                if let Some(start) = seg_start.take() {
                    segments.push((start, seg_end));
                }
            }
        }
    }
    if let Some(start) = seg_start {
        segments.push((start, seg_end));
    }

    let wide: Vec<&(usize, usize)> = segments
        .iter()
        .filter(|(start, end)| end - start + 1 > GAP_BIN_THRESHOLD)
        .collect();

    // A single segment means there was no real column split; the page is
    // one full-width column. The same holds when nothing qualified.
    if wide.len() <= 1 {
        return vec![Column::new(0.0, page_width)];
    }

    wide.into_iter()
        .map(|&(start, end)| {
            Column::new(start as f64 * bin_width, (end + 1) as f64 * bin_width)
        })
        .collect()
}
