//! Column and table-region detection (pipeline B).
//!
//! Works directly on extractor-provided text blocks: project them onto the
//! x-axis to find column bands, classify members as prose or table
//! candidates, merge multi-line prose adaptively, and cluster candidates
//! into table regions.

mod blocks;
mod classify;
mod detector;
mod merge;
mod regions;

pub use blocks::{BlockKind, PageBlock};
pub use classify::classify_blocks;
pub use detector::{Column, detect_columns};
pub use merge::merge_text_blocks;
pub use regions::{TableRegion, cluster_table_regions};

use crate::geometry::BBox;

/// Upper median of a value list (no interpolation between middle values).
pub(crate) fn median_of(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some(values[values.len() / 2])
}

/// Page-segmentation configuration.
#[derive(Clone, Debug)]
pub struct LayoutSettings {
    /// Band at the top of the page excluded from layout analysis.
    pub header_margin: f64,
    /// Band at the bottom of the page excluded from layout analysis.
    pub footer_margin: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            header_margin: 50.0,
            footer_margin: 50.0,
        }
    }
}

/// The result of one page's layout analysis.
#[derive(Clone, Debug)]
pub struct PageLayout {
    /// Surviving blocks after margin filtering and adaptive merging.
    pub blocks: Vec<PageBlock>,
    /// Column bands, left to right. Bands partition the page width.
    pub columns: Vec<Column>,
    /// Clustered table regions.
    pub regions: Vec<TableRegion>,
}

impl PageLayout {
    /// Bounding rectangles of the page's layout units: merged prose blocks
    /// followed by table regions, in column order.
    pub fn layout_boxes(&self) -> Vec<BBox> {
        let mut boxes = Vec::new();
        for col in &self.columns {
            for &i in &col.blocks {
                if self.blocks[i].kind == BlockKind::Text {
                    boxes.push(self.blocks[i].bbox);
                }
            }
        }
        boxes.extend(self.regions.iter().map(|r| r.bbox));
        boxes
    }

    /// Column band rectangles spanning the analyzed content height.
    pub fn column_boxes(&self) -> Vec<BBox> {
        self.columns
            .iter()
            .map(|col| {
                let member_boxes: Vec<BBox> = col
                    .blocks
                    .iter()
                    .map(|&i| self.blocks[i].bbox)
                    .collect();
                if member_boxes.is_empty() {
                    BBox::new(col.x0, 0.0, col.x1, 0.0)
                } else {
                    let span = BBox::union_all(&member_boxes);
                    BBox::new(col.x0, span.top, col.x1, span.bottom)
                }
            })
            .collect()
    }
}

/// Run the full layout pipeline over one page's text blocks.
///
/// Blocks overlapping the header/footer margins are clipped to the content
/// area; blocks entirely outside it are dropped.
pub fn analyze_page(
    blocks: Vec<PageBlock>,
    page_width: f64,
    page_height: f64,
    settings: &LayoutSettings,
) -> PageLayout {
    let content_top = settings.header_margin;
    let content_bottom = page_height - settings.footer_margin;

    let mut kept: Vec<PageBlock> = blocks
        .into_iter()
        .filter_map(|mut b| {
            if b.bbox.bottom <= content_top || b.bbox.top >= content_bottom {
                return None;
            }
            b.bbox.top = b.bbox.top.max(content_top);
            b.bbox.bottom = b.bbox.bottom.min(content_bottom);
            Some(b)
        })
        .collect();
    kept.sort_by(blocks::reading_order);

    let mut columns = detect_columns(&mut kept, page_width);
    classify_blocks(&mut kept, &columns);
    merge_text_blocks(&mut kept, &mut columns);
    let regions = cluster_table_regions(&mut kept, &columns);

    PageLayout {
        blocks: kept,
        columns,
        regions,
    }
}
