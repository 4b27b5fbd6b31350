//! Table-region clustering.
//!
//! Table-candidate blocks within a column are flood-filled into regions by
//! row/column alignment and proximity. Clusters that never grow past a
//! single block are returned to prose.

use tracing::debug;

use crate::columns::blocks::{BlockKind, PageBlock};
use crate::columns::detector::Column;
use crate::geometry::{BBox, overlap_ratio};

/// Minimum table-candidate count for a column to attempt clustering.
const MIN_CANDIDATES: usize = 4;
/// Row/column overlap required for two blocks to align.
const ALIGN_OVERLAP_RATIO: f64 = 0.7;
/// Maximum width ratio between aligned blocks.
const SIZE_COMPAT_RATIO: f64 = 2.5;

/// A clustered table region within one column.
#[derive(Clone, Debug)]
pub struct TableRegion {
    pub bbox: BBox,
    /// Indices into the page's block list.
    pub blocks: Vec<usize>,
}

fn aligned(a: &PageBlock, b: &PageBlock, col: &Column) -> bool {
    let y_overlap = overlap_ratio(a.bbox.top, a.bbox.bottom, b.bbox.top, b.bbox.bottom);
    let x_overlap = overlap_ratio(a.bbox.x0, a.bbox.x1, b.bbox.x0, b.bbox.x1);
    let x_gap = (a.bbox.x0.max(b.bbox.x0) - a.bbox.x1.min(b.bbox.x1)).max(0.0);
    let y_gap = (a.bbox.top.max(b.bbox.top) - a.bbox.bottom.min(b.bbox.bottom)).max(0.0);

    let row_aligned = y_overlap >= ALIGN_OVERLAP_RATIO && x_gap < col.median_width;
    let col_aligned = x_overlap >= ALIGN_OVERLAP_RATIO && y_gap < col.median_height;
    if !row_aligned && !col_aligned {
        return false;
    }

    let (wa, wb) = (a.bbox.width(), b.bbox.width());
    let (lo, hi) = (wa.min(wb), wa.max(wb));
    lo > 0.0 && hi / lo <= SIZE_COMPAT_RATIO
}

/// Cluster the table candidates of every column into regions.
///
/// Candidates that end up outside any multi-block region are reclassified
/// back to text.
pub fn cluster_table_regions(blocks: &mut [PageBlock], columns: &[Column]) -> Vec<TableRegion> {
    let mut regions = Vec::new();

    for col in columns {
        let candidates: Vec<usize> = col
            .blocks
            .iter()
            .copied()
            .filter(|&i| blocks[i].kind == BlockKind::TableCell)
            .collect();
        if candidates.len() < MIN_CANDIDATES {
            for &i in &candidates {
                blocks[i].kind = BlockKind::Text;
            }
            continue;
        }

        let mut assigned = vec![false; candidates.len()];
        for seed in 0..candidates.len() {
            if assigned[seed] {
                continue;
            }
            assigned[seed] = true;
            let mut members = vec![candidates[seed]];

            // Worklist flood-fill: absorb any unassigned candidate aligned
            // with any current member.
            let mut grew = true;
            while grew {
                grew = false;
                for (c, &candidate) in candidates.iter().enumerate() {
                    if assigned[c] {
                        continue;
                    }
                    let fits = members
                        .iter()
                        .any(|&m| aligned(&blocks[m], &blocks[candidate], col));
                    if fits {
                        assigned[c] = true;
                        members.push(candidate);
                        grew = true;
                    }
                }
            }

            if members.len() >= 2 {
                let boxes: Vec<BBox> = members.iter().map(|&i| blocks[i].bbox).collect();
                regions.push(TableRegion {
                    bbox: BBox::union_all(&boxes),
                    blocks: members,
                });
            } else {
                blocks[members[0]].kind = BlockKind::Text;
            }
        }
    }
    debug!(regions = regions.len(), "clustered table regions");
    regions
}
