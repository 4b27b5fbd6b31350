//! Adaptive multi-line text merging.
//!
//! Consecutive text blocks in a column merge when their vertical gap is
//! ordinary for the column, they overlap horizontally and their font sizes
//! are compatible. Each merge removes a block, so the pass terminates.

use tracing::debug;

use crate::columns::blocks::{BlockKind, PageBlock, reading_order};
use crate::columns::detector::Column;

/// Multiple of the column's median gap a merge may bridge.
const GAP_FACTOR: f64 = 1.8;
/// Minimum horizontal overlap ratio between merged blocks.
const MERGE_OVERLAP_RATIO: f64 = 0.45;
/// Maximum font-size difference, as a share of the first block's size.
const FONT_SIZE_RATIO: f64 = 0.3;

/// Merge adjacent text blocks per column.
///
/// Merged-away blocks are removed from `blocks`; column membership and
/// statistics are rebuilt afterwards, so previously recorded block
/// indices are invalidated by this call.
pub fn merge_text_blocks(blocks: &mut Vec<PageBlock>, columns: &mut [Column]) {
    let mut dead = vec![false; blocks.len()];

    for col in columns.iter_mut() {
        col.recompute_stats(blocks);
        let max_gap = col.median_gap * GAP_FACTOR;

        loop {
            let mut members: Vec<usize> = col
                .blocks
                .iter()
                .copied()
                .filter(|&i| !dead[i] && blocks[i].kind == BlockKind::Text)
                .collect();
            members.sort_by(|&a, &b| reading_order(&blocks[a], &blocks[b]));

            let mut merged_any = false;
            for w in 0..members.len().saturating_sub(1) {
                let (i, j) = (members[w], members[w + 1]);
                if try_merge(blocks, i, j, max_gap) {
                    dead[j] = true;
                    merged_any = true;
                    break;
                }
            }
            if !merged_any {
                break;
            }
        }
    }

    // Drop the merged-away blocks and rebuild membership.
    let mut kept = 0usize;
    let mut remap: Vec<Option<usize>> = Vec::with_capacity(blocks.len());
    for flag in &dead {
        if *flag {
            remap.push(None);
        } else {
            remap.push(Some(kept));
            kept += 1;
        }
    }
    let mut idx = 0usize;
    blocks.retain(|_| {
        let keep = !dead[idx];
        idx += 1;
        keep
    });
    for col in columns.iter_mut() {
        let members = std::mem::take(&mut col.blocks);
        col.blocks = members.into_iter().filter_map(|i| remap[i]).collect();
        col.recompute_stats(blocks);
    }
    debug!(blocks = blocks.len(), "merged text blocks");
}

fn try_merge(blocks: &mut [PageBlock], i: usize, j: usize, max_gap: f64) -> bool {
    let (a, b) = (&blocks[i], &blocks[j]);

    let gap = b.bbox.top - a.bbox.bottom;
    if gap < 0.0 || gap > max_gap {
        return false;
    }
    let overlap =
        crate::geometry::overlap_ratio(a.bbox.x0, a.bbox.x1, b.bbox.x0, b.bbox.x1);
    if overlap < MERGE_OVERLAP_RATIO {
        return false;
    }
    if (a.font_size - b.font_size).abs() > a.font_size * FONT_SIZE_RATIO {
        return false;
    }

    let bbox = a.bbox.union(&b.bbox);
    let text = if a.text.is_empty() {
        b.text.clone()
    } else if b.text.is_empty() {
        a.text.clone()
    } else {
        format!("{} {}", a.text, b.text)
    };
    blocks[i].bbox = bbox;
    blocks[i].text = text;
    true
}
