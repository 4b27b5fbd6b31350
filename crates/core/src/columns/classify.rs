//! Text-vs-table block classification.
//!
//! Blocks that look like grid cells (narrow, aligned with siblings, or one
//! of several similar-width blocks) are marked as table candidates. The
//! pass is monotone: a block marked as a candidate is never reclassified
//! back to text.

use crate::columns::blocks::{BlockKind, PageBlock};
use crate::columns::detector::Column;

/// Shared left/right edges within this distance count as aligned.
const EDGE_ALIGN_TOLERANCE: f64 = 5.0;

/// Fraction of the column's other blocks sharing a left or right edge
/// with `block`.
fn alignment_score(block: &PageBlock, others: &[&PageBlock]) -> f64 {
    if others.is_empty() {
        return 0.0;
    }
    let aligned = others
        .iter()
        .filter(|o| {
            (o.bbox.x0 - block.bbox.x0).abs() < EDGE_ALIGN_TOLERANCE
                || (o.bbox.x1 - block.bbox.x1).abs() < EDGE_ALIGN_TOLERANCE
        })
        .count();
    aligned as f64 / others.len() as f64
}

/// Classify every column member as text or table-candidate.
pub fn classify_blocks(blocks: &mut [PageBlock], columns: &[Column]) {
    for col in columns {
        let median_width = col.median_width;
        let col_width = col.width();

        let marked: Vec<usize> = col
            .blocks
            .iter()
            .copied()
            .filter(|&i| {
                let block = &blocks[i];
                if block.kind != BlockKind::Text {
                    return false;
                }
                let others: Vec<&PageBlock> = col
                    .blocks
                    .iter()
                    .filter(|&&j| j != i)
                    .map(|&j| &blocks[j])
                    .collect();

                let width = block.bbox.width();
                let width_ratio = if median_width > 0.0 {
                    width / median_width
                } else {
                    1.0
                };
                let column_span = if col_width > 0.0 { width / col_width } else { 1.0 };
                let alignment = alignment_score(block, &others);

                // (a) narrow against the column's typical block, aligned
                if width_ratio < 0.7 && alignment > 0.3 {
                    return true;
                }
                // (b) short of the column width, loosely aligned
                if column_span < 0.6 && alignment > 0.2 {
                    return true;
                }
                // (c) several siblings of similar width
                let similar = others
                    .iter()
                    .filter(|o| width > 0.0 && (width - o.bbox.width()).abs() / width < 0.2)
                    .count();
                similar >= 2
            })
            .collect();

        for i in marked {
            blocks[i].kind = BlockKind::TableCell;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::detector::detect_columns;
    use crate::geometry::BBox;

    fn block(x0: f64, top: f64, x1: f64, bottom: f64) -> PageBlock {
        PageBlock::new(BBox::new(x0, top, x1, bottom), "", 10.0)
    }

    /// A prose column with a narrow, left-aligned run of cell-like blocks.
    fn mixed_column() -> Vec<PageBlock> {
        let mut blocks = vec![
            block(10.0, 0.0, 290.0, 20.0),
            block(10.0, 25.0, 290.0, 45.0),
            block(10.0, 50.0, 285.0, 70.0),
        ];
        for r in 0..3 {
            let top = 100.0 + r as f64 * 20.0;
            blocks.push(block(10.0, top, 80.0, top + 12.0));
        }
        blocks
    }

    #[test]
    fn narrow_aligned_blocks_become_candidates() {
        let mut blocks = mixed_column();
        let columns = detect_columns(&mut blocks, 300.0);
        classify_blocks(&mut blocks, &columns);
        for b in &blocks[3..] {
            assert_eq!(b.kind, BlockKind::TableCell);
        }
    }

    #[test]
    fn classification_is_monotone() {
        let mut blocks = mixed_column();
        let columns = detect_columns(&mut blocks, 300.0);
        classify_blocks(&mut blocks, &columns);
        let after_first: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
        classify_blocks(&mut blocks, &columns);
        let after_second: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
        // No candidate reverted; a second pass may only add.
        for (first, second) in after_first.iter().zip(&after_second) {
            if *first == BlockKind::TableCell {
                assert_eq!(*second, BlockKind::TableCell);
            }
        }
    }

    #[test]
    fn similar_width_rule_marks_triples() {
        // Three equal-width blocks, none narrow relative to the column.
        let mut blocks = vec![
            block(10.0, 0.0, 150.0, 20.0),
            block(10.0, 30.0, 150.0, 50.0),
            block(10.0, 60.0, 150.0, 80.0),
        ];
        let columns = detect_columns(&mut blocks, 600.0);
        classify_blocks(&mut blocks, &columns);
        assert!(blocks.iter().all(|b| b.kind == BlockKind::TableCell));
    }
}
