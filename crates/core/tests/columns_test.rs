//! End-to-end layout analysis tests over synthetic page blocks.

use pagegrid_core::columns::{BlockKind, LayoutSettings, PageBlock, analyze_page};
use pagegrid_core::geometry::BBox;

fn block(x0: f64, top: f64, x1: f64, bottom: f64, text: &str) -> PageBlock {
    PageBlock::new(BBox::new(x0, top, x1, bottom), text, 10.0)
}

/// A two-column page: ragged prose in both columns plus a 2x2 key-value
/// grid at the bottom of the right column.
fn two_column_page() -> Vec<PageBlock> {
    let mut blocks = Vec::new();
    for (r, width) in [270.0, 215.0, 175.0].iter().enumerate() {
        let top = 100.0 + r as f64 * 14.0;
        blocks.push(block(10.0, top, 10.0 + width, top + 12.0, "left prose"));
        blocks.push(block(320.0, top, 320.0 + width, top + 12.0, "right prose"));
    }
    for (r, top) in [200.0, 216.0].iter().enumerate() {
        blocks.push(block(320.0, *top, 380.0, top + 12.0, &format!("key{r}")));
        blocks.push(block(400.0, *top, 460.0, top + 12.0, &format!("val{r}")));
    }
    blocks
}

#[test]
fn two_columns_and_one_region_detected() {
    let layout = analyze_page(
        two_column_page(),
        600.0,
        800.0,
        &LayoutSettings::default(),
    );

    assert_eq!(layout.columns.len(), 2);
    assert_eq!(layout.regions.len(), 1);
    assert_eq!(layout.regions[0].blocks.len(), 4);
    assert_eq!(layout.regions[0].bbox, BBox::new(320.0, 200.0, 460.0, 228.0));

    // Each column's prose merged into a single paragraph block.
    let prose: Vec<&PageBlock> = layout
        .blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Text)
        .collect();
    assert_eq!(prose.len(), 2);
    assert_eq!(prose[0].text, "left prose left prose left prose");
}

#[test]
fn every_block_maps_to_one_column() {
    let layout = analyze_page(
        two_column_page(),
        600.0,
        800.0,
        &LayoutSettings::default(),
    );
    let column_count = layout.columns.len();
    for b in &layout.blocks {
        let id = b.column_id.expect("assigned");
        assert!(id < column_count);
    }
    // Membership lists cover every block exactly once.
    let total: usize = layout.columns.iter().map(|c| c.blocks.len()).sum();
    assert_eq!(total, layout.blocks.len());
}

#[test]
fn layout_boxes_cover_prose_and_regions() {
    let layout = analyze_page(
        two_column_page(),
        600.0,
        800.0,
        &LayoutSettings::default(),
    );
    let boxes = layout.layout_boxes();
    // Two merged prose blocks plus one table region.
    assert_eq!(boxes.len(), 3);
    assert!(boxes.contains(&layout.regions[0].bbox));
}

#[test]
fn full_width_prose_is_one_column() {
    let mut blocks = Vec::new();
    for r in 0..4 {
        let top = 100.0 + r as f64 * 30.0;
        blocks.push(block(10.0, top, 280.0, top + 12.0, "prose"));
    }
    let layout = analyze_page(blocks, 300.0, 800.0, &LayoutSettings::default());
    assert_eq!(layout.columns.len(), 1);
    assert_eq!(layout.columns[0].x0, 0.0);
    assert_eq!(layout.columns[0].x1, 300.0);
}

#[test]
fn empty_page_has_no_columns() {
    let layout = analyze_page(Vec::new(), 600.0, 800.0, &LayoutSettings::default());
    assert!(layout.columns.is_empty());
}
