//! Edge synthesis and cleanup.
//!
//! Candidate gridlines come from word alignment (`text` strategy), from
//! vector-path rectangles handed in by the collaborator (`lines` strategy)
//! or from explicit coordinates in the settings. Snap/join/filter then
//! reduce the raw candidates to clean, deduplicated lattice lines.

use crate::geometry::{BBox, Orientation, approx_eq};
use crate::table::clustering::{cluster_list, cluster_objects};
use crate::table::types::{Edge, EdgeSource, Word};

/// Tolerance for clustering word coordinates during edge synthesis.
const WORD_CLUSTER_TOLERANCE: f64 = 1.0;
/// Words within this distance of a cluster's mean x support its edge.
const WORD_COLLECT_TOLERANCE: f64 = 2.0;

pub(crate) fn horizontal_edge(y: f64, x0: f64, x1: f64, source: EdgeSource) -> Edge {
    Edge {
        x0,
        x1,
        top: y,
        bottom: y,
        orientation: Orientation::Horizontal,
        source,
    }
}

pub(crate) fn vertical_edge(x: f64, top: f64, bottom: f64, source: EdgeSource) -> Edge {
    Edge {
        x0: x,
        x1: x,
        top,
        bottom,
        orientation: Orientation::Vertical,
        source,
    }
}

/// Decompose an axis-aligned rectangle into its four boundary edges.
pub(crate) fn rect_to_edges(rect: BBox, source: EdgeSource) -> Vec<Edge> {
    vec![
        horizontal_edge(rect.top, rect.x0, rect.x1, source),
        horizontal_edge(rect.bottom, rect.x0, rect.x1, source),
        vertical_edge(rect.x0, rect.top, rect.bottom, source),
        vertical_edge(rect.x1, rect.top, rect.bottom, source),
    ]
}

fn words_bbox(words: &[Word]) -> BBox {
    let boxes: Vec<BBox> = words.iter().map(|w| w.bbox).collect();
    BBox::union_all(&boxes)
}

/// Synthesize horizontal edges from word rows.
///
/// Word top coordinates are clustered; every cluster with at least
/// `word_threshold` members contributes a top and a bottom edge spanning
/// the cluster's union bbox.
pub(crate) fn words_to_edges_h(words: &[Word], word_threshold: usize) -> Vec<Edge> {
    let clusters = cluster_objects(words, |w| w.bbox.top, WORD_CLUSTER_TOLERANCE);
    let mut edges = Vec::new();
    for cluster in clusters {
        if cluster.len() < word_threshold {
            continue;
        }
        let bbox = words_bbox(&cluster);
        edges.push(horizontal_edge(bbox.top, bbox.x0, bbox.x1, EdgeSource::Text));
        edges.push(horizontal_edge(
            bbox.bottom,
            bbox.x0,
            bbox.x1,
            EdgeSource::Text,
        ));
    }
    edges
}

/// Synthesize vertical edges from word alignment.
///
/// Every word contributes three candidate coordinates (left, right,
/// center). Each sufficiently large coordinate cluster yields one edge at
/// the cluster mean, spanning the union bbox of the words whose left,
/// right or center lies within [`WORD_COLLECT_TOLERANCE`] of that mean.
pub(crate) fn words_to_edges_v(words: &[Word], word_threshold: usize) -> Vec<Edge> {
    let mut coords = Vec::with_capacity(words.len() * 3);
    for w in words {
        coords.push(w.bbox.x0);
        coords.push(w.bbox.x1);
        coords.push((w.bbox.x0 + w.bbox.x1) / 2.0);
    }

    let mut edges = Vec::new();
    for cluster in cluster_list(coords, WORD_CLUSTER_TOLERANCE) {
        if cluster.len() < word_threshold {
            continue;
        }
        let mean_x = cluster.iter().sum::<f64>() / cluster.len() as f64;
        let supporters: Vec<Word> = words
            .iter()
            .filter(|w| {
                let center = (w.bbox.x0 + w.bbox.x1) / 2.0;
                approx_eq(w.bbox.x0, mean_x, WORD_COLLECT_TOLERANCE)
                    || approx_eq(w.bbox.x1, mean_x, WORD_COLLECT_TOLERANCE)
                    || approx_eq(center, mean_x, WORD_COLLECT_TOLERANCE)
            })
            .cloned()
            .collect();
        if supporters.is_empty() {
            continue;
        }
        let bbox = words_bbox(&supporters);
        edges.push(vertical_edge(mean_x, bbox.top, bbox.bottom, EdgeSource::Text));
    }
    edges
}

/// Snap near-collinear edges together by pairwise averaging.
///
/// One sweep in index order: whenever two same-orientation edges sit
/// within tolerance of each other, both move to their average. This is
/// deliberately NOT a transitive closure — a chain a~b~c where a and c are
/// out of tolerance keeps c apart, matching the documented contract.
pub(crate) fn snap_edges(edges: &mut [Edge], x_tolerance: f64, y_tolerance: f64) {
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            if edges[i].orientation != edges[j].orientation {
                continue;
            }
            match edges[i].orientation {
                Orientation::Vertical if x_tolerance > 0.0 => {
                    if approx_eq(edges[i].x0, edges[j].x0, x_tolerance) {
                        let avg = (edges[i].x0 + edges[j].x0) / 2.0;
                        edges[i].x0 = avg;
                        edges[i].x1 = avg;
                        edges[j].x0 = avg;
                        edges[j].x1 = avg;
                    }
                }
                Orientation::Horizontal if y_tolerance > 0.0 => {
                    if approx_eq(edges[i].top, edges[j].top, y_tolerance) {
                        let avg = (edges[i].top + edges[j].top) / 2.0;
                        edges[i].top = avg;
                        edges[i].bottom = avg;
                        edges[j].top = avg;
                        edges[j].bottom = avg;
                    }
                }
                _ => {}
            }
        }
    }
}

fn joinable(a: &Edge, b: &Edge, x_tolerance: f64, y_tolerance: f64) -> bool {
    if a.orientation != b.orientation {
        return false;
    }
    match a.orientation {
        Orientation::Horizontal => {
            approx_eq(a.top, b.top, y_tolerance)
                && (a.x0.max(b.x0) - a.x1.min(b.x1)) <= x_tolerance
        }
        Orientation::Vertical => {
            approx_eq(a.x0, b.x0, x_tolerance)
                && (a.top.max(b.top) - a.bottom.min(b.bottom)) <= y_tolerance
        }
    }
}

/// Join collinear, near-adjacent edges until no joinable pair remains.
///
/// The later-considered edge merges into the earlier one (bbox union) and
/// is removed, so the edge count decreases monotonically and the loop
/// terminates at a fixed point. A second pass is a no-op.
pub(crate) fn join_edges(mut edges: Vec<Edge>, x_tolerance: f64, y_tolerance: f64) -> Vec<Edge> {
    let mut changed = true;
    while changed {
        changed = false;
        let mut i = 0;
        while i < edges.len() {
            let mut j = i + 1;
            while j < edges.len() {
                if joinable(&edges[i], &edges[j], x_tolerance, y_tolerance) {
                    let merged = edges[i].bbox().union(&edges[j].bbox());
                    edges[i].x0 = merged.x0;
                    edges[i].x1 = merged.x1;
                    edges[i].top = merged.top;
                    edges[i].bottom = merged.bottom;
                    edges.remove(j);
                    changed = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
    }
    edges
}

/// Drop edges shorter than `min_length` along their own orientation.
pub(crate) fn filter_edges(edges: Vec<Edge>, min_length: f64) -> Vec<Edge> {
    edges.into_iter().filter(|e| e.length() >= min_length).collect()
}

/// Full cleanup pass: snap, then join.
pub(crate) fn merge_edges(
    mut edges: Vec<Edge>,
    snap_x: f64,
    snap_y: f64,
    join_x: f64,
    join_y: f64,
) -> Vec<Edge> {
    if snap_x > 0.0 || snap_y > 0.0 {
        snap_edges(&mut edges, snap_x, snap_y);
    }
    join_edges(edges, join_x, join_y)
}
