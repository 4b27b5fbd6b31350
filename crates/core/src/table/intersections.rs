//! Intersection lattice construction.
//!
//! Every (vertical, horizontal) edge pair is tested for a crossing within
//! tolerance; the O(V·H) shape is the documented contract and per-page
//! edge counts stay in the hundreds.

use smallvec::SmallVec;

use crate::geometry::{Orientation, POINT_EPS, Point, approx_eq};
use crate::table::types::Edge;

/// A lattice point with the edges that cross there, as indices into the
/// orientation-sorted edge lists. Points within [`POINT_EPS`] on both
/// axes are the same intersection and union their edge sets.
#[derive(Clone, Debug)]
pub(crate) struct Intersection {
    pub point: Point,
    pub v_edges: SmallVec<[usize; 2]>,
    pub h_edges: SmallVec<[usize; 2]>,
}

pub(crate) fn edges_to_intersections(
    edges: &[Edge],
    x_tolerance: f64,
    y_tolerance: f64,
) -> Vec<Intersection> {
    let mut v: Vec<Edge> = edges
        .iter()
        .filter(|e| e.orientation == Orientation::Vertical)
        .cloned()
        .collect();
    let mut h: Vec<Edge> = edges
        .iter()
        .filter(|e| e.orientation == Orientation::Horizontal)
        .cloned()
        .collect();

    // Deterministic pairing order regardless of input edge order.
    v.sort_by(|a, b| {
        (a.x0, a.top)
            .partial_cmp(&(b.x0, b.top))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    h.sort_by(|a, b| {
        (a.top, a.x0)
            .partial_cmp(&(b.top, b.x0))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut intersections: Vec<Intersection> = Vec::new();
    for (vi, ve) in v.iter().enumerate() {
        for (hi, he) in h.iter().enumerate() {
            let crosses = ve.x0 >= he.x0 - x_tolerance
                && ve.x0 <= he.x1 + x_tolerance
                && he.top >= ve.top - y_tolerance
                && he.top <= ve.bottom + y_tolerance;
            if !crosses {
                continue;
            }
            let point = (ve.x0, he.top);
            match intersections.iter_mut().find(|i| {
                approx_eq(i.point.0, point.0, POINT_EPS) && approx_eq(i.point.1, point.1, POINT_EPS)
            }) {
                Some(existing) => {
                    if !existing.v_edges.contains(&vi) {
                        existing.v_edges.push(vi);
                    }
                    if !existing.h_edges.contains(&hi) {
                        existing.h_edges.push(hi);
                    }
                }
                None => intersections.push(Intersection {
                    point,
                    v_edges: SmallVec::from_slice(&[vi]),
                    h_edges: SmallVec::from_slice(&[hi]),
                }),
            }
        }
    }

    intersections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::edges::{horizontal_edge, vertical_edge};
    use crate::table::types::EdgeSource;

    #[test]
    fn crossing_edges_intersect() {
        let edges = vec![
            vertical_edge(5.0, 0.0, 10.0, EdgeSource::Text),
            horizontal_edge(5.0, 0.0, 10.0, EdgeSource::Text),
        ];
        let points = edges_to_intersections(&edges, 0.0, 0.0);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].point, (5.0, 5.0));
    }

    #[test]
    fn near_miss_within_tolerance_counts() {
        // Vertical edge stops 2 units short of the horizontal line.
        let edges = vec![
            vertical_edge(5.0, 0.0, 8.0, EdgeSource::Text),
            horizontal_edge(10.0, 0.0, 10.0, EdgeSource::Text),
        ];
        let none = edges_to_intersections(&edges, 0.0, 0.0);
        assert!(none.is_empty());
        let hit = edges_to_intersections(&edges, 0.0, 3.0);
        assert_eq!(hit.len(), 1);
    }

    #[test]
    fn near_identical_points_merge_edge_sets() {
        // Two verticals 0.05 apart cross the same horizontal; their hits
        // land within POINT_EPS and must merge into one intersection.
        let edges = vec![
            vertical_edge(5.0, 0.0, 10.0, EdgeSource::Text),
            vertical_edge(5.05, 0.0, 10.0, EdgeSource::Text),
            horizontal_edge(5.0, 0.0, 10.0, EdgeSource::Text),
        ];
        let points = edges_to_intersections(&edges, 0.0, 0.0);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].v_edges.len(), 2);
        assert_eq!(points[0].h_edges.len(), 1);
    }

    #[test]
    fn grid_yields_full_lattice() {
        let mut edges = Vec::new();
        for i in 0..4 {
            let c = i as f64 * 10.0;
            edges.push(vertical_edge(c, 0.0, 30.0, EdgeSource::Text));
            edges.push(horizontal_edge(c, 0.0, 30.0, EdgeSource::Text));
        }
        let points = edges_to_intersections(&edges, 0.0, 0.0);
        assert_eq!(points.len(), 16);
        // Every lattice point references exactly one covering edge pair.
        assert!(points.iter().all(|p| p.v_edges.len() == 1 && p.h_edges.len() == 1));
    }
}
