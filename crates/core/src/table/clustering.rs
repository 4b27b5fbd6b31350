//! 1-D tolerance clustering.
//!
//! The shared grouping primitive behind edge synthesis, row construction
//! and column statistics. Values are sorted ascending and a new cluster
//! starts whenever the gap to the previous value exceeds the tolerance, so
//! the assignment is independent of input order.

use rustc_hash::FxHashMap;

use crate::geometry::{KeyF64, key_f64};

/// Cluster a list of values; each inner vec is one ascending cluster.
pub(crate) fn cluster_list(mut xs: Vec<f64>, tolerance: f64) -> Vec<Vec<f64>> {
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if tolerance == 0.0 || xs.len() < 2 {
        return xs.into_iter().map(|x| vec![x]).collect();
    }
    let mut groups: Vec<Vec<f64>> = Vec::new();
    let mut current: Vec<f64> = Vec::new();
    let mut last = xs[0];
    current.push(xs[0]);
    for x in xs.into_iter().skip(1) {
        if x <= last + tolerance {
            current.push(x);
        } else {
            groups.push(current);
            current = vec![x];
        }
        last = x;
    }
    groups.push(current);
    groups
}

/// Map every distinct value to its cluster index.
///
/// Exact duplicates collapse to one entry, so equal values always share a
/// cluster id no matter how the caller ordered them.
pub(crate) fn make_cluster_dict(values: Vec<f64>, tolerance: f64) -> FxHashMap<KeyF64, usize> {
    let mut unique: Vec<f64> = values;
    unique.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    unique.dedup_by(|a, b| (*a - *b).abs() == 0.0);
    let clusters = cluster_list(unique, tolerance);
    let mut dict = FxHashMap::default();
    for (i, cluster) in clusters.into_iter().enumerate() {
        for val in cluster {
            dict.insert(key_f64(val), i);
        }
    }
    dict
}

/// Group objects by clustering the value `key_fn` extracts from each.
///
/// Output groups are ordered by ascending key value; members keep their
/// relative input order within a group.
pub(crate) fn cluster_objects<T: Clone, F: Fn(&T) -> f64>(
    xs: &[T],
    key_fn: F,
    tolerance: f64,
) -> Vec<Vec<T>> {
    let values: Vec<f64> = xs.iter().map(&key_fn).collect();
    let cluster_dict = make_cluster_dict(values, tolerance);

    let mut tuples: Vec<(T, usize)> = xs
        .iter()
        .map(|x| {
            (
                x.clone(),
                *cluster_dict.get(&key_f64(key_fn(x))).unwrap_or(&0),
            )
        })
        .collect();
    tuples.sort_by(|a, b| a.1.cmp(&b.1));

    let mut groups: Vec<Vec<T>> = Vec::new();
    let mut current: Vec<T> = Vec::new();
    let mut last_idx: Option<usize> = None;
    for (item, idx) in tuples.drain(..) {
        if last_idx.is_none() || last_idx == Some(idx) {
            current.push(item);
        } else {
            groups.push(current);
            current = vec![item];
        }
        last_idx = Some(idx);
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}
