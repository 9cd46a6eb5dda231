//! Small descriptive-statistics helpers shared by the marketing aggregates.

use std::collections::BTreeMap;

/// Sums `value` per `key`, returning groups in key order.
pub fn sum_by<T, K, FK, FV>(items: &[T], key: FK, value: FV) -> BTreeMap<K, f64>
where
    K: Ord,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> f64,
{
    let mut groups = BTreeMap::new();
    for item in items {
        *groups.entry(key(item)).or_insert(0.0) += value(item);
    }
    groups
}

/// Arithmetic mean; zero for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Quantile of already sorted values with linear interpolation between
/// closest ranks (the "linear" method).
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
