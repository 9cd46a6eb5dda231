//! Customer distribution aggregates.

use crate::stats::quantile_sorted;
use bizdash_data::CustomerRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Bin count used for the customer age distribution.
pub const DEFAULT_AGE_BINS: usize = 40;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over `[min, max]` of the finite values.
///
/// Every bin is half-open except the last, which includes `max`. When all
/// values are equal the range is widened by 0.5 on each side. Returns no
/// bins for empty input or `bins == 0`.
#[must_use]
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }
    let width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for value in finite {
        let index = (((value - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

/// Box-plot statistics of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// Returns `None` when no finite value is present.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            count: sorted.len(),
            min: *sorted.first()?,
            q1: quantile_sorted(&sorted, 0.25)?,
            median: quantile_sorted(&sorted, 0.5)?,
            q3: quantile_sorted(&sorted, 0.75)?,
            max: *sorted.last()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub segment: String,
    pub ltv: FiveNumberSummary,
}

/// Lifetime value distribution per customer segment, in segment order.
#[must_use]
pub fn ltv_by_segment(customers: &[CustomerRecord]) -> Vec<SegmentSummary> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for customer in customers {
        groups
            .entry(customer.segment.as_str())
            .or_default()
            .push(customer.ltv);
    }

    groups
        .into_iter()
        .filter_map(|(segment, values)| {
            FiveNumberSummary::from_values(&values).map(|ltv| SegmentSummary {
                segment: segment.to_string(),
                ltv,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub group: String,
}

/// Income against lifetime value, grouped by segment.
#[must_use]
pub fn income_vs_ltv(customers: &[CustomerRecord]) -> Vec<ScatterPoint> {
    customers
        .iter()
        .map(|c| ScatterPoint {
            x: c.income,
            y: c.ltv,
            group: c.segment.clone(),
        })
        .collect()
}
