//! Sub-range selection and headline metrics over a computed daily table.

use crate::daily_sales::checked_total;
use bizdash_core::{AnalyticsError, DateRange, Result};
use bizdash_data::DailySummary;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Returns the rows of an ascending daily table that fall within `range`.
///
/// Open bounds default to the table's edges. The result may be empty, e.g.
/// when `range` lies entirely outside the table or `start > end`.
#[must_use]
pub fn select_range(days: &[DailySummary], range: DateRange) -> &[DailySummary] {
    let lower = range
        .start
        .map_or(0, |start| days.partition_point(|d| d.date < start));
    let upper = range
        .end
        .map_or(days.len(), |end| days.partition_point(|d| d.date <= end));

    if lower >= upper {
        &[]
    } else {
        &days[lower..upper]
    }
}

/// Headline figures shown above the daily revenue chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeMetrics {
    pub total_revenue: Decimal,
    pub total_days: usize,
    /// Zero when the selection is empty
    pub avg_revenue_per_day: Decimal,
    pub total_transactions: u64,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
}

impl RangeMetrics {
    /// # Errors
    /// Returns `Overflow` if the selection's revenue leaves the `Decimal` range.
    pub fn from_days(days: &[DailySummary]) -> Result<Self> {
        let revenues: Vec<Decimal> = days.iter().map(|d| d.daily_revenue).collect();
        let total_revenue = checked_total(&revenues).ok_or_else(|| AnalyticsError::Overflow {
            context: "total revenue of the selected range".to_string(),
        })?;
        let total_days = days.len();
        let avg_revenue_per_day = if total_days == 0 {
            Decimal::ZERO
        } else {
            total_revenue / Decimal::from(total_days)
        };

        Ok(Self {
            total_revenue,
            total_days,
            avg_revenue_per_day,
            total_transactions: days.iter().map(|d| d.daily_transactions).sum(),
            first_day: days.first().map(|d| d.date),
            last_day: days.last().map(|d| d.date),
        })
    }
}
