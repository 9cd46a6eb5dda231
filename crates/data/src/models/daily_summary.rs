//! Per-day revenue summary produced by the daily sales aggregation.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Column order used for tabular exports of [`DailySummary`].
pub const DAILY_SUMMARY_COLUMNS: [&str; 6] = [
    "date",
    "daily_revenue",
    "daily_transactions",
    "cumulative_revenue",
    "moving_avg_7d",
    "day_of_week",
];

/// One calendar day of the gap-filled revenue series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Calendar day (unique, ascending within a series)
    pub date: NaiveDate,
    /// Sum of line revenue for the day, zero on days without sales
    pub daily_revenue: Decimal,
    /// Distinct transactions on the day
    pub daily_transactions: u64,
    /// Running total of `daily_revenue` up to and including this day
    pub cumulative_revenue: Decimal,
    /// Mean `daily_revenue` over the trailing window of up to seven days
    pub moving_avg_7d: Decimal,
    /// English weekday name, e.g. "Monday"
    pub day_of_week: String,
}

impl DailySummary {
    /// Returns true if no transaction happened on this day.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.daily_transactions == 0
    }
}

/// Full English name of the weekday of `date`.
#[must_use]
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
