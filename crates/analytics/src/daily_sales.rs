//! Daily sales aggregation.
//!
//! Turns a flat log of transaction line items into a dense, gap-free daily
//! series: one row per calendar day between the first and last sale, with
//! revenue, distinct transaction counts, a running total and a trailing
//! seven-day mean.

use bizdash_core::{AnalyticsError, DateRange, Result};
use bizdash_data::{weekday_name, CsvStorage, DailySummary, TransactionRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Number of days averaged by `moving_avg_7d`.
pub const MOVING_AVERAGE_WINDOW: usize = 7;

#[derive(Default)]
struct DayBucket<'a> {
    revenue: Decimal,
    transactions: HashSet<&'a str>,
}

/// Aggregates transaction line items into a gap-filled daily summary.
///
/// Records outside `range` are dropped before grouping, so the output span
/// runs from the earliest to the latest *surviving* date. Days inside the
/// span without sales are zero-filled.
///
/// # Errors
/// - `EmptyDataset` if no record falls within `range`
/// - `Overflow` if a line, daily or running total leaves the `Decimal` range
///
/// # Example
/// ```
/// use bizdash_analytics::daily_sales::compute_daily_sales;
/// use bizdash_core::DateRange;
/// use bizdash_data::TransactionRecord;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let jan = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let records = vec![
///     TransactionRecord::new("1", jan(1), dec!(2), dec!(10), dec!(0)),
///     TransactionRecord::new("2", jan(3), dec!(1), dec!(5), dec!(1)),
/// ];
///
/// let days = compute_daily_sales(&records, DateRange::unbounded()).unwrap();
/// assert_eq!(days.len(), 3);
/// assert_eq!(days[1].daily_revenue, dec!(0));
/// assert_eq!(days[2].moving_avg_7d, dec!(8));
/// ```
pub fn compute_daily_sales(
    records: &[TransactionRecord],
    range: DateRange,
) -> Result<Vec<DailySummary>> {
    let mut by_day: BTreeMap<NaiveDate, DayBucket<'_>> = BTreeMap::new();
    for record in records.iter().filter(|r| range.contains(r.date)) {
        let line = record.line_revenue().ok_or_else(|| AnalyticsError::Overflow {
            context: format!(
                "line revenue of transaction {} on {}",
                record.transaction_id, record.date
            ),
        })?;
        let bucket = by_day.entry(record.date).or_default();
        bucket.revenue = bucket
            .revenue
            .checked_add(line)
            .ok_or_else(|| AnalyticsError::Overflow {
                context: format!("daily revenue on {}", record.date),
            })?;
        bucket.transactions.insert(record.transaction_id.as_str());
    }

    let (Some(&first), Some(&last)) = (by_day.keys().next(), by_day.keys().next_back()) else {
        return Err(AnalyticsError::EmptyDataset { range });
    };

    let days: Vec<(NaiveDate, Decimal, u64)> = first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| match by_day.get(&date) {
            Some(bucket) => (date, bucket.revenue, bucket.transactions.len() as u64),
            None => (date, Decimal::ZERO, 0),
        })
        .collect();

    let revenues: Vec<Decimal> = days.iter().map(|(_, revenue, _)| *revenue).collect();
    let cumulative = cumulative_sum(&revenues)?;
    let moving_avg = trailing_mean(&revenues, MOVING_AVERAGE_WINDOW)?;

    debug!(
        first = %first,
        last = %last,
        days = days.len(),
        active_days = by_day.len(),
        "Computed daily sales span"
    );

    Ok(days
        .into_iter()
        .enumerate()
        .map(|(i, (date, daily_revenue, daily_transactions))| DailySummary {
            date,
            daily_revenue,
            daily_transactions,
            cumulative_revenue: cumulative[i],
            moving_avg_7d: moving_avg[i],
            day_of_week: weekday_name(date).to_string(),
        })
        .collect())
}

/// Loads a transaction log from CSV and aggregates it.
///
/// # Errors
/// - `MissingField`/`Parse`/`Io` from loading the file
/// - `EmptyDataset`/`Overflow` from [`compute_daily_sales`]
pub fn load_daily_sales(path: impl AsRef<Path>, range: DateRange) -> Result<Vec<DailySummary>> {
    let records = CsvStorage::read_transactions(path)?;
    compute_daily_sales(&records, range)
}

/// Running total, inclusive of the current element.
///
/// # Errors
/// Returns `Overflow` if the total leaves the `Decimal` range.
pub fn cumulative_sum(values: &[Decimal]) -> Result<Vec<Decimal>> {
    let mut cumulative = Vec::with_capacity(values.len());
    let mut running = Decimal::ZERO;

    for (i, value) in values.iter().enumerate() {
        running = running
            .checked_add(*value)
            .ok_or_else(|| AnalyticsError::Overflow {
                context: format!("running total at index {i}"),
            })?;
        cumulative.push(running);
    }

    Ok(cumulative)
}

/// Trailing mean over up to `window` elements ending at each index.
///
/// The first `window - 1` entries average over the elements available so far;
/// a `window` of zero is treated as one.
///
/// # Errors
/// Returns `Overflow` if a window sum leaves the `Decimal` range.
pub fn trailing_mean(values: &[Decimal], window: usize) -> Result<Vec<Decimal>> {
    let window = window.max(1);
    let mut means = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let start = i.saturating_sub(window - 1);
        let slice = &values[start..=i];
        let sum = checked_total(slice).ok_or_else(|| AnalyticsError::Overflow {
            context: format!("trailing window ending at index {i}"),
        })?;
        means.push(sum / Decimal::from(slice.len()));
    }

    Ok(means)
}

/// Sum of `values`, or `None` on overflow.
#[must_use]
pub fn checked_total(values: &[Decimal]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn jan(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn line(
        id: &str,
        date: NaiveDate,
        qty: Decimal,
        price: Decimal,
        disc: Decimal,
    ) -> TransactionRecord {
        TransactionRecord::new(id, date, qty, price, disc)
    }

    fn example_records() -> Vec<TransactionRecord> {
        vec![
            line("1", jan(1), dec!(2), dec!(10), dec!(0)),
            line("2", jan(3), dec!(1), dec!(5), dec!(1)),
        ]
    }

    #[test]
    fn test_worked_example() {
        let days = compute_daily_sales(&example_records(), DateRange::unbounded()).unwrap();

        let dates: Vec<_> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![jan(1), jan(2), jan(3)]);

        let revenue: Vec<_> = days.iter().map(|d| d.daily_revenue).collect();
        assert_eq!(revenue, vec![dec!(20), dec!(0), dec!(4)]);

        let txns: Vec<_> = days.iter().map(|d| d.daily_transactions).collect();
        assert_eq!(txns, vec![1, 0, 1]);

        let cumulative: Vec<_> = days.iter().map(|d| d.cumulative_revenue).collect();
        assert_eq!(cumulative, vec![dec!(20), dec!(20), dec!(24)]);

        let moving: Vec<_> = days.iter().map(|d| d.moving_avg_7d).collect();
        assert_eq!(moving, vec![dec!(20), dec!(10), dec!(8)]);

        let weekdays: Vec<_> = days.iter().map(|d| d.day_of_week.as_str()).collect();
        assert_eq!(weekdays, vec!["Monday", "Tuesday", "Wednesday"]);
    }

    #[test]
    fn test_completeness_over_long_gap() {
        let records = vec![
            line("a", NaiveDate::from_ymd_opt(2024, 2, 27).unwrap(), dec!(1), dec!(1), dec!(0)),
            line("b", NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), dec!(1), dec!(1), dec!(0)),
        ];
        let days = compute_daily_sales(&records, DateRange::unbounded()).unwrap();

        // 2024 is a leap year: Feb 27, 28, 29, Mar 1, 2
        assert_eq!(days.len(), 5);
        assert!(days.windows(2).all(|w| w[1].date == w[0].date.succ_opt().unwrap()));
        assert!(days[1..4].iter().all(|d| d.daily_revenue.is_zero() && d.is_idle()));
    }

    #[test]
    fn test_unsorted_input() {
        let mut records = example_records();
        records.reverse();
        let days = compute_daily_sales(&records, DateRange::unbounded()).unwrap();
        assert_eq!(days.first().unwrap().date, jan(1));
        assert_eq!(days.last().unwrap().date, jan(3));
    }

    #[test]
    fn test_revenue_sums_line_items() {
        let records = vec![
            line("1", jan(5), dec!(3), dec!(2.50), dec!(0.50)),
            line("2", jan(5), dec!(1), dec!(12), dec!(2)),
        ];
        let days = compute_daily_sales(&records, DateRange::unbounded()).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].daily_revenue, dec!(17));
    }

    #[test]
    fn test_distinct_transaction_count() {
        let records = vec![
            line("T1", jan(1), dec!(1), dec!(10), dec!(0)),
            line("T1", jan(1), dec!(2), dec!(4), dec!(0)),
            line("T2", jan(1), dec!(1), dec!(1), dec!(0)),
            // Same receipt id on another day counts again on that day
            line("T1", jan(2), dec!(1), dec!(1), dec!(0)),
        ];
        let days = compute_daily_sales(&records, DateRange::unbounded()).unwrap();
        assert_eq!(days[0].daily_transactions, 2);
        assert_eq!(days[0].daily_revenue, dec!(19));
        assert_eq!(days[1].daily_transactions, 1);
    }

    #[test]
    fn test_negative_line_revenue_is_kept() {
        let records = vec![
            line("1", jan(1), dec!(1), dec!(10), dec!(0)),
            line("2", jan(2), dec!(1), dec!(2), dec!(5)),
        ];
        let days = compute_daily_sales(&records, DateRange::unbounded()).unwrap();
        assert_eq!(days[1].daily_revenue, dec!(-3));
        assert_eq!(days[1].cumulative_revenue, dec!(7));
    }

    #[test]
    fn test_cumulative_and_moving_average_properties() {
        // Fourteen consecutive days with one sale each of value d
        let records: Vec<_> = (1..=14)
            .map(|d| line(&d.to_string(), jan(d), dec!(1), Decimal::from(d), dec!(0)))
            .collect();
        let days = compute_daily_sales(&records, DateRange::unbounded()).unwrap();
        let revenue: Vec<_> = days.iter().map(|d| d.daily_revenue).collect();

        for (i, day) in days.iter().enumerate() {
            let expected_cumulative: Decimal = revenue[..=i].iter().sum();
            assert_eq!(day.cumulative_revenue, expected_cumulative);

            let start = i.saturating_sub(6);
            let window = &revenue[start..=i];
            let expected_mean = window.iter().sum::<Decimal>() / Decimal::from(window.len());
            assert_eq!(day.moving_avg_7d, expected_mean, "day index {i}");
        }

        assert!(days
            .windows(2)
            .all(|w| w[1].cumulative_revenue >= w[0].cumulative_revenue));
        // Full window from index 6 onward: mean of 8..=14 on the last day
        assert_eq!(days[13].moving_avg_7d, dec!(11));
    }

    #[test]
    fn test_filter_applies_before_aggregation() {
        let records = vec![
            line("1", jan(1), dec!(1), dec!(100), dec!(0)),
            line("2", jan(4), dec!(1), dec!(10), dec!(0)),
            line("3", jan(6), dec!(1), dec!(20), dec!(0)),
            line("4", jan(9), dec!(1), dec!(999), dec!(0)),
        ];
        let range = DateRange::between(jan(2), jan(8));
        let days = compute_daily_sales(&records, range).unwrap();

        // Span follows surviving records (4th..6th), not the bounds
        assert_eq!(days.first().unwrap().date, jan(4));
        assert_eq!(days.last().unwrap().date, jan(6));
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].cumulative_revenue, dec!(10));
        assert_eq!(days[2].cumulative_revenue, dec!(30));
        assert_eq!(days[0].moving_avg_7d, dec!(10));
    }

    #[test]
    fn test_open_ended_bounds() {
        let records = example_records();
        let from_second = compute_daily_sales(&records, DateRange::new(Some(jan(2)), None)).unwrap();
        assert_eq!(from_second.len(), 1);
        assert_eq!(from_second[0].date, jan(3));

        let until_second = compute_daily_sales(&records, DateRange::new(None, Some(jan(2)))).unwrap();
        assert_eq!(until_second.len(), 1);
        assert_eq!(until_second[0].date, jan(1));
    }

    #[test]
    fn test_empty_after_filter() {
        let range = DateRange::between(jan(10), jan(20));
        let err = compute_daily_sales(&example_records(), range).unwrap_err();
        match err {
            AnalyticsError::EmptyDataset { range: reported } => assert_eq!(reported, range),
            other => panic!("expected EmptyDataset, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input() {
        let err = compute_daily_sales(&[], DateRange::unbounded()).unwrap_err();
        assert!(err.is_empty_dataset());
    }

    #[test]
    fn test_idempotent() {
        let records = example_records();
        let range = DateRange::new(Some(jan(1)), None);
        let first = compute_daily_sales(&records, range).unwrap();
        let second = compute_daily_sales(&records, range).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_trailing_mean_zero_window() {
        let means = trailing_mean(&[dec!(2), dec!(4)], 0).unwrap();
        assert_eq!(means, vec![dec!(2), dec!(4)]);
    }

    #[test]
    fn test_cumulative_sum_empty() {
        assert!(cumulative_sum(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_line_overflow_is_an_error() {
        let huge = Decimal::from(1_000_000_000_000_000_i64);
        let records = vec![
            line("1", jan(1), dec!(1), dec!(10), dec!(0)),
            line("2", jan(2), huge, huge, dec!(0)),
        ];
        let err = compute_daily_sales(&records, DateRange::unbounded()).unwrap_err();
        match err {
            AnalyticsError::Overflow { context } => assert!(context.contains("transaction 2")),
            other => panic!("expected Overflow, got {other:?}"),
        }
    }

    #[test]
    fn test_daily_total_overflow_is_an_error() {
        let records = vec![
            line("1", jan(1), dec!(1), Decimal::MAX, dec!(0)),
            line("2", jan(1), dec!(1), Decimal::MAX, dec!(0)),
        ];
        let err = compute_daily_sales(&records, DateRange::unbounded()).unwrap_err();
        assert!(matches!(err, AnalyticsError::Overflow { .. }));
    }

    #[test]
    fn test_running_total_overflow_is_an_error() {
        let records = vec![
            line("1", jan(1), dec!(1), Decimal::MAX, dec!(0)),
            line("2", jan(2), dec!(1), Decimal::MAX, dec!(0)),
        ];
        let err = compute_daily_sales(&records, DateRange::unbounded()).unwrap_err();
        match err {
            AnalyticsError::Overflow { context } => assert!(context.contains("running total")),
            other => panic!("expected Overflow, got {other:?}"),
        }
    }

    #[test]
    fn test_checked_total() {
        assert_eq!(checked_total(&[dec!(1.5), dec!(-0.5)]), Some(dec!(1)));
        assert_eq!(checked_total(&[]), Some(Decimal::ZERO));
        assert_eq!(checked_total(&[Decimal::MAX, dec!(1)]), None);
    }
}
