#![allow(clippy::format_push_string)]

use crate::range::RangeMetrics;
use bizdash_core::DateRange;
use bizdash_data::{format_decimal, DailySummary};

const RULE: &str = "═══════════════════════════════════════════════════════════════════════════════\n";
const LINE: &str = "───────────────────────────────────────────────────────────────────────────────\n";

/// Shown instead of the report when nothing falls inside the selected range.
pub const EMPTY_STATE_MESSAGE: &str = "No sales data available for the selected date range.";

pub struct ReportFormatter;

impl ReportFormatter {
    /// Plain-text daily sales report: headline metrics followed by the daily table.
    #[must_use]
    pub fn format_daily_sales(
        range: DateRange,
        metrics: &RangeMetrics,
        days: &[DailySummary],
    ) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(RULE);
        output.push_str("                              DAILY SALES REPORT\n");
        output.push_str(RULE);
        output.push('\n');

        output.push_str("Date Range\n");
        output.push_str(LINE);
        output.push_str(&format!("Requested:             {range}\n"));
        if let (Some(first), Some(last)) = (metrics.first_day, metrics.last_day) {
            output.push_str(&format!("Covered:               {first} to {last}\n"));
        }
        output.push('\n');

        output.push_str("Headline Metrics\n");
        output.push_str(LINE);
        output.push_str(&format!(
            "Total Revenue:         ${:.2}\n",
            metrics.total_revenue
        ));
        output.push_str(&format!("Total Days:            {}\n", metrics.total_days));
        output.push_str(&format!(
            "Avg Revenue / Day:     ${:.2}\n",
            metrics.avg_revenue_per_day
        ));
        output.push_str(&format!(
            "Total Transactions:    {}\n",
            metrics.total_transactions
        ));
        output.push('\n');

        output.push_str("Daily Breakdown\n");
        output.push_str(LINE);
        output.push_str(&format!(
            "{:<12} {:<10} {:>14} {:>6} {:>16} {:>14}\n",
            "Date", "Weekday", "Revenue", "Txns", "Cumulative", "7d Avg"
        ));
        for day in days {
            output.push_str(&format!(
                "{:<12} {:<10} {:>14} {:>6} {:>16} {:>14}\n",
                day.date.to_string(),
                day.day_of_week,
                format!("{:.2}", day.daily_revenue),
                day.daily_transactions,
                format!("{:.2}", day.cumulative_revenue),
                format_decimal(day.moving_avg_7d.round_dp(2)),
            ));
        }

        output.push('\n');
        output.push_str(RULE);

        let idle = days.iter().filter(|d| d.is_idle()).count();
        if idle > 0 {
            output.push_str(&format!(
                "\n{idle} of {} days had no sales and are shown as zero.\n",
                days.len()
            ));
        }

        output
    }

    #[must_use]
    pub fn format_empty(range: DateRange) -> String {
        format!("\n{EMPTY_STATE_MESSAGE}\nRequested range: {range}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daily_sales::compute_daily_sales;
    use bizdash_data::TransactionRecord;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn jan(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_format_daily_sales() {
        let records = vec![
            TransactionRecord::new("1", jan(1), dec!(2), dec!(10), dec!(0)),
            TransactionRecord::new("2", jan(3), dec!(1), dec!(5.5), dec!(0)),
        ];
        let days = compute_daily_sales(&records, DateRange::unbounded()).unwrap();
        let metrics = RangeMetrics::from_days(&days).unwrap();

        let report = ReportFormatter::format_daily_sales(DateRange::unbounded(), &metrics, &days);

        assert!(report.contains("DAILY SALES REPORT"));
        assert!(report.contains("Covered:               2024-01-01 to 2024-01-03"));
        assert!(report.contains("Total Revenue:         $25.50"));
        assert!(report.contains("Total Days:            3"));
        assert!(report.contains("Avg Revenue / Day:     $8.50"));
        assert!(report.contains("Tuesday"));
        assert!(report.contains("1 of 3 days had no sales"));
    }

    #[test]
    fn test_format_empty() {
        let range = DateRange::between(jan(5), jan(9));
        let text = ReportFormatter::format_empty(range);
        assert!(text.contains(EMPTY_STATE_MESSAGE));
        assert!(text.contains("2024-01-05..=2024-01-09"));
    }
}
