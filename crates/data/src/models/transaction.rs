//! Point-of-sale transaction line items.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Columns a transaction log must provide, in canonical order.
pub const REQUIRED_TRANSACTION_FIELDS: [&str; 5] = [
    "transaction_id",
    "date",
    "quantity",
    "unit_price",
    "discount_applied",
];

/// One line item of a sale. Several rows may share a `transaction_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Receipt identifier, shared by every line item of the same sale
    pub transaction_id: String,
    /// Calendar day of the sale (time of day is discarded)
    pub date: NaiveDate,
    /// Units sold
    pub quantity: Decimal,
    /// Price per unit
    pub unit_price: Decimal,
    /// Absolute discount taken off the line
    pub discount_applied: Decimal,
}

impl TransactionRecord {
    pub fn new(
        transaction_id: impl Into<String>,
        date: NaiveDate,
        quantity: Decimal,
        unit_price: Decimal,
        discount_applied: Decimal,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            date,
            quantity,
            unit_price,
            discount_applied,
        }
    }

    /// Revenue of this line: `quantity * unit_price - discount_applied`.
    ///
    /// Not clamped; a discount larger than the gross sale yields a negative value.
    /// Returns `None` if the result does not fit in a `Decimal`.
    #[must_use]
    pub fn line_revenue(&self) -> Option<Decimal> {
        self.quantity
            .checked_mul(self.unit_price)?
            .checked_sub(self.discount_applied)
    }
}

/// Parses a calendar date, discarding any time-of-day component.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`
/// (optionally with fractional seconds) and RFC 3339 timestamps.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|ts| ts.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn jan(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_line_revenue() {
        let record = TransactionRecord::new("T1", jan(1), dec!(2), dec!(10), dec!(0));
        assert_eq!(record.line_revenue(), Some(dec!(20)));

        let record = TransactionRecord::new("T2", jan(3), dec!(1), dec!(5), dec!(1));
        assert_eq!(record.line_revenue(), Some(dec!(4)));
    }

    #[test]
    fn test_line_revenue_can_be_negative() {
        let record = TransactionRecord::new("T3", jan(2), dec!(1), dec!(3.50), dec!(5));
        assert_eq!(record.line_revenue(), Some(dec!(-1.50)));
    }

    #[test]
    fn test_line_revenue_overflow_is_none() {
        let huge = Decimal::from(1_000_000_000_000_000_i64);
        let record = TransactionRecord::new("T4", jan(4), huge, huge, dec!(0));
        assert_eq!(record.line_revenue(), None);

        let record = TransactionRecord::new("T5", jan(4), dec!(1), Decimal::MAX, dec!(-1));
        assert_eq!(record.line_revenue(), None);
    }

    #[test]
    fn test_parse_calendar_date_formats() {
        assert_eq!(parse_calendar_date("2024-01-07").unwrap(), jan(7));
        assert_eq!(parse_calendar_date(" 2024-01-07 ").unwrap(), jan(7));
        assert_eq!(parse_calendar_date("2024-01-07 18:45:00").unwrap(), jan(7));
        assert_eq!(parse_calendar_date("2024-01-07T23:59:59.250").unwrap(), jan(7));
        assert_eq!(
            parse_calendar_date("2024-01-07T09:00:00+05:30").unwrap(),
            jan(7)
        );
    }

    #[test]
    fn test_parse_calendar_date_rejects_garbage() {
        assert!(parse_calendar_date("07/01/2024").is_err());
        assert!(parse_calendar_date("2024-02-30").is_err());
        assert!(parse_calendar_date("").is_err());
    }
}
