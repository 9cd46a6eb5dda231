use crate::models::{
    parse_calendar_date, DailySummary, TransactionRecord, DAILY_SUMMARY_COLUMNS,
    REQUIRED_TRANSACTION_FIELDS,
};
use bizdash_core::{AnalyticsError, Result};
use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Decimal places kept when money values are written to text.
pub const EXPORT_DECIMAL_PLACES: u32 = 6;

/// Columns a CSV extract must carry before any row is deserialized.
pub trait CsvSchema {
    const REQUIRED_FIELDS: &'static [&'static str];
}

pub struct CsvStorage;

impl CsvStorage {
    /// Reads a transaction log.
    ///
    /// Columns may appear in any order and extra columns are ignored.
    ///
    /// # Errors
    /// - `MissingField` if one of the required columns is absent
    /// - `Parse` if a date or number cannot be interpreted
    /// - `Io`/`Csv` if the file cannot be read
    pub fn read_transactions(path: impl AsRef<Path>) -> Result<Vec<TransactionRecord>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let records = Self::read_transactions_from(file, &path.display().to_string())?;

        info!(path = %path.display(), rows = records.len(), "Loaded transaction log");
        Ok(records)
    }

    /// Reads a transaction log from any reader. `origin` names the source in errors.
    ///
    /// # Errors
    /// See [`CsvStorage::read_transactions`].
    pub fn read_transactions_from<R: Read>(
        reader: R,
        origin: &str,
    ) -> Result<Vec<TransactionRecord>> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers = reader.headers()?.clone();
        let [id_col, date_col, qty_col, price_col, discount_col] =
            locate_columns(&headers, &REQUIRED_TRANSACTION_FIELDS, origin)?;

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let row = index + 1;
            let record = result?;
            let field = |col: usize| record.get(col).unwrap_or_default();

            let raw_date = field(date_col);
            let date = parse_calendar_date(raw_date)
                .map_err(|e| AnalyticsError::parse(row, "date", raw_date, e))?;

            records.push(TransactionRecord {
                transaction_id: field(id_col).to_string(),
                date,
                quantity: parse_decimal(row, "quantity", field(qty_col))?,
                unit_price: parse_decimal(row, "unit_price", field(price_col))?,
                discount_applied: parse_decimal(row, "discount_applied", field(discount_col))?,
            });
        }

        debug!(origin, rows = records.len(), "Parsed transaction rows");
        Ok(records)
    }

    /// Reads a marketing extract into typed rows.
    ///
    /// # Errors
    /// - `MissingField` if a column named by `T::REQUIRED_FIELDS` is absent
    /// - `Parse` if a cell does not deserialize into its field type
    pub fn read_records<T>(path: impl AsRef<Path>) -> Result<Vec<T>>
    where
        T: DeserializeOwned + CsvSchema,
    {
        let path = path.as_ref();
        let file = File::open(path)?;
        let rows = Self::read_records_from(file, &path.display().to_string())?;

        info!(path = %path.display(), rows = rows.len(), "Loaded extract");
        Ok(rows)
    }

    /// Reads a marketing extract from any reader.
    ///
    /// # Errors
    /// See [`CsvStorage::read_records`].
    pub fn read_records_from<T, R>(reader: R, origin: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + CsvSchema,
        R: Read,
    {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers = reader.headers()?.clone();
        require_columns(&headers, T::REQUIRED_FIELDS, origin)?;

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let row = index + 1;
            let record = result?;
            let value = record
                .deserialize(Some(&headers))
                .map_err(|err| deserialize_error(row, &headers, &record, &err))?;
            rows.push(value);
        }

        Ok(rows)
    }

    /// Writes a daily summary table as CSV with a header row.
    ///
    /// Format: date,daily_revenue,daily_transactions,cumulative_revenue,moving_avg_7d,day_of_week
    ///
    /// # Errors
    /// Returns error if the file cannot be created or writing fails
    pub fn write_daily_summary(path: impl AsRef<Path>, rows: &[DailySummary]) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Self::write_daily_summary_to(file, rows)?;

        info!(path = %path.display(), rows = rows.len(), "Exported daily summary CSV");
        Ok(())
    }

    /// Writes a daily summary table as CSV to any writer.
    ///
    /// # Errors
    /// Returns error if writing fails
    pub fn write_daily_summary_to<W: Write>(writer: W, rows: &[DailySummary]) -> Result<()> {
        let mut writer = Writer::from_writer(writer);
        writer.write_record(DAILY_SUMMARY_COLUMNS)?;

        for row in rows {
            writer.write_record(&[
                row.date.format("%Y-%m-%d").to_string(),
                format_decimal(row.daily_revenue),
                row.daily_transactions.to_string(),
                format_decimal(row.cumulative_revenue),
                format_decimal(row.moving_avg_7d),
                row.day_of_week.clone(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// Renders a decimal rounded to [`EXPORT_DECIMAL_PLACES`] without trailing zeros.
#[must_use]
pub fn format_decimal(value: Decimal) -> String {
    value.round_dp(EXPORT_DECIMAL_PLACES).normalize().to_string()
}

fn parse_decimal(row: usize, field: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| AnalyticsError::parse(row, field, raw, e))
}

fn locate_columns<const N: usize>(
    headers: &StringRecord,
    fields: &[&str; N],
    origin: &str,
) -> Result<[usize; N]> {
    let mut columns = [0usize; N];
    for (slot, field) in columns.iter_mut().zip(fields) {
        *slot = column_index(headers, field, origin)?;
    }
    Ok(columns)
}

fn require_columns(headers: &StringRecord, fields: &[&str], origin: &str) -> Result<()> {
    for field in fields {
        column_index(headers, field, origin)?;
    }
    Ok(())
}

fn column_index(headers: &StringRecord, field: &str, origin: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == field)
        .ok_or_else(|| AnalyticsError::MissingField {
            field: field.to_string(),
            origin: origin.to_string(),
        })
}

fn deserialize_error(
    row: usize,
    headers: &StringRecord,
    record: &StringRecord,
    err: &csv::Error,
) -> AnalyticsError {
    if let csv::ErrorKind::Deserialize { err: de, .. } = err.kind() {
        let column = de.field().and_then(|i| usize::try_from(i).ok());
        let field = column.and_then(|i| headers.get(i)).unwrap_or("<record>");
        let value = column.and_then(|i| record.get(i)).unwrap_or_default();
        return AnalyticsError::parse(row, field, value, de.kind());
    }
    AnalyticsError::parse(row, "<record>", "", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FunnelStageRecord, LeadScoreRecord};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn jan(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_read_transactions_any_column_order() {
        let data = "\
store,discount_applied,unit_price,quantity,date,transaction_id
S1,0,10,2,2024-01-01,1
S1,1,5,1,2024-01-03 14:30:00,2
";
        let records = CsvStorage::read_transactions_from(data.as_bytes(), "inline").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            TransactionRecord::new("1", jan(1), dec!(2), dec!(10), dec!(0))
        );
        assert_eq!(records[1].date, jan(3));
        assert_eq!(records[1].line_revenue(), Some(dec!(4)));
    }

    #[test]
    fn test_read_transactions_missing_field() {
        let data = "transaction_id,date,quantity,unit_price\n1,2024-01-01,2,10\n";
        let err = CsvStorage::read_transactions_from(data.as_bytes(), "sales.csv").unwrap_err();

        match err {
            AnalyticsError::MissingField { field, origin } => {
                assert_eq!(field, "discount_applied");
                assert_eq!(origin, "sales.csv");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_read_transactions_bad_date_reports_row() {
        let data = "\
transaction_id,date,quantity,unit_price,discount_applied
1,2024-01-01,2,10,0
2,not-a-date,1,5,0
";
        let err = CsvStorage::read_transactions_from(data.as_bytes(), "inline").unwrap_err();

        match err {
            AnalyticsError::Parse {
                row, field, value, ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(field, "date");
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_read_transactions_bad_number() {
        let data = "transaction_id,date,quantity,unit_price,discount_applied\n1,2024-01-01,two,10,0\n";
        let err = CsvStorage::read_transactions_from(data.as_bytes(), "inline").unwrap_err();
        assert!(matches!(err, AnalyticsError::Parse { ref field, .. } if field == "quantity"));
    }

    #[test]
    fn test_read_transactions_accepts_scientific_notation() {
        let data = "transaction_id,date,quantity,unit_price,discount_applied\n1,2024-01-01,1,1.5e2,0\n";
        let records = CsvStorage::read_transactions_from(data.as_bytes(), "inline").unwrap();
        assert_eq!(records[0].unit_price, dec!(150));
    }

    #[test]
    fn test_read_records_missing_field() {
        let data = "actual_converted,predicted_probability\n1,0.8\n";
        let err = CsvStorage::read_records_from::<LeadScoreRecord, _>(data.as_bytes(), "leads.csv")
            .unwrap_err();
        assert!(
            matches!(err, AnalyticsError::MissingField { ref field, .. } if field == "predicted_class")
        );
    }

    #[test]
    fn test_read_records_parse_error_names_field() {
        let data = "stage,value\nVisit,1000\nLead,many\n";
        let err = CsvStorage::read_records_from::<FunnelStageRecord, _>(data.as_bytes(), "funnel")
            .unwrap_err();

        match err {
            AnalyticsError::Parse {
                row, field, value, ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(field, "value");
                assert_eq!(value, "many");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_write_daily_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daily_sales.csv");
        let rows = vec![DailySummary {
            date: jan(2),
            daily_revenue: dec!(0.00),
            daily_transactions: 0,
            cumulative_revenue: dec!(20.00),
            moving_avg_7d: dec!(20) / dec!(3),
            day_of_week: "Tuesday".to_string(),
        }];

        CsvStorage::write_daily_summary(&path, &rows).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();

        assert_eq!(
            written,
            "date,daily_revenue,daily_transactions,cumulative_revenue,moving_avg_7d,day_of_week\n\
             2024-01-02,0,0,20,6.666667,Tuesday\n"
        );
    }

    #[test]
    fn test_read_transactions_missing_file() {
        let err = CsvStorage::read_transactions("/nonexistent/sales.csv").unwrap_err();
        assert!(matches!(err, AnalyticsError::Io(_)));
    }
}
