use crate::models::DailySummary;
use anyhow::{anyhow, Result};
use arrow::array::{ArrayRef, Date32Array, Decimal128Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use rust_decimal::Decimal;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

const DECIMAL_PRECISION: u8 = 38;
const DECIMAL_SCALE: i8 = 8;

pub struct ParquetStorage;

impl ParquetStorage {
    /// Writes a daily summary table to a Parquet file (Snappy compressed).
    ///
    /// Money columns are stored as `Decimal128(38, 8)`, dates as `Date32`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or if writing to the Parquet file fails.
    pub fn write_daily_summary(path: impl AsRef<Path>, rows: &[DailySummary]) -> Result<()> {
        let path = path.as_ref();
        let schema = Arc::new(Schema::new(vec![
            Field::new("date", DataType::Date32, false),
            Field::new(
                "daily_revenue",
                DataType::Decimal128(DECIMAL_PRECISION, DECIMAL_SCALE),
                false,
            ),
            Field::new("daily_transactions", DataType::UInt64, false),
            Field::new(
                "cumulative_revenue",
                DataType::Decimal128(DECIMAL_PRECISION, DECIMAL_SCALE),
                false,
            ),
            Field::new(
                "moving_avg_7d",
                DataType::Decimal128(DECIMAL_PRECISION, DECIMAL_SCALE),
                false,
            ),
            Field::new("day_of_week", DataType::Utf8, false),
        ]));

        let dates = Date32Array::from(
            rows.iter()
                .map(|r| days_since_epoch(r.date))
                .collect::<Vec<_>>(),
        );
        let revenue = decimal_column(rows.iter().map(|r| r.daily_revenue))?;
        let transactions =
            UInt64Array::from(rows.iter().map(|r| r.daily_transactions).collect::<Vec<_>>());
        let cumulative = decimal_column(rows.iter().map(|r| r.cumulative_revenue))?;
        let moving_avg = decimal_column(rows.iter().map(|r| r.moving_avg_7d))?;
        let weekdays = StringArray::from(
            rows.iter()
                .map(|r| r.day_of_week.as_str())
                .collect::<Vec<_>>(),
        );

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(dates) as ArrayRef,
                Arc::new(revenue) as ArrayRef,
                Arc::new(transactions) as ArrayRef,
                Arc::new(cumulative) as ArrayRef,
                Arc::new(moving_avg) as ArrayRef,
                Arc::new(weekdays) as ArrayRef,
            ],
        )?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(parquet::basic::Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;

        writer.write(&batch)?;
        writer.close()?;

        tracing::info!(path = %path.display(), rows = rows.len(), "Exported daily summary Parquet");
        Ok(())
    }
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    // NaiveDate::default() is 1970-01-01, the Date32 epoch.
    date.signed_duration_since(NaiveDate::default()).num_days() as i32
}

/// Mantissa of `value` at the column scale. Extra fractional digits are
/// rounded away; an unrepresentable value is an error, never a silent rescale.
fn scaled_mantissa(value: Decimal) -> Result<i128> {
    let target = DECIMAL_SCALE as u32;
    let rounded = value.round_dp(target);
    10i128
        .checked_pow(target - rounded.scale())
        .and_then(|factor| rounded.mantissa().checked_mul(factor))
        .ok_or_else(|| {
            anyhow!("{value} does not fit in Decimal128({DECIMAL_PRECISION}, {DECIMAL_SCALE})")
        })
}

fn decimal_column(values: impl Iterator<Item = Decimal>) -> Result<Decimal128Array> {
    let mantissas = values
        .map(|value| scaled_mantissa(value).map(Some))
        .collect::<Result<Vec<_>>>()?;

    Ok(Decimal128Array::from(mantissas).with_precision_and_scale(DECIMAL_PRECISION, DECIMAL_SCALE)?)
}
