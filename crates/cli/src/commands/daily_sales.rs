//! Daily sales CLI command.
//!
//! Aggregates the transaction log into the daily revenue table, narrows it to
//! the displayed range, and prints or exports the result.

use anyhow::{anyhow, Context, Result};
use bizdash_analytics::{compute_daily_sales, select_range, RangeMetrics, ReportFormatter};
use bizdash_core::{AppConfig, DateRange};
use bizdash_data::{parse_calendar_date, CsvStorage, DailySummary, ParquetStorage};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Arguments for the daily-sales command.
#[derive(Args, Debug, Clone)]
pub struct DailySalesArgs {
    /// Transaction log CSV (defaults to `sales.path` from the config)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// First day to aggregate (YYYY-MM-DD); earlier transactions are dropped
    #[arg(long)]
    pub start: Option<String>,

    /// Last day to aggregate (YYYY-MM-DD); later transactions are dropped
    #[arg(long)]
    pub end: Option<String>,

    /// First day shown in the report and export
    #[arg(long)]
    pub from: Option<String>,

    /// Last day shown in the report and export
    #[arg(long)]
    pub to: Option<String>,

    /// Export the shown rows as CSV. A bare file name lands in `export.directory`
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export the shown rows as Parquet. A bare file name lands in `export.directory`
    #[arg(long)]
    pub parquet: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct DailySalesReport<'a> {
    range: DateRange,
    metrics: RangeMetrics,
    days: &'a [DailySummary],
}

/// Parses an optional `--flag` date value.
fn parse_date_arg(flag: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .map(|raw| {
            parse_calendar_date(raw)
                .map_err(|e| anyhow!("Invalid --{flag} date '{raw}': {e}. Use YYYY-MM-DD"))
        })
        .transpose()
}

/// Places bare file names under `directory`; any other path is used as given.
fn resolve_export_path(directory: &Path, path: &Path) -> PathBuf {
    let is_bare = path
        .parent()
        .map_or(true, |parent| parent.as_os_str().is_empty());
    if is_bare && !path.is_absolute() {
        directory.join(path)
    } else {
        path.to_path_buf()
    }
}

fn prepare_export(directory: &Path, path: &Path) -> Result<PathBuf> {
    let path = resolve_export_path(directory, path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory {}", parent.display()))?;
    }
    Ok(path)
}

/// Runs the daily-sales command.
///
/// # Errors
/// Returns an error if the input cannot be read or parsed, a date flag is
/// malformed, or an export fails. An empty selection is not an error.
pub fn run_daily_sales(args: DailySalesArgs, config: &AppConfig) -> Result<()> {
    let input = args.input.unwrap_or_else(|| config.sales.path.clone());
    let filter = DateRange::new(
        parse_date_arg("start", args.start.as_deref())?,
        parse_date_arg("end", args.end.as_deref())?,
    );
    let shown_range = DateRange::new(
        parse_date_arg("from", args.from.as_deref())?,
        parse_date_arg("to", args.to.as_deref())?,
    );

    tracing::info!("Aggregating {} over {}", input.display(), filter);

    let records = CsvStorage::read_transactions(&input)
        .with_context(|| format!("Failed to load transactions from {}", input.display()))?;

    let days = match compute_daily_sales(&records, filter) {
        Ok(days) => days,
        Err(e) if e.is_empty_dataset() => {
            tracing::warn!("{}", e);
            println!("{}", ReportFormatter::format_empty(filter));
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to compute daily sales"),
    };

    let shown = select_range(&days, shown_range);
    if shown.is_empty() {
        tracing::warn!(range = %shown_range, "No computed day falls within range");
        println!("{}", ReportFormatter::format_empty(shown_range));
        return Ok(());
    }

    let metrics =
        RangeMetrics::from_days(shown).context("Failed to summarise the selected range")?;

    if let Some(path) = &args.output {
        let path = prepare_export(&config.export.directory, path)?;
        CsvStorage::write_daily_summary(&path, shown)
            .with_context(|| format!("Failed to write CSV export {}", path.display()))?;
        tracing::info!("Exported {} days to {}", shown.len(), path.display());
    }

    if let Some(path) = &args.parquet {
        let path = prepare_export(&config.export.directory, path)?;
        ParquetStorage::write_daily_summary(&path, shown)
            .with_context(|| format!("Failed to write Parquet export {}", path.display()))?;
        tracing::info!("Exported {} days to {}", shown.len(), path.display());
    }

    if args.json {
        let report = DailySalesReport {
            range: shown_range,
            metrics,
            days: shown,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{}",
            ReportFormatter::format_daily_sales(shown_range, &metrics, shown)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_arg_accepts_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date_arg("start", Some("2024-03-09")).unwrap(), expected);
        assert_eq!(
            parse_date_arg("start", Some("2024-03-09T17:45:00")).unwrap(),
            expected
        );
        assert_eq!(parse_date_arg("start", None).unwrap(), None);
    }

    #[test]
    fn parse_date_arg_names_the_flag() {
        let err = parse_date_arg("to", Some("09/03/2024")).unwrap_err();
        assert!(err.to_string().contains("--to"));
    }

    #[test]
    fn bare_export_names_go_to_export_directory() {
        let dir = Path::new("exports");
        assert_eq!(
            resolve_export_path(dir, Path::new("daily.csv")),
            PathBuf::from("exports/daily.csv")
        );
        assert_eq!(
            resolve_export_path(dir, Path::new("out/daily.csv")),
            PathBuf::from("out/daily.csv")
        );
    }

    #[test]
    fn prepare_export_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested");
        let path = prepare_export(&dir, Path::new("daily.parquet")).unwrap();
        assert!(dir.is_dir());
        assert_eq!(path, dir.join("daily.parquet"));
    }
}
