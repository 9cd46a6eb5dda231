//! Error kinds raised while loading and aggregating analytics data.

use crate::types::DateRange;
use thiserror::Error;

/// Result alias used across the library crates.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that abort a load or an aggregation. None are transient.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A required column is absent from the input header.
    #[error("Missing required field '{field}' in {origin}")]
    MissingField {
        /// Column name that was expected.
        field: String,
        /// Where the header came from (usually a file path).
        origin: String,
    },

    /// A value could not be interpreted (date or number).
    #[error("Row {row}: cannot parse {field} value '{value}': {reason}")]
    Parse {
        /// 1-based data row number (header excluded).
        row: usize,
        /// Column the value belongs to.
        field: String,
        /// Raw text that failed to parse.
        value: String,
        /// Underlying parser message.
        reason: String,
    },

    /// The record set is empty after date filtering.
    #[error("No records within date range {range}")]
    EmptyDataset {
        /// Bounds that were applied.
        range: DateRange,
    },

    /// A statistic has no defined value for the given input.
    #[error("{metric} is undefined: {reason}")]
    UndefinedMetric {
        /// Name of the statistic.
        metric: &'static str,
        /// Why it cannot be computed.
        reason: String,
    },

    /// Two paired inputs have different lengths.
    #[error("Length mismatch: {left} has {left_len} values but {right} has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    /// A money amount left the representable `Decimal` range.
    #[error("Decimal overflow while computing {context}")]
    Overflow {
        /// What was being computed when the overflow happened.
        context: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl AnalyticsError {
    /// Builds a [`AnalyticsError::Parse`] from any displayable parser error.
    pub fn parse(
        row: usize,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::Parse {
            row,
            field: field.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if this error means "nothing to show" rather than bad data.
    #[must_use]
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, Self::EmptyDataset { .. })
    }
}
