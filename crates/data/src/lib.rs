//! Data access for the sales and marketing analytics.
//!
//! This crate provides:
//! - Typed records for transaction logs, daily summaries, and marketing extracts
//! - CSV loading with header validation, and CSV/Parquet export
//! - A source cache keyed by file path and modification time

pub mod csv_storage;
pub mod marketing_store;
pub mod models;
pub mod parquet_storage;
pub mod source_cache;

// Re-export commonly used types
pub use csv_storage::{format_decimal, CsvSchema, CsvStorage};
pub use marketing_store::MarketingStore;
pub use parquet_storage::ParquetStorage;
pub use source_cache::SourceCache;

// Re-export models
pub use models::{
    parse_calendar_date, weekday_name, CampaignRecord, ChannelAttributionRecord, CustomerRecord,
    DailySummary, FeatureImportanceRecord, FunnelStageRecord, LeadScoreRecord,
    ProductSalesRecord, TransactionRecord, DAILY_SUMMARY_COLUMNS, REQUIRED_TRANSACTION_FIELDS,
};
