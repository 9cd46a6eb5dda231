//! Data models for the sales and marketing analytics.
//!
//! Money on the transaction side uses `rust_decimal::Decimal` so daily and
//! cumulative totals are exact. Marketing extracts are plain `f64`.

pub mod daily_summary;
pub mod marketing;
pub mod transaction;

pub use daily_summary::{weekday_name, DailySummary, DAILY_SUMMARY_COLUMNS};
pub use marketing::{
    CampaignRecord, ChannelAttributionRecord, CustomerRecord, FeatureImportanceRecord,
    FunnelStageRecord, LeadScoreRecord, ProductSalesRecord,
};
pub use transaction::{parse_calendar_date, TransactionRecord, REQUIRED_TRANSACTION_FIELDS};
