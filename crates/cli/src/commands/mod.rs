//! CLI commands for the sales and marketing analytics.

pub mod daily_sales;
pub mod marketing;

pub use daily_sales::{run_daily_sales, DailySalesArgs};
pub use marketing::{run_marketing, MarketingArgs};
