//! Core types, configuration, and error kinds shared by the analytics crates.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod types;

pub use config::{AppConfig, ExportConfig, LoggingConfig, MarketingConfig, SalesConfig};
pub use config_loader::ConfigLoader;
pub use error::{AnalyticsError, Result};
pub use types::DateRange;
