use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sales: SalesConfig,
    pub marketing: MarketingConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Location of the transaction log feeding the daily revenue view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesConfig {
    pub path: PathBuf,
}

/// File names of the marketing extracts, relative to `data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketingConfig {
    pub data_dir: PathBuf,
    pub campaigns: String,
    pub customers: String,
    pub products: String,
    pub leads: String,
    pub features: String,
    pub attribution: String,
    pub funnel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("urbanmart_sales.csv"),
        }
    }
}

impl Default for MarketingConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            campaigns: "campaign_performance.csv".to_string(),
            customers: "customer_data.csv".to_string(),
            products: "product_sales.csv".to_string(),
            leads: "lead_scoring_results.csv".to_string(),
            features: "feature_importance.csv".to_string(),
            attribution: "channel_attribution.csv".to_string(),
            funnel: "funnel_data.csv".to_string(),
        }
    }
}

impl MarketingConfig {
    /// Resolves a configured file name against `data_dir`.
    #[must_use]
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("exports"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
