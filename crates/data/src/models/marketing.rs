//! Marketing extracts consumed by the analytics pages.
//!
//! These rows are produced upstream (campaign platforms, CRM, the lead
//! scoring model) and arrive as CSV files. They are read as-is; the
//! aggregates over them live in `bizdash-analytics`.

use crate::csv_storage::CsvSchema;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Daily performance of one campaign on one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub date: NaiveDate,
    pub channel: String,
    pub region: String,
    pub campaign_type: String,
    pub revenue: f64,
    pub spend: f64,
    pub conversions: u64,
    /// Return on ad spend as reported by the platform
    pub roas: f64,
}

impl CsvSchema for CampaignRecord {
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "date",
        "channel",
        "region",
        "campaign_type",
        "revenue",
        "spend",
        "conversions",
        "roas",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub age: f64,
    pub segment: String,
    pub income: f64,
    /// Lifetime value
    pub ltv: f64,
}

impl CsvSchema for CustomerRecord {
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["customer_id", "age", "segment", "income", "ltv"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSalesRecord {
    pub category: String,
    pub subcategory: String,
    pub product: String,
    pub sales: f64,
    pub profit_margin: f64,
}

impl CsvSchema for ProductSalesRecord {
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["category", "subcategory", "product", "sales", "profit_margin"];
}

/// Lead scoring model output joined with the observed outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScoreRecord {
    #[serde(deserialize_with = "deserialize_flag")]
    pub actual_converted: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub predicted_class: bool,
    pub predicted_probability: f64,
}

impl CsvSchema for LeadScoreRecord {
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["actual_converted", "predicted_class", "predicted_probability"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportanceRecord {
    pub feature: String,
    pub importance: f64,
    /// Standard deviation of the importance across folds
    pub std: f64,
}

impl CsvSchema for FeatureImportanceRecord {
    const REQUIRED_FIELDS: &'static [&'static str] = &["feature", "importance", "std"];
}

/// Revenue credited to a channel under each attribution model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelAttributionRecord {
    pub channel: String,
    pub first_touch: f64,
    pub last_touch: f64,
    pub linear: f64,
}

impl CsvSchema for ChannelAttributionRecord {
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["channel", "first_touch", "last_touch", "linear"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStageRecord {
    pub stage: String,
    pub value: f64,
}

impl CsvSchema for FunnelStageRecord {
    const REQUIRED_FIELDS: &'static [&'static str] = &["stage", "value"];
}

/// Accepts `0`/`1`, `true`/`false` and `yes`/`no` (case-insensitive).
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Ok(true),
        "0" | "0.0" | "false" | "no" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a 0/1 flag, got '{other}'"
        ))),
    }
}
