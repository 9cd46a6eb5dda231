//! Channel attribution shares and marketing funnel conversion.

use bizdash_data::{ChannelAttributionRecord, FunnelStageRecord};
use serde::Serialize;
use std::str::FromStr;

/// How conversion credit is assigned across touchpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionModel {
    /// All credit to the first touchpoint (default)
    #[default]
    FirstTouch,
    /// All credit to the last touchpoint before conversion
    LastTouch,
    /// Credit split evenly across touchpoints
    Linear,
}

impl AttributionModel {
    pub const ALL: [AttributionModel; 3] = [Self::FirstTouch, Self::LastTouch, Self::Linear];

    /// Credited value of `row` under this model.
    #[must_use]
    pub fn value(self, row: &ChannelAttributionRecord) -> f64 {
        match self {
            Self::FirstTouch => row.first_touch,
            Self::LastTouch => row.last_touch,
            Self::Linear => row.linear,
        }
    }
}

impl FromStr for AttributionModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "first_touch" | "first" => Ok(Self::FirstTouch),
            "last_touch" | "last" => Ok(Self::LastTouch),
            "linear" => Ok(Self::Linear),
            _ => Err(format!(
                "Invalid attribution model: '{s}'. Valid values: first_touch, last_touch, linear"
            )),
        }
    }
}

impl std::fmt::Display for AttributionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstTouch => write!(f, "first_touch"),
            Self::LastTouch => write!(f, "last_touch"),
            Self::Linear => write!(f, "linear"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributionShare {
    pub channel: String,
    pub value: f64,
    /// Fraction of the total credited value (0.0 to 1.0)
    pub share: f64,
}

/// Per-channel credit and share of total under `model`, in input order.
#[must_use]
pub fn attribution_shares(
    rows: &[ChannelAttributionRecord],
    model: AttributionModel,
) -> Vec<AttributionShare> {
    let total: f64 = rows.iter().map(|r| model.value(r)).sum();

    rows.iter()
        .map(|row| {
            let value = model.value(row);
            AttributionShare {
                channel: row.channel.clone(),
                value,
                share: if total == 0.0 { 0.0 } else { value / total },
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStep {
    pub stage: String,
    pub value: f64,
    /// Percentage of the first stage's value
    pub percent_of_initial: f64,
    /// Percentage of the preceding stage's value (100 for the first stage)
    pub percent_of_previous: f64,
}

/// Conversion through the funnel stages, in the given stage order.
///
/// Percentages against a zero base are reported as 0.
#[must_use]
pub fn funnel_conversion(stages: &[FunnelStageRecord]) -> Vec<FunnelStep> {
    let initial = stages.first().map_or(0.0, |s| s.value);
    let mut previous = initial;

    stages
        .iter()
        .map(|stage| {
            let step = FunnelStep {
                stage: stage.stage.clone(),
                value: stage.value,
                percent_of_initial: percent(stage.value, initial),
                percent_of_previous: percent(stage.value, previous),
            };
            previous = stage.value;
            step
        })
        .collect()
}

fn percent(value: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        value / base * 100.0
    }
}
