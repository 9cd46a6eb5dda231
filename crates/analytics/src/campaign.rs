//! Campaign performance aggregates for the executive overview and campaign
//! analytics pages.

use crate::stats::{mean, sum_by};
use bizdash_data::CampaignRecord;
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// Headline KPIs of the executive overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveKpis {
    pub total_revenue: f64,
    pub total_conversions: u64,
    /// Unweighted mean of the per-row ROAS; zero without rows
    pub average_roas: f64,
    pub total_customers: usize,
}

impl ExecutiveKpis {
    #[must_use]
    pub fn compute(campaigns: &[CampaignRecord], total_customers: usize) -> Self {
        let roas: Vec<f64> = campaigns.iter().map(|c| c.roas).collect();
        Self {
            total_revenue: campaigns.iter().map(|c| c.revenue).sum(),
            total_conversions: campaigns.iter().map(|c| c.conversions).sum(),
            average_roas: mean(&roas),
            total_customers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRevenue {
    pub channel: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelDateRevenue {
    pub date: NaiveDate,
    pub channel: String,
    pub revenue: f64,
}

/// Calendar quarter, displayed as `2024Q1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    pub year: i32,
    pub quarter: u32,
}

impl Quarter {
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: date.month0() / 3 + 1,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

impl Serialize for Quarter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Calendar month, displayed as `2024-03`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionQuarterRevenue {
    pub region: String,
    pub quarter: Quarter,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySpend {
    pub month: Month,
    pub campaign_type: String,
    pub spend: f64,
}

/// Revenue per channel, highest first. Ties keep alphabetical order.
#[must_use]
pub fn revenue_by_channel(campaigns: &[CampaignRecord]) -> Vec<ChannelRevenue> {
    let mut channels: Vec<ChannelRevenue> =
        sum_by(campaigns, |c| c.channel.clone(), |c| c.revenue)
            .into_iter()
            .map(|(channel, revenue)| ChannelRevenue { channel, revenue })
            .collect();
    // Stable sort keeps the alphabetical order from the BTreeMap for equal revenue.
    channels.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    channels
}

/// Total revenue per date, ascending.
#[must_use]
pub fn revenue_by_date(campaigns: &[CampaignRecord]) -> Vec<DatedValue> {
    sum_by(campaigns, |c| c.date, |c| c.revenue)
        .into_iter()
        .map(|(date, value)| DatedValue { date, value })
        .collect()
}

/// Revenue per (date, channel), ordered by date then channel.
#[must_use]
pub fn revenue_by_channel_and_date(campaigns: &[CampaignRecord]) -> Vec<ChannelDateRevenue> {
    sum_by(campaigns, |c| (c.date, c.channel.clone()), |c| c.revenue)
        .into_iter()
        .map(|((date, channel), revenue)| ChannelDateRevenue {
            date,
            channel,
            revenue,
        })
        .collect()
}

/// Revenue per (region, quarter), ordered by region then quarter.
#[must_use]
pub fn regional_revenue_by_quarter(campaigns: &[CampaignRecord]) -> Vec<RegionQuarterRevenue> {
    sum_by(
        campaigns,
        |c| (c.region.clone(), Quarter::of(c.date)),
        |c| c.revenue,
    )
    .into_iter()
    .map(|((region, quarter), revenue)| RegionQuarterRevenue {
        region,
        quarter,
        revenue,
    })
    .collect()
}

/// Spend per (month, campaign type), ordered by month then type.
#[must_use]
pub fn monthly_spend_by_campaign_type(campaigns: &[CampaignRecord]) -> Vec<MonthlySpend> {
    sum_by(
        campaigns,
        |c| (Month::of(c.date), c.campaign_type.clone()),
        |c| c.spend,
    )
    .into_iter()
    .map(|((month, campaign_type), spend)| MonthlySpend {
        month,
        campaign_type,
        spend,
    })
    .collect()
}
