//! Sales and marketing analytics.
//!
//! The centerpiece is [`compute_daily_sales`], which turns a transaction log
//! into a gap-free daily revenue table with running totals and a trailing
//! seven-day average. The remaining modules derive the marketing dashboard
//! aggregates from the typed extracts in `bizdash-data`.

pub mod campaign;
pub mod customers;
pub mod daily_sales;
pub mod evaluation;
pub mod funnel;
pub mod products;
pub mod range;
pub mod report;
pub mod stats;

pub use campaign::{
    monthly_spend_by_campaign_type, regional_revenue_by_quarter, revenue_by_channel,
    revenue_by_channel_and_date, revenue_by_date, ChannelDateRevenue, ChannelRevenue, DatedValue,
    ExecutiveKpis, Month, MonthlySpend, Quarter, RegionQuarterRevenue,
};
pub use customers::{
    histogram, income_vs_ltv, ltv_by_segment, FiveNumberSummary, HistogramBin, ScatterPoint,
    SegmentSummary, DEFAULT_AGE_BINS,
};
pub use daily_sales::{
    checked_total, compute_daily_sales, cumulative_sum, load_daily_sales, trailing_mean,
    MOVING_AVERAGE_WINDOW,
};
pub use evaluation::{
    area_under_curve, rank_features, roc_auc, roc_curve, ConfusionMatrix, LeadEvaluation,
    RocPoint,
};
pub use funnel::{
    attribution_shares, funnel_conversion, AttributionModel, AttributionShare, FunnelStep,
};
pub use products::{product_hierarchy, ProductNode};
pub use range::{select_range, RangeMetrics};
pub use report::{ReportFormatter, EMPTY_STATE_MESSAGE};
