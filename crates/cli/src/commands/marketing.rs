//! Marketing dashboard CLI command.
//!
//! Builds the aggregates behind each dashboard page from the marketing
//! extracts. Every extract is loaded once per run through the store's cache,
//! however many pages use it.

#![allow(clippy::format_push_string)]

use anyhow::{anyhow, Context, Result};
use bizdash_analytics::{
    attribution_shares, funnel_conversion, histogram, income_vs_ltv, ltv_by_segment,
    monthly_spend_by_campaign_type, product_hierarchy, rank_features,
    regional_revenue_by_quarter, revenue_by_channel, revenue_by_channel_and_date,
    revenue_by_date, AttributionModel, AttributionShare, ChannelDateRevenue, ChannelRevenue,
    DatedValue, ExecutiveKpis, FunnelStep, HistogramBin, LeadEvaluation, MonthlySpend,
    ProductNode, RegionQuarterRevenue, ScatterPoint, SegmentSummary, DEFAULT_AGE_BINS,
};
use bizdash_core::{AnalyticsError, AppConfig};
use bizdash_data::{FeatureImportanceRecord, MarketingStore};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;

const LINE: &str = "───────────────────────────────────────────────────────────────\n";

/// Dashboard page to report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    ExecutiveOverview,
    CampaignAnalytics,
    CustomerInsights,
    ProductPerformance,
    AttributionFunnel,
    ModelEvaluation,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::ExecutiveOverview,
        Page::CampaignAnalytics,
        Page::CustomerInsights,
        Page::ProductPerformance,
        Page::AttributionFunnel,
        Page::ModelEvaluation,
    ];

    /// Parses a `--page` value; `all` selects every page in dashboard order.
    pub fn parse_selection(s: &str) -> Result<Vec<Page>> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::ALL.to_vec())
        } else {
            Ok(vec![s.parse()?])
        }
    }
}

impl FromStr for Page {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "executive_overview" | "executive" | "overview" => Ok(Page::ExecutiveOverview),
            "campaign_analytics" | "campaigns" => Ok(Page::CampaignAnalytics),
            "customer_insights" | "customers" => Ok(Page::CustomerInsights),
            "product_performance" | "products" => Ok(Page::ProductPerformance),
            "attribution_funnel" | "attribution" | "funnel" => Ok(Page::AttributionFunnel),
            "model_evaluation" | "model" | "leads" => Ok(Page::ModelEvaluation),
            _ => Err(anyhow!(
                "Invalid page: '{}'. Valid values: executive_overview, campaign_analytics, \
                 customer_insights, product_performance, attribution_funnel, model_evaluation, all",
                s
            )),
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Page::ExecutiveOverview => write!(f, "executive_overview"),
            Page::CampaignAnalytics => write!(f, "campaign_analytics"),
            Page::CustomerInsights => write!(f, "customer_insights"),
            Page::ProductPerformance => write!(f, "product_performance"),
            Page::AttributionFunnel => write!(f, "attribution_funnel"),
            Page::ModelEvaluation => write!(f, "model_evaluation"),
        }
    }
}

/// Arguments for the marketing command.
#[derive(Args, Debug, Clone)]
pub struct MarketingArgs {
    /// Directory holding the marketing extracts (defaults to `marketing.data_dir`)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Page to report (default: all)
    /// Valid values: executive_overview, campaign_analytics, customer_insights,
    /// product_performance, attribution_funnel, model_evaluation, all
    #[arg(short, long, default_value = "all")]
    pub page: String,

    /// Attribution model for the attribution page
    /// Valid values: first_touch, last_touch, linear
    #[arg(long, default_value = "first_touch")]
    pub attribution_model: String,

    /// Print the reports as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Aggregates behind one dashboard page.
#[derive(Debug, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageReport {
    ExecutiveOverview {
        kpis: ExecutiveKpis,
        revenue_by_channel: Vec<ChannelRevenue>,
        revenue_trend: Vec<DatedValue>,
    },
    CampaignAnalytics {
        revenue_by_channel_and_date: Vec<ChannelDateRevenue>,
        regional_revenue_by_quarter: Vec<RegionQuarterRevenue>,
        monthly_spend_by_campaign_type: Vec<MonthlySpend>,
    },
    CustomerInsights {
        age_distribution: Vec<HistogramBin>,
        ltv_by_segment: Vec<SegmentSummary>,
        income_vs_ltv: Vec<ScatterPoint>,
    },
    ProductPerformance {
        hierarchy: Vec<ProductNode>,
    },
    AttributionFunnel {
        model: AttributionModel,
        attribution: Vec<AttributionShare>,
        funnel: Vec<FunnelStep>,
    },
    ModelEvaluation {
        evaluation: LeadEvaluation,
        feature_importance: Vec<FeatureImportanceRecord>,
    },
}

/// Builds the report of `page` from the store's extracts.
///
/// # Errors
/// Returns an error if an extract the page needs cannot be loaded, or if the
/// model evaluation is undefined for the lead data.
pub fn build_page(
    page: Page,
    store: &MarketingStore,
    model: AttributionModel,
) -> bizdash_core::Result<PageReport> {
    let report = match page {
        Page::ExecutiveOverview => {
            let campaigns = store.campaigns()?;
            let customers = store.customers()?;
            PageReport::ExecutiveOverview {
                kpis: ExecutiveKpis::compute(&campaigns, customers.len()),
                revenue_by_channel: revenue_by_channel(&campaigns),
                revenue_trend: revenue_by_date(&campaigns),
            }
        }
        Page::CampaignAnalytics => {
            let campaigns = store.campaigns()?;
            PageReport::CampaignAnalytics {
                revenue_by_channel_and_date: revenue_by_channel_and_date(&campaigns),
                regional_revenue_by_quarter: regional_revenue_by_quarter(&campaigns),
                monthly_spend_by_campaign_type: monthly_spend_by_campaign_type(&campaigns),
            }
        }
        Page::CustomerInsights => {
            let customers = store.customers()?;
            let ages: Vec<f64> = customers.iter().map(|c| c.age).collect();
            PageReport::CustomerInsights {
                age_distribution: histogram(&ages, DEFAULT_AGE_BINS),
                ltv_by_segment: ltv_by_segment(&customers),
                income_vs_ltv: income_vs_ltv(&customers),
            }
        }
        Page::ProductPerformance => PageReport::ProductPerformance {
            hierarchy: product_hierarchy(&store.products()?),
        },
        Page::AttributionFunnel => PageReport::AttributionFunnel {
            model,
            attribution: attribution_shares(&store.attribution()?, model),
            funnel: funnel_conversion(&store.funnel()?),
        },
        Page::ModelEvaluation => PageReport::ModelEvaluation {
            evaluation: LeadEvaluation::from_records(&store.leads()?)?,
            feature_importance: rank_features(&store.features()?),
        },
    };
    Ok(report)
}

/// Plain-text rendering of a page report.
pub fn render(report: &PageReport) -> String {
    let mut output = String::new();

    match report {
        PageReport::ExecutiveOverview {
            kpis,
            revenue_by_channel,
            revenue_trend,
        } => {
            section(&mut output, "Executive Overview");
            output.push_str(&format!("Total Revenue:         ${:.2}\n", kpis.total_revenue));
            output.push_str(&format!("Total Conversions:     {}\n", kpis.total_conversions));
            output.push_str(&format!("Average ROAS:          {:.2}\n", kpis.average_roas));
            output.push_str(&format!("Total Customers:       {}\n", kpis.total_customers));
            output.push('\n');
            output.push_str("Revenue by Channel\n");
            for row in revenue_by_channel {
                output.push_str(&format!("  {:<20} {:>14.2}\n", row.channel, row.revenue));
            }
            if let (Some(first), Some(last)) = (revenue_trend.first(), revenue_trend.last()) {
                output.push_str(&format!(
                    "\nRevenue trend: {} days from {} to {}\n",
                    revenue_trend.len(),
                    first.date,
                    last.date
                ));
            }
        }
        PageReport::CampaignAnalytics {
            revenue_by_channel_and_date,
            regional_revenue_by_quarter,
            monthly_spend_by_campaign_type,
        } => {
            section(&mut output, "Campaign Analytics");
            output.push_str(&format!(
                "Channel/date revenue points: {}\n\n",
                revenue_by_channel_and_date.len()
            ));
            output.push_str("Regional Revenue by Quarter\n");
            for row in regional_revenue_by_quarter {
                output.push_str(&format!(
                    "  {:<16} {:<8} {:>14.2}\n",
                    row.region, row.quarter, row.revenue
                ));
            }
            output.push_str("\nMonthly Spend by Campaign Type\n");
            for row in monthly_spend_by_campaign_type {
                output.push_str(&format!(
                    "  {:<8} {:<20} {:>14.2}\n",
                    row.month, row.campaign_type, row.spend
                ));
            }
        }
        PageReport::CustomerInsights {
            age_distribution,
            ltv_by_segment,
            income_vs_ltv,
        } => {
            section(&mut output, "Customer Insights");
            output.push_str(&format!(
                "Customers: {} across {} age bins\n\n",
                income_vs_ltv.len(),
                age_distribution.len()
            ));
            output.push_str("Lifetime Value by Segment\n");
            output.push_str(&format!(
                "  {:<16} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
                "Segment", "Count", "Min", "Q1", "Median", "Q3", "Max"
            ));
            for s in ltv_by_segment {
                output.push_str(&format!(
                    "  {:<16} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}\n",
                    s.segment, s.ltv.count, s.ltv.min, s.ltv.q1, s.ltv.median, s.ltv.q3, s.ltv.max
                ));
            }
        }
        PageReport::ProductPerformance { hierarchy } => {
            section(&mut output, "Product Performance");
            for category in hierarchy {
                render_node(&mut output, category, 0);
            }
        }
        PageReport::AttributionFunnel {
            model,
            attribution,
            funnel,
        } => {
            section(&mut output, "Attribution & Funnel");
            output.push_str(&format!("Attribution model: {model}\n"));
            for row in attribution {
                output.push_str(&format!(
                    "  {:<20} {:>14.2} {:>7.1}%\n",
                    row.channel,
                    row.value,
                    row.share * 100.0
                ));
            }
            output.push_str("\nFunnel\n");
            for step in funnel {
                output.push_str(&format!(
                    "  {:<20} {:>12.0} {:>7.1}% of initial {:>7.1}% of previous\n",
                    step.stage, step.value, step.percent_of_initial, step.percent_of_previous
                ));
            }
        }
        PageReport::ModelEvaluation {
            evaluation,
            feature_importance,
        } => {
            section(&mut output, "Model Evaluation");
            let [[tn, fp], [fn_, tp]] = evaluation.confusion_matrix.as_matrix();
            output.push_str("Confusion Matrix (rows actual, columns predicted)\n");
            output.push_str(&format!("  {:>12} {:>10} {:>10}\n", "", "0", "1"));
            output.push_str(&format!("  {:>12} {:>10} {:>10}\n", "0", tn, fp));
            output.push_str(&format!("  {:>12} {:>10} {:>10}\n", "1", fn_, tp));
            output.push_str(&format!(
                "\nAccuracy:              {:.2}%\n",
                evaluation.confusion_matrix.accuracy() * 100.0
            ));
            output.push_str(&format!(
                "Precision:             {:.2}%\n",
                evaluation.confusion_matrix.precision() * 100.0
            ));
            output.push_str(&format!(
                "Recall:                {:.2}%\n",
                evaluation.confusion_matrix.recall() * 100.0
            ));
            output.push_str(&format!("ROC AUC:               {:.4}\n", evaluation.auc));
            output.push_str("\nFeature Importance\n");
            for f in feature_importance {
                output.push_str(&format!(
                    "  {:<24} {:>8.4} ± {:.4}\n",
                    f.feature, f.importance, f.std
                ));
            }
        }
    }

    output
}

fn section(output: &mut String, title: &str) {
    output.push('\n');
    output.push_str(title);
    output.push('\n');
    output.push_str(LINE);
}

fn render_node(output: &mut String, node: &ProductNode, depth: usize) {
    output.push_str(&format!(
        "{:indent$}{:<width$} {:>14.2} {:>7.1}%\n",
        "",
        node.label,
        node.sales,
        node.profit_margin * 100.0,
        indent = depth * 2,
        width = 30 - depth * 2,
    ));
    for child in &node.children {
        render_node(output, child, depth + 1);
    }
}

/// Runs the marketing command.
///
/// # Errors
/// Returns an error if an argument is invalid or an extract cannot be loaded.
/// A page whose metrics are undefined for the data is skipped with a notice.
pub fn run_marketing(args: MarketingArgs, config: &AppConfig) -> Result<()> {
    let pages = Page::parse_selection(&args.page)?;
    let model: AttributionModel = args
        .attribution_model
        .parse()
        .map_err(|e: String| anyhow!(e))?;

    let mut marketing = config.marketing.clone();
    if let Some(dir) = args.data_dir {
        marketing.data_dir = dir;
    }
    tracing::info!("Reading marketing extracts from {}", marketing.data_dir.display());

    let store = MarketingStore::new(marketing);
    let mut reports = Vec::with_capacity(pages.len());

    for page in pages {
        match build_page(page, &store, model) {
            Ok(report) => reports.push(report),
            Err(e @ AnalyticsError::UndefinedMetric { .. }) => {
                tracing::warn!("Skipping {}: {}", page, e);
                if !args.json {
                    println!("\n{page}: unavailable ({e})");
                }
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to build page {page}")),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print!("{}", render(report));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_parse_accepts_aliases() {
        assert_eq!("executive-overview".parse::<Page>().unwrap(), Page::ExecutiveOverview);
        assert_eq!("Products".parse::<Page>().unwrap(), Page::ProductPerformance);
        assert_eq!("funnel".parse::<Page>().unwrap(), Page::AttributionFunnel);
        assert!("geography".parse::<Page>().is_err());
    }

    #[test]
    fn page_display_roundtrip() {
        for page in Page::ALL {
            assert_eq!(page.to_string().parse::<Page>().unwrap(), page);
        }
    }

    #[test]
    fn page_selection_all_keeps_dashboard_order() {
        assert_eq!(Page::parse_selection("ALL").unwrap(), Page::ALL.to_vec());
        assert_eq!(
            Page::parse_selection("model_evaluation").unwrap(),
            vec![Page::ModelEvaluation]
        );
    }

    #[test]
    fn render_product_tree_indents_children() {
        let report = PageReport::ProductPerformance {
            hierarchy: vec![ProductNode {
                label: "Home".to_string(),
                sales: 100.0,
                profit_margin: 0.25,
                children: vec![ProductNode {
                    label: "Kitchen".to_string(),
                    sales: 100.0,
                    profit_margin: 0.25,
                    children: Vec::new(),
                }],
            }],
        };
        let text = render(&report);
        assert!(text.contains("Product Performance"));
        assert!(text.contains("\nHome "));
        assert!(text.contains("\n  Kitchen "));
        assert!(text.contains("25.0%"));
    }

    #[test]
    fn page_report_serializes_with_page_tag() {
        let report = PageReport::ProductPerformance { hierarchy: Vec::new() };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["page"], "product_performance");
    }
}
