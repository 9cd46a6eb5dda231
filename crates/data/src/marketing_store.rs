use crate::csv_storage::{CsvSchema, CsvStorage};
use crate::models::{
    CampaignRecord, ChannelAttributionRecord, CustomerRecord, FeatureImportanceRecord,
    FunnelStageRecord, LeadScoreRecord, ProductSalesRecord,
};
use crate::source_cache::SourceCache;
use bizdash_core::{MarketingConfig, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Cached access to the marketing extracts named in [`MarketingConfig`].
///
/// Each extract is read at most once per file modification, however many
/// report pages ask for it.
#[derive(Default)]
pub struct MarketingStore {
    config: MarketingConfig,
    campaigns: SourceCache<Vec<CampaignRecord>>,
    customers: SourceCache<Vec<CustomerRecord>>,
    products: SourceCache<Vec<ProductSalesRecord>>,
    leads: SourceCache<Vec<LeadScoreRecord>>,
    features: SourceCache<Vec<FeatureImportanceRecord>>,
    attribution: SourceCache<Vec<ChannelAttributionRecord>>,
    funnel: SourceCache<Vec<FunnelStageRecord>>,
}

impl MarketingStore {
    #[must_use]
    pub fn new(config: MarketingConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &MarketingConfig {
        &self.config
    }

    /// # Errors
    /// Returns an error if the campaign extract is missing or malformed.
    pub fn campaigns(&self) -> Result<Arc<Vec<CampaignRecord>>> {
        self.load(&self.campaigns, &self.config.campaigns)
    }

    /// # Errors
    /// Returns an error if the customer extract is missing or malformed.
    pub fn customers(&self) -> Result<Arc<Vec<CustomerRecord>>> {
        self.load(&self.customers, &self.config.customers)
    }

    /// # Errors
    /// Returns an error if the product extract is missing or malformed.
    pub fn products(&self) -> Result<Arc<Vec<ProductSalesRecord>>> {
        self.load(&self.products, &self.config.products)
    }

    /// # Errors
    /// Returns an error if the lead scoring extract is missing or malformed.
    pub fn leads(&self) -> Result<Arc<Vec<LeadScoreRecord>>> {
        self.load(&self.leads, &self.config.leads)
    }

    /// # Errors
    /// Returns an error if the feature importance extract is missing or malformed.
    pub fn features(&self) -> Result<Arc<Vec<FeatureImportanceRecord>>> {
        self.load(&self.features, &self.config.features)
    }

    /// # Errors
    /// Returns an error if the attribution extract is missing or malformed.
    pub fn attribution(&self) -> Result<Arc<Vec<ChannelAttributionRecord>>> {
        self.load(&self.attribution, &self.config.attribution)
    }

    /// # Errors
    /// Returns an error if the funnel extract is missing or malformed.
    pub fn funnel(&self) -> Result<Arc<Vec<FunnelStageRecord>>> {
        self.load(&self.funnel, &self.config.funnel)
    }

    fn load<T>(&self, cache: &SourceCache<Vec<T>>, file_name: &str) -> Result<Arc<Vec<T>>>
    where
        T: DeserializeOwned + CsvSchema,
    {
        cache.get_or_load(self.config.resolve(file_name), |path| {
            CsvStorage::read_records::<T>(path)
        })
    }
}
