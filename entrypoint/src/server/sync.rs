use std::{sync::Arc, time::Duration};

use common::{
    allotments::{Allotment, AllotmentSource, AllotmentsMetadata},
    pricing::PricingMetadata,
    regions::{ALLOTMENTS_URL, DEFAULT_REGION, REGIONS, Region, find_region},
};
use futures::future::join_all;
use metrics::put_metric;
use quote_engine::find_product_id_by_name;
use scrapers::{
    AllotmentsPageScraper, PricingPageScraper, ScrapeClient,
    manual_allotments::manual_allotments,
};
use serde::Serialize;
use storage::{Store, errors::StorageError};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{error, info, warn};

use crate::cache::PricingCache;

const SECONDS_PER_HOUR: u64 = 60 * 60;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SyncOutcome {
    pub region: String,
    pub success: bool,
    pub message: String,
    pub products_count: usize,
}

impl SyncOutcome {
    fn failed(region: &str, message: impl Into<String>) -> Self {
        Self {
            region: region.to_string(),
            success: false,
            message: message.into(),
            products_count: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AllotmentsOutcome {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

/// Keeps the stored price tables and allotment rules in step with the vendor pages
pub struct SyncService {
    store: Arc<dyn Store>,
    cache: Arc<PricingCache>,
    client: ScrapeClient,
    pricing_url: Option<String>,
    allotments_url: Option<String>,
}

impl SyncService {
    pub fn new(store: Arc<dyn Store>, cache: Arc<PricingCache>, client: ScrapeClient) -> Self {
        Self {
            store,
            cache,
            client,
            pricing_url: None,
            allotments_url: None,
        }
    }

    pub fn with_pricing_url(mut self, url: Option<String>) -> Self {
        self.pricing_url = url;
        self
    }

    pub fn with_allotments_url(mut self, url: Option<String>) -> Self {
        self.allotments_url = url;
        self
    }

    fn pricing_scraper(&self, region: &'static Region) -> PricingPageScraper {
        let scraper = PricingPageScraper::new(region);

        match &self.pricing_url {
            Some(url) => scraper.with_url(url.clone()),
            None => scraper,
        }
    }

    fn allotments_source_url(&self) -> String {
        self.allotments_url
            .clone()
            .unwrap_or_else(|| ALLOTMENTS_URL.to_string())
    }

    pub async fn sync_pricing(&self, region_id: &str) -> SyncOutcome {
        let Some(region) = find_region(region_id) else {
            return SyncOutcome::failed(region_id, format!("Unknown region: {region_id}"));
        };

        let scraper = self.pricing_scraper(region);

        let items = match self.client.scrape(&scraper).await {
            Ok(items) => items,
            Err(err) => {
                error!("Pricing sync for {} failed: {err}", region.id);
                put_metric!(Metrics::PricingSyncFailed, 1, "region" => region.id);
                return SyncOutcome::failed(region.id, format!("Error syncing pricing: {err}"));
            }
        };

        if items.is_empty() {
            warn!("No pricing rows found for {}", region.id);
            put_metric!(Metrics::PricingSyncFailed, 1, "region" => region.id);
            return SyncOutcome::failed(region.id, "No pricing data found");
        }

        let metadata = PricingMetadata::new(region, items.len(), scraper.url());

        if let Err(err) = self.store.save_pricing(region.id, &items, &metadata).await {
            error!("Failed to store pricing for {}: {err}", region.id);
            put_metric!(Metrics::PricingSyncFailed, 1, "region" => region.id);
            return SyncOutcome::failed(region.id, "Failed to store pricing data");
        }

        self.cache.invalidate(region.id).await;
        put_metric!(Metrics::PricingSynced, 1, "region" => region.id);

        info!("Synced {} products for {}", items.len(), region.id);

        SyncOutcome {
            region: region.id.to_string(),
            success: true,
            message: format!(
                "Successfully synced {} products for {}",
                items.len(),
                region.name
            ),
            products_count: items.len(),
        }
    }

    pub async fn sync_all_regions(&self) -> Vec<SyncOutcome> {
        join_all(REGIONS.iter().map(|region| self.sync_pricing(region.id))).await
    }

    /// Loads what is stored, only scraping when the region has never been synced
    pub async fn ensure_pricing(&self, region_id: &str) -> SyncOutcome {
        let Some(region) = find_region(region_id) else {
            return SyncOutcome::failed(region_id, format!("Unknown region: {region_id}"));
        };

        match self.store.load_pricing(region.id).await {
            Ok(items) if !items.is_empty() => SyncOutcome {
                region: region.id.to_string(),
                success: true,
                message: format!("Loaded {} products for {}", items.len(), region.name),
                products_count: items.len(),
            },
            Ok(_) => self.sync_pricing(region.id).await,
            Err(err) => {
                warn!("Stored pricing for {} unreadable, re-syncing: {err}", region.id);
                self.sync_pricing(region.id).await
            }
        }
    }

    /// Fills in pricing ids for rules whose product names match a price row exactly
    async fn enrich_ids(&self, allotments: &mut [Allotment]) {
        let pricing = match self.cache.get(DEFAULT_REGION).await {
            Ok(pricing) => pricing,
            Err(err) => {
                warn!("Cannot enrich allotments without pricing: {err}");
                return;
            }
        };

        for allotment in allotments.iter_mut() {
            allotment.parent_product_id = find_product_id_by_name(&pricing, &allotment.parent_product);
            allotment.allotted_product_id =
                find_product_id_by_name(&pricing, &allotment.allotted_product);
        }
    }

    async fn save_manual_allotments(&self) -> Result<usize, StorageError> {
        let mut allotments = manual_allotments();
        self.enrich_ids(&mut allotments).await;

        let metadata = AllotmentsMetadata::new(
            allotments.len(),
            AllotmentSource::Manual,
            self.allotments_source_url(),
        );

        self.store.save_allotments(&allotments, &metadata).await?;

        Ok(allotments.len())
    }

    pub async fn sync_allotments(&self) -> AllotmentsOutcome {
        let scraper = AllotmentsPageScraper::new().with_url(self.allotments_source_url());

        let scraped = match self.client.scrape(&scraper).await {
            Ok(allotments) if !allotments.is_empty() => Some(allotments),
            Ok(_) => {
                warn!("Allotments page had no usable rows");
                None
            }
            Err(err) => {
                warn!("Allotments scrape failed: {err}");
                None
            }
        };

        let Some(mut allotments) = scraped else {
            return match self.save_manual_allotments().await {
                Ok(count) => {
                    put_metric!(Metrics::AllotmentsSynced, 1, "source" => "manual");
                    AllotmentsOutcome {
                        success: true,
                        message: format!("Using manual allotments data ({count} items)"),
                        count,
                    }
                }
                Err(err) => {
                    error!("Failed to store manual allotments: {err}");
                    AllotmentsOutcome {
                        success: false,
                        message: "Failed to store allotments data".into(),
                        count: 0,
                    }
                }
            };
        };

        self.enrich_ids(&mut allotments).await;

        let metadata =
            AllotmentsMetadata::new(allotments.len(), AllotmentSource::Scraped, scraper.url());

        if let Err(err) = self.store.save_allotments(&allotments, &metadata).await {
            error!("Failed to store allotments: {err}");
            return AllotmentsOutcome {
                success: false,
                message: "Failed to store allotments data".into(),
                count: 0,
            };
        }

        put_metric!(Metrics::AllotmentsSynced, 1, "source" => "scraped");

        AllotmentsOutcome {
            success: true,
            message: format!("Successfully synced {} allotments", allotments.len()),
            count: allotments.len(),
        }
    }

    pub async fn init_allotments(&self) -> Result<usize, StorageError> {
        let count = self.save_manual_allotments().await?;
        info!("Initialized {count} manual allotments");

        Ok(count)
    }

    /// Syncs allotments only when none are stored yet
    pub async fn ensure_allotments(&self) -> AllotmentsOutcome {
        match self.store.load_allotments().await {
            Ok(allotments) if !allotments.is_empty() => AllotmentsOutcome {
                success: true,
                message: format!("Loaded {} allotments", allotments.len()),
                count: allotments.len(),
            },
            _ => self.sync_allotments().await,
        }
    }

    /// Re-syncs every region and the allotments on a fixed interval, disabled when `hours` is 0
    pub fn spawn_periodic(self: Arc<Self>, hours: u64) -> Option<JoinHandle<()>> {
        if hours == 0 {
            info!("Periodic sync disabled");
            return None;
        }

        let period = Duration::from_secs(hours.saturating_mul(SECONDS_PER_HOUR));

        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // the first tick completes immediately, startup already synced
            interval.tick().await;

            loop {
                interval.tick().await;

                info!("Starting periodic sync");

                let outcomes = self.sync_all_regions().await;
                let synced = outcomes.iter().filter(|outcome| outcome.success).count();
                info!("Periodic sync refreshed {synced}/{} regions", outcomes.len());

                let allotments = self.sync_allotments().await;
                info!("{}", allotments.message);
            }
        }))
    }
}
