use std::sync::Arc;

use crawler::unprotected::UnprotectedCrawler;
use scrapers::ScrapeClient;
use storage::{FileStore, MongoStore, Store, TemplateLibrary};
use tracing::info;

use crate::{
    cache::PricingCache,
    config::{Config, StorageType},
    errors::StartupError,
    quotes::QuoteService,
    sync::SyncService,
};

pub struct ServerState {
    pub store: Arc<dyn Store>,
    pub pricing: Arc<PricingCache>,
    pub sync: Arc<SyncService>,
    pub quotes: QuoteService,
    pub templates: TemplateLibrary,
}

impl ServerState {
    /// `build_sync` receives the shared store and cache the sync service must write through
    pub fn with_sync(
        store: Arc<dyn Store>,
        templates: TemplateLibrary,
        build_sync: impl FnOnce(Arc<dyn Store>, Arc<PricingCache>) -> SyncService,
    ) -> Self {
        let pricing = Arc::new(PricingCache::new(store.clone()));
        let sync = Arc::new(build_sync(store.clone(), pricing.clone()));
        let quotes = QuoteService::new(store.clone(), pricing.clone());

        Self {
            store,
            pricing,
            sync,
            quotes,
            templates,
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self, StartupError> {
        let store: Arc<dyn Store> = match config.storage_type {
            StorageType::File => {
                info!("Using file storage in {}", config.data_dir.display());
                Arc::new(FileStore::new(&config.data_dir))
            }
            StorageType::Mongodb => {
                info!(
                    "Using MongoDB storage at {}:{}",
                    config.mongo_db_host, config.mongo_db_port
                );
                Arc::new(MongoStore::new(&config.mongo_db_host, config.mongo_db_port).await?)
            }
        };

        let client = ScrapeClient::new(UnprotectedCrawler::new()?);
        let templates = TemplateLibrary::new(&config.templates_dir);

        Ok(Self::with_sync(store, templates, |store, cache| {
            SyncService::new(store, cache, client)
                .with_pricing_url(config.pricing_url.clone())
                .with_allotments_url(config.allotments_url.clone())
        }))
    }
}
