use std::{collections::HashMap, sync::Arc};

use common::pricing::PricingItem;
use storage::{Store, errors::StorageError};
use tokio::sync::RwLock;
use tracing::debug;

/// Per-region price tables kept in memory in front of the store
pub struct PricingCache {
    store: Arc<dyn Store>,
    entries: RwLock<HashMap<String, Arc<Vec<PricingItem>>>>,
}

impl PricingCache {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, region: &str) -> Result<Arc<Vec<PricingItem>>, StorageError> {
        if let Some(items) = self.entries.read().await.get(region) {
            return Ok(items.clone());
        }

        let items = Arc::new(self.store.load_pricing(region).await?);

        // an empty table usually means a sync is still pending, check the store again next time
        if !items.is_empty() {
            debug!("Caching {} pricing items for {}", items.len(), region);
            self.entries
                .write()
                .await
                .insert(region.to_string(), items.clone());
        }

        Ok(items)
    }

    pub async fn invalidate(&self, region: &str) {
        self.entries.write().await.remove(region);
    }
}

#[cfg(test)]
mod tests {
    use common::{pricing::PricingMetadata, regions::default_region};
    use storage::FileStore;
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn serves_cached_table_until_invalidated() {
        let dir = tempdir().unwrap();
        let store: Arc<dyn Store> = Arc::new(FileStore::new(dir.path()));
        let cache = PricingCache::new(store.clone());
        let region = default_region();

        let first = vec![PricingItem::new("us1", "APM", "per APM host")];
        let metadata = PricingMetadata::new(region, 1, region.url);
        store.save_pricing("us1", &first, &metadata).await.unwrap();

        assert_eq!(cache.get("us1").await.unwrap().len(), 1);

        let second = vec![
            PricingItem::new("us1", "APM", "per APM host"),
            PricingItem::new("us1", "Infrastructure Pro", "per host"),
        ];
        store.save_pricing("us1", &second, &metadata).await.unwrap();

        assert_eq!(cache.get("us1").await.unwrap().len(), 1);

        cache.invalidate("us1").await;
        assert_eq!(cache.get("us1").await.unwrap().len(), 2);
    }
}
