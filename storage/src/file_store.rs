use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use common::{
    allotments::{Allotment, AllotmentsMetadata},
    pricing::{PricingItem, PricingMetadata},
    quotes::Quote,
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    constants::{ALLOTMENTS_FILE, ALLOTMENTS_METADATA_FILE, PRICING_DIR, QUOTES_DIR},
    errors::StorageError,
    traits::Store,
};

const QUOTE_FILE_PREFIX: &str = "quote-";

/// JSON documents on local disk
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn pricing_path(&self, region: &str) -> Result<PathBuf, StorageError> {
        Ok(self
            .data_dir
            .join(PRICING_DIR)
            .join(format!("pricing-{}.json", checked_id(region)?)))
    }

    fn pricing_metadata_path(&self, region: &str) -> Result<PathBuf, StorageError> {
        Ok(self
            .data_dir
            .join(PRICING_DIR)
            .join(format!("metadata-{}.json", checked_id(region)?)))
    }

    fn quotes_dir(&self) -> PathBuf {
        self.data_dir.join(QUOTES_DIR)
    }

    fn quote_path(&self, id: &str) -> Result<PathBuf, StorageError> {
        Ok(self
            .quotes_dir()
            .join(format!("{QUOTE_FILE_PREFIX}{}.json", checked_id(id)?)))
    }
}

/// Ids end up in file names, keep them to letters, digits and dashes
fn checked_id(id: &str) -> Result<&str, StorageError> {
    match !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        true => Ok(id),
        false => Err(StorageError::InvalidId(id.to_string())),
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    Ok(Some(serde_json::from_str(&contents)?))
}

/// Each write gets its own sibling temp file, so concurrent saves of one document never share it
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document");

    path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()))
}

/// Writes next to the target then renames, readers never see half a document
async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = temp_path_for(path);
    let contents = serde_json::to_string_pretty(value)?;

    fs::write(&temp_path, contents).await?;

    if let Err(err) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(err.into());
    }

    debug!("Wrote {}", path.display());

    Ok(())
}

#[async_trait]
impl Store for FileStore {
    async fn load_pricing(&self, region: &str) -> Result<Vec<PricingItem>, StorageError> {
        Ok(read_json(&self.pricing_path(region)?)
            .await?
            .unwrap_or_default())
    }

    async fn load_pricing_metadata(
        &self,
        region: &str,
    ) -> Result<Option<PricingMetadata>, StorageError> {
        read_json(&self.pricing_metadata_path(region)?).await
    }

    async fn save_pricing(
        &self,
        region: &str,
        items: &[PricingItem],
        metadata: &PricingMetadata,
    ) -> Result<(), StorageError> {
        write_json(&self.pricing_path(region)?, items).await?;
        write_json(&self.pricing_metadata_path(region)?, metadata).await
    }

    async fn load_allotments(&self) -> Result<Vec<Allotment>, StorageError> {
        Ok(read_json(&self.data_dir.join(ALLOTMENTS_FILE))
            .await?
            .unwrap_or_default())
    }

    async fn load_allotments_metadata(&self) -> Result<Option<AllotmentsMetadata>, StorageError> {
        read_json(&self.data_dir.join(ALLOTMENTS_METADATA_FILE)).await
    }

    async fn save_allotments(
        &self,
        allotments: &[Allotment],
        metadata: &AllotmentsMetadata,
    ) -> Result<(), StorageError> {
        write_json(&self.data_dir.join(ALLOTMENTS_FILE), allotments).await?;
        write_json(&self.data_dir.join(ALLOTMENTS_METADATA_FILE), metadata).await
    }

    async fn insert_quote(&self, quote: &Quote) -> Result<(), StorageError> {
        write_json(&self.quote_path(&quote.id)?, quote).await
    }

    async fn get_quote(&self, id: &str) -> Result<Option<Quote>, StorageError> {
        read_json(&self.quote_path(id)?).await
    }

    async fn replace_quote(&self, quote: &Quote) -> Result<bool, StorageError> {
        let path = self.quote_path(&quote.id)?;

        if !fs::try_exists(&path).await? {
            return Ok(false);
        }

        write_json(&path, quote).await?;

        Ok(true)
    }

    async fn delete_quote(&self, id: &str) -> Result<bool, StorageError> {
        match fs::remove_file(self.quote_path(id)?).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn list_quotes(&self) -> Result<Vec<Quote>, StorageError> {
        let mut entries = match fs::read_dir(self.quotes_dir()).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut quotes: Vec<Quote> = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_quote_file = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(QUOTE_FILE_PREFIX) && name.ends_with(".json"));

            if !is_quote_file {
                continue;
            }

            match read_json::<Quote>(&path).await {
                Ok(Some(quote)) => quotes.push(quote),
                Ok(None) => {}
                Err(err) => warn!("Skipping unreadable quote {}: {err}", path.display()),
            }
        }

        quotes.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use common::{
        allotments::AllotmentSource,
        billing::BillingType,
        regions::{ALLOTMENTS_URL, find_region},
    };
    use tempfile::tempdir;

    use super::*;

    fn quote(id: &str, created_at: &str) -> Quote {
        Quote {
            id: id.into(),
            name: format!("Quote {id}"),
            region: "us1".into(),
            billing_type: BillingType::Annually,
            items: Vec::new(),
            total: 0.0,
            total_annually: 0.0,
            total_monthly: 0.0,
            total_on_demand: 0.0,
            savings_vs_monthly: 0.0,
            savings_vs_on_demand: 0.0,
            created_at: created_at.into(),
            updated_at: created_at.into(),
            edit_password_hash: None,
            is_protected: false,
        }
    }

    #[tokio::test]
    async fn missing_documents_read_as_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.load_pricing("us1").await.unwrap().is_empty());
        assert!(store.load_pricing_metadata("us1").await.unwrap().is_none());
        assert!(store.load_allotments().await.unwrap().is_empty());
        assert!(store.get_quote("abc").await.unwrap().is_none());
        assert!(store.list_quotes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pricing_is_stored_per_region() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let region = find_region("eu1").unwrap();

        let items = vec![PricingItem::new("eu1", "APM", "per APM host")];
        let metadata = PricingMetadata::new(region, items.len(), region.url);

        store.save_pricing("eu1", &items, &metadata).await.unwrap();

        assert!(dir.path().join("pricing/pricing-eu1.json").exists());
        assert!(dir.path().join("pricing/metadata-eu1.json").exists());
        assert_eq!(store.load_pricing("eu1").await.unwrap(), items);
        assert!(store.load_pricing("us1").await.unwrap().is_empty());
        assert_eq!(
            store.load_pricing_metadata("eu1").await.unwrap().unwrap().products_count,
            1
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_of_one_document_all_succeed() {
        let dir = tempdir().unwrap();
        let store = std::sync::Arc::new(FileStore::new(dir.path()));
        let region = find_region("us1").unwrap();

        let items = (0..2000)
            .map(|n| PricingItem::new("us1", format!("Product {n}"), "per host"))
            .collect::<Vec<PricingItem>>();
        let metadata = PricingMetadata::new(region, items.len(), region.url);

        let tasks = (0..16)
            .map(|_| {
                let store = store.clone();
                let items = items.clone();
                let metadata = metadata.clone();
                tokio::spawn(async move { store.save_pricing("us1", &items, &metadata).await })
            })
            .collect::<Vec<_>>();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.load_pricing("us1").await.unwrap().len(), 2000);

        let leftovers = std::fs::read_dir(dir.path().join("pricing"))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn allotments_round_trip_with_metadata() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let allotments = vec![Allotment::new("APM", "Indexed Spans", 1_000_000, "indexed spans")];
        let metadata = AllotmentsMetadata::new(1, AllotmentSource::Manual, ALLOTMENTS_URL);

        store.save_allotments(&allotments, &metadata).await.unwrap();

        assert_eq!(store.load_allotments().await.unwrap(), allotments);
        assert_eq!(
            store.load_allotments_metadata().await.unwrap().unwrap().source,
            AllotmentSource::Manual
        );
    }

    #[tokio::test]
    async fn quotes_replace_delete_and_list_newest_first() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.insert_quote(&quote("older", "2025-01-01T00:00:00.000Z")).await.unwrap();
        store.insert_quote(&quote("newer", "2025-02-01T00:00:00.000Z")).await.unwrap();

        let ids = store
            .list_quotes()
            .await
            .unwrap()
            .into_iter()
            .map(|quote| quote.id)
            .collect::<Vec<String>>();
        assert_eq!(ids, vec!["newer", "older"]);

        let mut renamed = quote("older", "2025-01-01T00:00:00.000Z");
        renamed.name = "Renamed".into();
        assert!(store.replace_quote(&renamed).await.unwrap());
        assert!(!store.replace_quote(&quote("missing", "")).await.unwrap());
        assert_eq!(store.get_quote("older").await.unwrap().unwrap().name, "Renamed");

        assert!(store.delete_quote("older").await.unwrap());
        assert!(!store.delete_quote("older").await.unwrap());
        assert_eq!(store.list_quotes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn broken_quote_files_are_skipped() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.insert_quote(&quote("good", "2025-01-01T00:00:00.000Z")).await.unwrap();
        std::fs::write(dir.path().join("quotes/quote-bad.json"), "{not json").unwrap();
        std::fs::write(dir.path().join("quotes/notes.txt"), "ignored").unwrap();

        let quotes = store.list_quotes().await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].id, "good");
    }

    #[tokio::test]
    async fn path_like_ids_are_rejected() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(
            store.get_quote("../secrets").await,
            Err(StorageError::InvalidId(_))
        ));
        assert!(matches!(
            store.load_pricing("us1/../../etc").await,
            Err(StorageError::InvalidId(_))
        ));
    }
}
