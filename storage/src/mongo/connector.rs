use async_trait::async_trait;
use common::{
    allotments::{Allotment, AllotmentsMetadata},
    pricing::{PricingItem, PricingMetadata},
    quotes::Quote,
};
use mongodb::Client;
use tracing::info;

use crate::{
    constants::DATABASE_NAME,
    errors::StorageError,
    mongo::collections::{
        allotments::{AllotmentsCollection, AllotmentsDocument},
        pricing::{PricingCollection, PricingDocument},
        quotes::QuotesCollection,
    },
    traits::Store,
};

pub struct MongoStore {
    // mongodb structs are already Arc, thread safe
    pricing: PricingCollection,
    allotments: AllotmentsCollection,
    quotes: QuotesCollection,
}

impl MongoStore {
    pub async fn new(host: &str, port: u16) -> Result<Self, StorageError> {
        Self::with_uri(&format!("mongodb://{host}:{port}")).await
    }

    pub async fn with_uri(uri: &str) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(DATABASE_NAME);

        info!("Connected to MongoDB database {DATABASE_NAME}");

        Ok(Self {
            pricing: PricingCollection::new(&db),
            allotments: AllotmentsCollection::new(&db),
            quotes: QuotesCollection::new(&db).await?,
        })
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn load_pricing(&self, region: &str) -> Result<Vec<PricingItem>, StorageError> {
        Ok(self
            .pricing
            .find(region)
            .await?
            .map(|document| document.items)
            .unwrap_or_default())
    }

    async fn load_pricing_metadata(
        &self,
        region: &str,
    ) -> Result<Option<PricingMetadata>, StorageError> {
        Ok(self
            .pricing
            .find(region)
            .await?
            .and_then(|document| document.metadata))
    }

    async fn save_pricing(
        &self,
        region: &str,
        items: &[PricingItem],
        metadata: &PricingMetadata,
    ) -> Result<(), StorageError> {
        self.pricing
            .upsert(&PricingDocument {
                region: region.to_string(),
                items: items.to_vec(),
                metadata: Some(metadata.clone()),
            })
            .await
    }

    async fn load_allotments(&self) -> Result<Vec<Allotment>, StorageError> {
        Ok(self
            .allotments
            .find()
            .await?
            .map(|document| document.items)
            .unwrap_or_default())
    }

    async fn load_allotments_metadata(&self) -> Result<Option<AllotmentsMetadata>, StorageError> {
        Ok(self
            .allotments
            .find()
            .await?
            .and_then(|document| document.metadata))
    }

    async fn save_allotments(
        &self,
        allotments: &[Allotment],
        metadata: &AllotmentsMetadata,
    ) -> Result<(), StorageError> {
        self.allotments
            .upsert(&AllotmentsDocument::new(
                allotments.to_vec(),
                metadata.clone(),
            ))
            .await
    }

    async fn insert_quote(&self, quote: &Quote) -> Result<(), StorageError> {
        self.quotes.insert(quote).await
    }

    async fn get_quote(&self, id: &str) -> Result<Option<Quote>, StorageError> {
        self.quotes.find(id).await
    }

    async fn replace_quote(&self, quote: &Quote) -> Result<bool, StorageError> {
        self.quotes.replace(quote).await
    }

    async fn delete_quote(&self, id: &str) -> Result<bool, StorageError> {
        self.quotes.delete(id).await
    }

    async fn list_quotes(&self) -> Result<Vec<Quote>, StorageError> {
        self.quotes.list().await
    }
}
