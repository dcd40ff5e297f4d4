use common::quotes::Quote;
use mongodb::{
    Collection, Database, IndexModel,
    bson::doc,
    options::IndexOptions,
};
use tracing::{debug, warn};

use crate::{constants::COLLECTION_QUOTES_NAME, errors::StorageError};

const INDEX_NAME: &str = "quote_id";

pub(crate) struct QuotesCollection {
    collection: Collection<Quote>,
}

impl QuotesCollection {
    pub(crate) async fn new(db: &Database) -> Result<Self, StorageError> {
        let collection = db.collection::<Quote>(COLLECTION_QUOTES_NAME);

        Self::create_index(&collection).await?;

        Ok(Self { collection })
    }

    async fn create_index(collection: &Collection<Quote>) -> Result<(), StorageError> {
        let index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .name(INDEX_NAME.to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        collection.create_index(index).await?;

        Ok(())
    }

    pub(crate) async fn insert(&self, quote: &Quote) -> Result<(), StorageError> {
        self.collection.insert_one(quote).await?;

        Ok(())
    }

    pub(crate) async fn find(&self, id: &str) -> Result<Option<Quote>, StorageError> {
        Ok(self.collection.find_one(doc! { "id": id }).await?)
    }

    pub(crate) async fn replace(&self, quote: &Quote) -> Result<bool, StorageError> {
        let result = self
            .collection
            .replace_one(doc! { "id": quote.id.as_str() }, quote)
            .await?;

        Ok(result.matched_count > 0)
    }

    pub(crate) async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        Ok(result.deleted_count > 0)
    }

    pub(crate) async fn list(&self) -> Result<Vec<Quote>, StorageError> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await?;

        let mut results: Vec<Quote> = Vec::new();

        while cursor.advance().await? {
            match cursor.deserialize_current() {
                Ok(quote) => results.push(quote),
                Err(err) => warn!("Skipping unreadable quote document: {err}"),
            }
        }

        debug!("Listed {} quotes", results.len());

        Ok(results)
    }
}
