use common::pricing::{PricingItem, PricingMetadata};
use mongodb::{Collection, Database, bson::doc};
use serde::{Deserialize, Serialize};

use crate::{constants::COLLECTION_PRICING_NAME, errors::StorageError};

/// One document per region holding its whole price table
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct PricingDocument {
    #[serde(rename = "_id")]
    pub(crate) region: String,
    pub(crate) items: Vec<PricingItem>,
    pub(crate) metadata: Option<PricingMetadata>,
}

pub(crate) struct PricingCollection {
    collection: Collection<PricingDocument>,
}

impl PricingCollection {
    pub(crate) fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<PricingDocument>(COLLECTION_PRICING_NAME),
        }
    }

    pub(crate) async fn find(&self, region: &str) -> Result<Option<PricingDocument>, StorageError> {
        Ok(self.collection.find_one(doc! { "_id": region }).await?)
    }

    pub(crate) async fn upsert(&self, document: &PricingDocument) -> Result<(), StorageError> {
        self.collection
            .replace_one(doc! { "_id": document.region.as_str() }, document)
            .upsert(true)
            .await?;

        Ok(())
    }
}
