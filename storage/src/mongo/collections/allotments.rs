use common::allotments::{Allotment, AllotmentsMetadata};
use mongodb::{Collection, Database, bson::doc};
use serde::{Deserialize, Serialize};

use crate::{constants::COLLECTION_ALLOTMENTS_NAME, errors::StorageError};

const ALLOTMENTS_DOCUMENT_ID: &str = "allotments";

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AllotmentsDocument {
    #[serde(rename = "_id")]
    id: String,
    pub(crate) items: Vec<Allotment>,
    pub(crate) metadata: Option<AllotmentsMetadata>,
}

impl AllotmentsDocument {
    pub(crate) fn new(items: Vec<Allotment>, metadata: AllotmentsMetadata) -> Self {
        Self {
            id: ALLOTMENTS_DOCUMENT_ID.into(),
            items,
            metadata: Some(metadata),
        }
    }
}

pub(crate) struct AllotmentsCollection {
    collection: Collection<AllotmentsDocument>,
}

impl AllotmentsCollection {
    pub(crate) fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<AllotmentsDocument>(COLLECTION_ALLOTMENTS_NAME),
        }
    }

    pub(crate) async fn find(&self) -> Result<Option<AllotmentsDocument>, StorageError> {
        Ok(self
            .collection
            .find_one(doc! { "_id": ALLOTMENTS_DOCUMENT_ID })
            .await?)
    }

    pub(crate) async fn upsert(&self, document: &AllotmentsDocument) -> Result<(), StorageError> {
        self.collection
            .replace_one(doc! { "_id": ALLOTMENTS_DOCUMENT_ID }, document)
            .upsert(true)
            .await?;

        Ok(())
    }
}
