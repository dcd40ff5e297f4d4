use async_trait::async_trait;
use common::{
    allotments::{Allotment, AllotmentsMetadata},
    pricing::{PricingItem, PricingMetadata},
    quotes::Quote,
};

use crate::errors::StorageError;

/// Persistence for price tables, allotment rules and saved quotes.
///
/// Missing documents are not errors: loaders return an empty list or `None`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn load_pricing(&self, region: &str) -> Result<Vec<PricingItem>, StorageError>;

    async fn load_pricing_metadata(
        &self,
        region: &str,
    ) -> Result<Option<PricingMetadata>, StorageError>;

    async fn save_pricing(
        &self,
        region: &str,
        items: &[PricingItem],
        metadata: &PricingMetadata,
    ) -> Result<(), StorageError>;

    async fn load_allotments(&self) -> Result<Vec<Allotment>, StorageError>;

    async fn load_allotments_metadata(&self) -> Result<Option<AllotmentsMetadata>, StorageError>;

    async fn save_allotments(
        &self,
        allotments: &[Allotment],
        metadata: &AllotmentsMetadata,
    ) -> Result<(), StorageError>;

    async fn insert_quote(&self, quote: &Quote) -> Result<(), StorageError>;

    async fn get_quote(&self, id: &str) -> Result<Option<Quote>, StorageError>;

    /// Returns false when there was no quote with that id
    async fn replace_quote(&self, quote: &Quote) -> Result<bool, StorageError>;

    /// Returns false when there was no quote with that id
    async fn delete_quote(&self, id: &str) -> Result<bool, StorageError>;

    /// Newest first
    async fn list_quotes(&self) -> Result<Vec<Quote>, StorageError>;
}
