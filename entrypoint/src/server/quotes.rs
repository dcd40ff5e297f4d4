use std::sync::Arc;

use common::{
    allotments::Allotment,
    quotes::{MAX_QUANTITY, Quote, QuoteInput},
    regions::find_region,
    utils::iso_timestamp,
};
use metrics::put_metric;
use quote_engine::QuoteCalculator;
use scrapers::manual_allotments::manual_allotments;
use storage::Store;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    cache::PricingCache,
    errors::ServiceError,
    password::{hash_password, verify_password},
};

const DEFAULT_NAME_ID_CHARS: usize = 8;

// bcrypt blocks for a noticeable while, run it on the blocking pool
async fn hash_in_background(password: String) -> Result<String, ServiceError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| ServiceError::PasswordHash(err.to_string()))?
        .map_err(|err| ServiceError::PasswordHash(err.to_string()))
}

async fn verify_in_background(password: &str, stored: &str) -> bool {
    let (password, stored) = (password.to_string(), stored.to_string());

    tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .unwrap_or(false)
}

pub struct QuoteService {
    store: Arc<dyn Store>,
    cache: Arc<PricingCache>,
}

impl QuoteService {
    pub fn new(store: Arc<dyn Store>, cache: Arc<PricingCache>) -> Self {
        Self { store, cache }
    }

    async fn allotments(&self) -> Result<Vec<Allotment>, ServiceError> {
        let stored = self.store.load_allotments().await?;

        Ok(match stored.is_empty() {
            true => manual_allotments(),
            false => stored,
        })
    }

    /// Prices the input without storing anything, id and timestamps are left blank
    pub async fn preview(&self, input: &QuoteInput) -> Result<Quote, ServiceError> {
        let region = find_region(&input.region)
            .ok_or_else(|| ServiceError::UnknownRegion(input.region.clone()))?;

        if let Some(item) = input.items.iter().find(|item| item.quantity > MAX_QUANTITY) {
            return Err(ServiceError::QuantityTooLarge(item.quantity));
        }

        let pricing = self.cache.get(region.id).await?;
        let allotments = self.allotments().await?;

        let calculation =
            QuoteCalculator::new(&pricing, &allotments).calculate(input.billing_type, &input.items);

        let mut quote = Quote {
            id: String::new(),
            name: input.name.clone().unwrap_or_default(),
            region: region.id.to_string(),
            billing_type: input.billing_type,
            items: calculation.items,
            total: 0.0,
            total_annually: 0.0,
            total_monthly: 0.0,
            total_on_demand: 0.0,
            savings_vs_monthly: 0.0,
            savings_vs_on_demand: 0.0,
            created_at: String::new(),
            updated_at: String::new(),
            edit_password_hash: None,
            is_protected: false,
        };
        quote.set_totals(calculation.totals);

        Ok(quote)
    }

    pub async fn create(&self, input: &QuoteInput) -> Result<Quote, ServiceError> {
        let mut quote = self.preview(input).await?;
        let id = Uuid::new_v4().to_string();
        let now = iso_timestamp();

        quote.name = input
            .name
            .clone()
            .unwrap_or_else(|| format!("Quote {}", &id[..DEFAULT_NAME_ID_CHARS]));
        quote.id = id;
        quote.created_at = now.clone();
        quote.updated_at = now;
        quote.edit_password_hash = match input.edit_password.clone() {
            Some(password) => Some(hash_in_background(password).await?),
            None => None,
        };
        quote.is_protected = quote.edit_password_hash.is_some();

        self.store.insert_quote(&quote).await?;

        put_metric!(Metrics::QuoteCreated, 1, "region" => quote.region.clone());
        info!("Created quote {} ({} items)", quote.id, quote.items.len());

        Ok(quote.redacted())
    }

    /// Anything that isn't a UUID can't name a stored quote
    async fn load(&self, id: &str) -> Result<Quote, ServiceError> {
        if Uuid::parse_str(id).is_err() {
            debug!("Rejecting malformed quote id {id:?}");
            return Err(ServiceError::QuoteNotFound(id.to_string()));
        }

        self.store
            .get_quote(id)
            .await?
            .ok_or_else(|| ServiceError::QuoteNotFound(id.to_string()))
    }

    async fn check_password(quote: &Quote, password: Option<&str>) -> Result<(), ServiceError> {
        let Some(stored) = quote.edit_password_hash.as_deref() else {
            return Ok(());
        };

        let valid = match password {
            Some(password) => verify_in_background(password, stored).await,
            None => false,
        };

        match valid {
            true => Ok(()),
            false => {
                put_metric!(Metrics::QuotePasswordRejected, 1);
                Err(ServiceError::InvalidPassword)
            }
        }
    }

    pub async fn get(&self, id: &str) -> Result<Quote, ServiceError> {
        Ok(self.load(id).await?.redacted())
    }

    pub async fn list(&self) -> Result<Vec<Quote>, ServiceError> {
        Ok(self
            .store
            .list_quotes()
            .await?
            .into_iter()
            .map(Quote::redacted)
            .collect())
    }

    pub async fn update(&self, id: &str, input: &QuoteInput) -> Result<Quote, ServiceError> {
        let existing = self.load(id).await?;
        Self::check_password(&existing, input.edit_password.as_deref()).await?;

        let mut quote = self.preview(input).await?;

        quote.id = existing.id;
        quote.name = input.name.clone().unwrap_or(existing.name);
        quote.created_at = existing.created_at;
        quote.updated_at = iso_timestamp();
        quote.edit_password_hash = existing.edit_password_hash;
        quote.is_protected = existing.is_protected;

        if !self.store.replace_quote(&quote).await? {
            return Err(ServiceError::QuoteNotFound(id.to_string()));
        }

        put_metric!(Metrics::QuoteUpdated, 1, "region" => quote.region.clone());
        info!("Updated quote {}", quote.id);

        Ok(quote.redacted())
    }

    pub async fn delete(&self, id: &str, password: Option<&str>) -> Result<(), ServiceError> {
        let existing = self.load(id).await?;
        Self::check_password(&existing, password).await?;

        if !self.store.delete_quote(id).await? {
            return Err(ServiceError::QuoteNotFound(id.to_string()));
        }

        put_metric!(Metrics::QuoteDeleted, 1);
        info!("Deleted quote {id}");

        Ok(())
    }

    /// Unprotected quotes accept any password
    pub async fn verify_password(&self, id: &str, password: &str) -> Result<bool, ServiceError> {
        let quote = self.load(id).await?;

        Ok(match quote.edit_password_hash.as_deref() {
            Some(stored) => verify_in_background(password, stored).await,
            None => true,
        })
    }
}
