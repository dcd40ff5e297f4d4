pub mod allotments;
pub mod error_message_erasure;
pub mod health;
pub mod pricing;
pub mod products;
pub mod quotes;
pub mod regions;
pub mod templates;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use common::regions::{DEFAULT_REGION, Region, find_region};
use serde::Deserialize;

use crate::{
    ServerState, routes::error_message_erasure::ApiError,
    service_layers::build_service_layers,
};

pub(crate) fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

pub(crate) fn resolve_region(region: &str) -> Result<&'static Region, ApiError> {
    find_region(region).ok_or_else(|| ApiError::BadRequest(format!("Unknown region: {region}")))
}

/// `?region=`, defaulting to the primary region
#[derive(Debug, Deserialize)]
pub(crate) struct RegionQuery {
    #[serde(default = "default_region")]
    pub(crate) region: String,
}

impl RegionQuery {
    pub(crate) fn resolve(&self) -> Result<&'static Region, ApiError> {
        resolve_region(&self.region)
    }
}

pub fn build_router(state: Arc<ServerState>, cors_origin: Option<&str>) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/api/health", get(health::health_handler))
        .route("/api/regions", get(regions::regions_handler))
        .route("/api/regions/status", get(regions::regions_status_handler))
        .route("/api/pricing", get(pricing::pricing_handler))
        .route("/api/pricing/metadata", get(pricing::pricing_metadata_handler))
        .route("/api/pricing/sync", post(pricing::sync_handler))
        .route("/api/pricing/sync-all", post(pricing::sync_all_handler))
        .route("/api/products", get(products::products_handler))
        .route(
            "/api/quotes",
            get(quotes::list_handler).post(quotes::create_handler),
        )
        .route("/api/quotes/preview", post(quotes::preview_handler))
        .route(
            "/api/quotes/{id}",
            get(quotes::get_handler)
                .put(quotes::update_handler)
                .delete(quotes::delete_handler),
        )
        .route(
            "/api/quotes/{id}/verify-password",
            post(quotes::verify_password_handler),
        )
        .route("/api/allotments", get(allotments::allotments_handler))
        .route(
            "/api/allotments/metadata",
            get(allotments::allotments_metadata_handler),
        )
        .route(
            "/api/allotments/product/{name}",
            get(allotments::product_allotments_handler),
        )
        .route("/api/allotments/sync", post(allotments::sync_handler))
        .route("/api/allotments/init", post(allotments::init_handler))
        .route("/api/templates", get(templates::templates_handler))
        .route("/api/templates/{id}", get(templates::template_handler))
        .layer(build_service_layers(cors_origin))
        .with_state(state)
}
