use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use common::pricing::PricingItem;
use serde::Serialize;
use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::debug;

use crate::{
    ServerState,
    routes::{RegionQuery, error_message_erasure::ApiError},
    sync::SyncOutcome,
};

#[derive(Serialize, Debug)]
pub(crate) struct SyncAllResponse {
    results: Vec<SyncOutcome>,
}

pub(crate) async fn pricing_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Query(query), _): WithRejection<Query<RegionQuery>, ApiError>,
) -> Result<Json<Vec<PricingItem>>, ApiError> {
    let region = query.resolve()?;
    let items = state.pricing.get(region.id).await?;

    Ok(Json(items.as_ref().clone()))
}

pub(crate) async fn pricing_metadata_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Query(query), _): WithRejection<Query<RegionQuery>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let region = query.resolve()?;

    let metadata = match state.store.load_pricing_metadata(region.id).await? {
        Some(metadata) => serde_json::to_value(metadata)
            .map_err(|err| ApiError::Internal(err.to_string()))?,
        None => json!({}),
    };

    Ok(Json(metadata))
}

pub(crate) async fn sync_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Query(query), _): WithRejection<Query<RegionQuery>, ApiError>,
) -> Result<Json<SyncOutcome>, ApiError> {
    let region = query.resolve()?;
    let start_time = Instant::now();

    let outcome = state.sync.sync_pricing(region.id).await;

    debug!("Sync time: {}ms", start_time.elapsed().as_millis());

    Ok(Json(outcome))
}

pub(crate) async fn sync_all_handler(
    State(state): State<Arc<ServerState>>,
) -> Json<SyncAllResponse> {
    let start_time = Instant::now();

    let results = state.sync.sync_all_regions().await;

    debug!("Sync all time: {}ms", start_time.elapsed().as_millis());

    Json(SyncAllResponse { results })
}
