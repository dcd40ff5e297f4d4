use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use common::{allotments::Allotment, utils::names_match};
use scrapers::manual_allotments::manual_allotments;
use serde::Serialize;
use serde_json::{Value, json};

use crate::{ServerState, routes::error_message_erasure::ApiError, sync::AllotmentsOutcome};

#[derive(Serialize, Debug)]
pub(crate) struct InitResponse {
    success: bool,
    message: String,
}

pub(crate) async fn allotments_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<Allotment>>, ApiError> {
    let stored = state.store.load_allotments().await?;

    Ok(Json(match stored.is_empty() {
        true => manual_allotments(),
        false => stored,
    }))
}

pub(crate) async fn allotments_metadata_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Value>, ApiError> {
    let metadata = match state.store.load_allotments_metadata().await? {
        Some(metadata) => serde_json::to_value(metadata)
            .map_err(|err| ApiError::Internal(err.to_string()))?,
        None => json!({}),
    };

    Ok(Json(metadata))
}

pub(crate) async fn product_allotments_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Path(name), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<Vec<Allotment>>, ApiError> {
    let for_product = |allotments: Vec<Allotment>| {
        allotments
            .into_iter()
            .filter(|allotment| names_match(&allotment.parent_product, &name))
            .collect::<Vec<Allotment>>()
    };

    let stored = for_product(state.store.load_allotments().await?);

    Ok(Json(match stored.is_empty() {
        true => for_product(manual_allotments()),
        false => stored,
    }))
}

pub(crate) async fn sync_handler(State(state): State<Arc<ServerState>>) -> Json<AllotmentsOutcome> {
    Json(state.sync.sync_allotments().await)
}

pub(crate) async fn init_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<InitResponse>, ApiError> {
    let count = state.sync.init_allotments().await?;

    Ok(Json(InitResponse {
        success: true,
        message: format!("Initialized {count} manual allotments"),
    }))
}
