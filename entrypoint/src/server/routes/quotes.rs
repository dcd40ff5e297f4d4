use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use axum_extra::extract::WithRejection;
use common::{
    deserialize_disallow_empty_string::disallow_empty_string,
    quotes::{Quote, QuoteInput},
};
use serde::{Deserialize, Serialize};

use crate::{
    ServerState,
    routes::{error_message_erasure::ApiError, resolve_region},
    service_layers::EDIT_PASSWORD_HEADER,
};

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyPasswordPayload {
    #[serde(deserialize_with = "disallow_empty_string")]
    password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyPasswordResponse {
    valid: bool,
    message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageResponse {
    message: String,
}

pub(crate) async fn list_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<Quote>>, ApiError> {
    Ok(Json(state.quotes.list().await?))
}

pub(crate) async fn create_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Json(input), _): WithRejection<Json<QuoteInput>, ApiError>,
) -> Result<Json<Quote>, ApiError> {
    resolve_region(&input.region)?;

    Ok(Json(state.quotes.create(&input).await?))
}

pub(crate) async fn preview_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Json(input), _): WithRejection<Json<QuoteInput>, ApiError>,
) -> Result<Json<Quote>, ApiError> {
    resolve_region(&input.region)?;

    Ok(Json(state.quotes.preview(&input).await?))
}

pub(crate) async fn get_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<Quote>, ApiError> {
    Ok(Json(state.quotes.get(&id).await?))
}

pub(crate) async fn update_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Json(input), _): WithRejection<Json<QuoteInput>, ApiError>,
) -> Result<Json<Quote>, ApiError> {
    resolve_region(&input.region)?;

    Ok(Json(state.quotes.update(&id, &input).await?))
}

pub(crate) async fn delete_handler(
    headers: HeaderMap,
    State(state): State<Arc<ServerState>>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    let password = headers
        .get(EDIT_PASSWORD_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());

    state.quotes.delete(&id, password).await?;

    Ok(Json(MessageResponse {
        message: "Quote deleted successfully".into(),
    }))
}

pub(crate) async fn verify_password_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<VerifyPasswordPayload>, ApiError>,
) -> Result<Json<VerifyPasswordResponse>, ApiError> {
    let valid = state.quotes.verify_password(&id, &payload.password).await?;

    let message = match valid {
        true => "Password verified",
        false => "Invalid password",
    };

    Ok(Json(VerifyPasswordResponse {
        valid,
        message: message.into(),
    }))
}
