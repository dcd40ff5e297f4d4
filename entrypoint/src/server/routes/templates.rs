use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use common::templates::Template;

use crate::{ServerState, routes::error_message_erasure::ApiError};

pub(crate) async fn templates_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<Template>>, ApiError> {
    Ok(Json(state.templates.list().await?))
}

pub(crate) async fn template_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<Template>, ApiError> {
    state
        .templates
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Template not found".into()))
}
