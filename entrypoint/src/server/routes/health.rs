use axum::{Json, response::IntoResponse};
use serde_json::json;

pub(crate) async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "message": "PriceHound API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub(crate) async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}
