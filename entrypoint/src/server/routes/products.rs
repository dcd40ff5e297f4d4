use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use common::pricing::{Plan, ProductSummary};
use serde::Deserialize;

use crate::{
    ServerState,
    routes::{default_region, error_message_erasure::ApiError, resolve_region},
};

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsQuery {
    #[serde(default = "default_region")]
    region: String,
    #[serde(default)]
    plan: Option<Plan>,
}

pub(crate) async fn products_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Query(query), _): WithRejection<Query<ProductsQuery>, ApiError>,
) -> Result<Json<Vec<ProductSummary>>, ApiError> {
    let region = resolve_region(&query.region)?;
    let plan = query.plan.unwrap_or_default();

    let products = state
        .pricing
        .get(region.id)
        .await?
        .iter()
        .filter(|item| item.plan.available_on(plan))
        .map(ProductSummary::from)
        .collect();

    Ok(Json(products))
}
