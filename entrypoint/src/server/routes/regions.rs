use std::{collections::BTreeMap, sync::Arc};

use axum::{Json, extract::State};
use common::regions::{REGIONS, Region};
use serde::Serialize;

use crate::{ServerState, routes::error_message_erasure::ApiError};

#[derive(Serialize, Debug)]
pub(crate) struct RegionStatus {
    id: &'static str,
    name: &'static str,
    site: &'static str,
    synced: bool,
    last_sync: Option<String>,
    products_count: usize,
}

pub(crate) async fn regions_handler() -> Json<BTreeMap<&'static str, Region>> {
    Json(REGIONS.iter().map(|region| (region.id, *region)).collect())
}

pub(crate) async fn regions_status_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<RegionStatus>>, ApiError> {
    let mut statuses: Vec<RegionStatus> = Vec::with_capacity(REGIONS.len());

    for region in REGIONS.iter() {
        let metadata = state.store.load_pricing_metadata(region.id).await?;

        statuses.push(RegionStatus {
            id: region.id,
            name: region.name,
            site: region.site,
            synced: metadata.is_some(),
            products_count: metadata
                .as_ref()
                .map(|metadata| metadata.products_count)
                .unwrap_or_default(),
            last_sync: metadata.map(|metadata| metadata.last_sync),
        });
    }

    Ok(Json(statuses))
}
