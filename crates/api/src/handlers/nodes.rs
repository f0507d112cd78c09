//! Handlers for node heartbeats and fleet resource views.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use ced_core::node::{NodeResourceStats, RegionFilter, REGION_CODE_ALL};
use ced_core::validation;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /resources/node_stats`.
#[derive(Debug, Deserialize)]
pub struct NodeStatsQuery {
    /// `0` (or absent) for every region, `1` Cloud, `2` Edge, `3` Device.
    pub region: Option<u8>,
}

/// POST /api/v1/node/heartbeat
///
/// Store the reported snapshot as the node's latest state and echo it back.
pub async fn heartbeat(
    State(state): State<AppState>,
    Json(stats): Json<NodeResourceStats>,
) -> AppResult<impl IntoResponse> {
    validation::validate_node_stats(&stats)?;

    tracing::debug!(node_id = %stats.node_id, region = ?stats.region, "Heartbeat received");
    state
        .manager
        .update_node_stats(&stats.node_id, stats.clone())
        .await;

    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/node/{node_id}
pub async fn get_node(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let stats = state.manager.get_node_stats(&node_id).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/resources/stats
///
/// Fleet-wide totals plus the cached training workload.
pub async fn resource_overview(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let overview = state.manager.get_resource_overview().await;
    Ok(Json(DataResponse { data: overview }))
}

/// GET /api/v1/resources/node_stats?region=
pub async fn list_nodes(
    State(state): State<AppState>,
    Query(params): Query<NodeStatsQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = RegionFilter::try_from(params.region.unwrap_or(REGION_CODE_ALL))?;
    let nodes = state.manager.list_node_stats(filter).await;
    Ok(Json(DataResponse { data: nodes }))
}
