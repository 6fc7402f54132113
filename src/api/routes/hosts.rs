//! Host listing and per-host metric history endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::{
    error::{ApiError, ApiResult},
    state::ApiState,
};

/// Default number of metrics returned by the history endpoint
const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Upper bound for the history limit
const MAX_HISTORY_LIMIT: usize = 1000;

/// GET /api/hosts
///
/// All registered hosts with their latest metric (null for hosts that have
/// not reported yet)
pub async fn list_hosts(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    let snapshots = state.store.latest_snapshots().await?;

    Ok(Json(json!({
        "count": snapshots.len(),
        "hosts": snapshots,
    })))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    limit: Option<usize>,
}

/// GET /api/hosts/:hostname/metrics
///
/// The most recent N metrics for one host, newest first (ordered by the
/// monotonic insertion key, not wall-clock)
pub async fn get_host_metrics(
    State(state): State<ApiState>,
    Path(hostname): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Value>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);

    let host = state
        .store
        .host_by_name(&hostname)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("unknown host: {hostname}")))?;

    let metrics = state.store.recent_metrics(host.id, limit).await?;

    Ok(Json(json!({
        "host": host,
        "count": metrics.len(),
        "metrics": metrics,
    })))
}
