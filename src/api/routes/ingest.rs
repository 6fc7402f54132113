//! Metric ingestion endpoint

use axum::{Json, body::Bytes, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::api::{
    error::{ApiError, ApiResult},
    state::ApiState,
};
use crate::storage::MetricValues;

/// Incoming sample body. Everything except the hostname is optional; absent
/// numeric fields are stored as NULL rather than defaulted.
#[derive(Debug, Deserialize)]
pub struct MetricsPayload {
    hostname: Option<String>,
    cpu: Option<f64>,
    ram: Option<f64>,
    disk: Option<f64>,
    processes: Option<u32>,
}

/// POST /api/metrics
///
/// Validation order: the body must decode as JSON (`400 invalid json`),
/// then the hostname must be present and non-empty (`400 hostname
/// required`). The host row is committed before the metric insert, so a
/// host exists even if the metric write fails. No authentication is
/// enforced here; a bearer header is simply accepted.
#[instrument(skip_all)]
pub async fn ingest_metrics(State(state): State<ApiState>, body: Bytes) -> ApiResult<Json<Value>> {
    let payload: MetricsPayload = serde_json::from_slice(&body)
        .map_err(|_| ApiError::InvalidRequest("invalid json".to_string()))?;

    let hostname = payload
        .hostname
        .as_deref()
        .filter(|hostname| !hostname.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("hostname required".to_string()))?;

    let host = state.store.ensure_host(hostname).await?;

    let values = MetricValues {
        cpu_percent: payload.cpu,
        memory_percent: payload.ram,
        disk_percent: payload.disk,
        process_count: payload.processes.map(i64::from),
    };

    let metric = state.store.insert_metric(host.id, &values).await?;

    debug!("ingested metric {} for host {}", metric.id, host.hostname);

    Ok(Json(json!({ "status": "ok" })))
}
