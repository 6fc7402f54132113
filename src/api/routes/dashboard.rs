//! Dashboard summary endpoint

use axum::{Json, extract::State};

use crate::alerts::{self, DashboardSummary};
use crate::api::{error::ApiResult, state::ApiState};

/// GET /api/dashboard
///
/// Derives the dashboard data fresh from the latest metric per host and
/// the active thresholds. Alerts are never persisted; hosts without
/// metrics count towards `total_computers` but are excluded from alerts
/// and the CPU average.
pub async fn get_dashboard(State(state): State<ApiState>) -> ApiResult<Json<DashboardSummary>> {
    let snapshots = state.store.latest_snapshots().await?;
    let thresholds = *state.thresholds.read().await;

    Ok(Json(alerts::summarize(&snapshots, thresholds)))
}
