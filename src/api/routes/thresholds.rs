//! Threshold configuration endpoints

use axum::{
    Form, Json,
    extract::State,
};
use serde::Deserialize;

use crate::alerts::Thresholds;
use crate::api::state::ApiState;

/// GET /api/thresholds
///
/// Returns the active thresholds (the defaults if never set)
pub async fn get_thresholds(State(state): State<ApiState>) -> Json<Thresholds> {
    Json(*state.thresholds.read().await)
}

/// Form-encoded threshold update, field names matching the settings form
#[derive(Debug, Deserialize)]
pub struct ThresholdForm {
    pub cpu_threshold: i64,
    pub ram_threshold: i64,
    pub disk_threshold: i64,
}

/// POST /api/thresholds
///
/// Each value is silently clamped into [0, 100]; nothing is rejected.
/// The update is ephemeral and resets on server restart.
pub async fn set_thresholds(
    State(state): State<ApiState>,
    Form(form): Form<ThresholdForm>,
) -> Json<Thresholds> {
    let thresholds = Thresholds::clamped(
        form.cpu_threshold,
        form.ram_threshold,
        form.disk_threshold,
    );

    *state.thresholds.write().await = thresholds;

    Json(thresholds)
}
