//! Shared state passed to all API handlers

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::alerts::Thresholds;
use crate::storage::MetricStore;

/// Shared state behind every handler.
///
/// Thresholds are deployment-scoped and ephemeral: they live in memory
/// only and reset to their configured defaults on restart.
#[derive(Clone)]
pub struct ApiState {
    /// Durable host registry and metric store
    pub store: Arc<dyn MetricStore>,

    /// Active alert thresholds
    pub thresholds: Arc<RwLock<Thresholds>>,
}

impl ApiState {
    pub fn new(store: Arc<dyn MetricStore>, initial_thresholds: Thresholds) -> Self {
        Self {
            store,
            thresholds: Arc::new(RwLock::new(initial_thresholds)),
        }
    }
}
