pub mod agent;
pub mod alerts;
pub mod api;
pub mod collector;
pub mod config;
pub mod storage;
pub mod transmitter;

use serde::{Deserialize, Serialize};

/// One host measurement snapshot, as produced by the collector and shipped
/// over the wire to `POST /api/metrics`.
///
/// Field names match the wire format: `cpu`/`ram`/`disk` are percentages in
/// [0, 100], `processes` is the number of running processes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostSample {
    pub hostname: String,
    pub cpu: f64,
    pub ram: f64,
    pub disk: f64,
    pub processes: u32,
}
