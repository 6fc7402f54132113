//! Row types for the hosts and metrics tables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::HostSample;

/// A monitored machine, identified by its reported hostname.
///
/// Created on the first ingested sample bearing an unseen hostname and never
/// updated afterwards. `registered_at` is set once at first sighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRow {
    pub id: i64,
    pub hostname: String,
    pub registered_at: DateTime<Utc>,
}

/// One timestamped measurement snapshot for a host.
///
/// Append-only: rows are never mutated after insert and only disappear via
/// cascade when their host is deleted. `id` is the server-assigned,
/// monotonically increasing recency key; `captured_at` is assigned by the
/// server at insert time (wall-clock, display only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub id: i64,
    pub host_id: i64,
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
    pub disk_percent: Option<f64>,
    pub process_count: Option<i64>,
    pub captured_at: DateTime<Utc>,
}

/// Values for one metric insert. Absent fields are stored as NULL, never
/// defaulted to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricValues {
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
    pub disk_percent: Option<f64>,
    pub process_count: Option<i64>,
}

impl From<&HostSample> for MetricValues {
    fn from(sample: &HostSample) -> Self {
        Self {
            cpu_percent: Some(sample.cpu),
            memory_percent: Some(sample.ram),
            disk_percent: Some(sample.disk),
            process_count: Some(sample.processes as i64),
        }
    }
}

/// A host together with its most recently inserted metric (by `id`).
///
/// `latest` is `None` for hosts that have not reported any metric yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostSnapshot {
    pub host: HostRow,
    pub latest: Option<MetricRow>,
}
