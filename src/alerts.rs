//! Threshold evaluation for the dashboard read path
//!
//! Alerts are derived fresh on every read from the latest metric per host;
//! they are never persisted. Evaluation is pure: callers pass in the host
//! snapshots and the active thresholds, and get back the alert list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::schema::HostSnapshot;

pub const DEFAULT_CPU_THRESHOLD: u8 = 85;
pub const DEFAULT_RAM_THRESHOLD: u8 = 80;
pub const DEFAULT_DISK_THRESHOLD: u8 = 90;

/// Per-deployment alert thresholds (percent, always within [0, 100])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub cpu: u8,
    pub ram: u8,
    pub disk: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu: DEFAULT_CPU_THRESHOLD,
            ram: DEFAULT_RAM_THRESHOLD,
            disk: DEFAULT_DISK_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Build thresholds from raw integers, silently clamping each value
    /// into [0, 100]. Out-of-range input is never rejected.
    pub fn clamped(cpu: i64, ram: i64, disk: i64) -> Self {
        Self {
            cpu: cpu.clamp(0, 100) as u8,
            ram: ram.clamp(0, 100) as u8,
            disk: disk.clamp(0, 100) as u8,
        }
    }
}

/// A derived alert for one host. Computed at read time, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub hostname: String,
    pub message: String,
    /// `captured_at` of the metric that triggered the alert
    pub observed_at: DateTime<Utc>,
}

/// Evaluate every host's latest metric against the thresholds.
///
/// Hosts without any metric are skipped entirely. Each of the three checks
/// is independent and inclusive (`>=`); fired fragments are joined with
/// `"; "` in the fixed order disk, ram, cpu. Percentages are truncated for
/// display, not rounded. Missing (null) values never fire.
pub fn evaluate(snapshots: &[HostSnapshot], thresholds: Thresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for snapshot in snapshots {
        let Some(metric) = &snapshot.latest else {
            continue;
        };

        let mut fragments = Vec::new();

        if let Some(disk) = metric.disk_percent {
            if disk >= thresholds.disk as f64 {
                fragments.push(format!("Disk: {}% full", disk.trunc() as i64));
            }
        }

        if let Some(ram) = metric.memory_percent {
            if ram >= thresholds.ram as f64 {
                fragments.push(format!("High RAM usage: {}%", ram.trunc() as i64));
            }
        }

        if let Some(cpu) = metric.cpu_percent {
            if cpu >= thresholds.cpu as f64 {
                fragments.push(format!("High CPU usage: {}%", cpu.trunc() as i64));
            }
        }

        if !fragments.is_empty() {
            alerts.push(Alert {
                hostname: snapshot.host.hostname.clone(),
                message: fragments.join("; "),
                observed_at: metric.captured_at,
            });
        }
    }

    alerts
}

/// Truncated mean of the latest CPU readings across all hosts.
///
/// Hosts without metrics and metrics without a CPU value are excluded from
/// the mean entirely (they do not count as zero). Returns 0 when no host
/// qualifies.
pub fn average_cpu(snapshots: &[HostSnapshot]) -> i64 {
    let values: Vec<f64> = snapshots
        .iter()
        .filter_map(|s| s.latest.as_ref())
        .filter_map(|m| m.cpu_percent)
        .collect();

    if values.is_empty() {
        return 0;
    }

    (values.iter().sum::<f64>() / values.len() as f64).trunc() as i64
}

/// Computed dashboard data: host count, alert summary and active thresholds
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_computers: usize,
    pub problems_count: usize,
    pub avg_cpu: i64,
    pub alerts: Vec<Alert>,
    pub thresholds: Thresholds,
}

pub fn summarize(snapshots: &[HostSnapshot], thresholds: Thresholds) -> DashboardSummary {
    let alerts = evaluate(snapshots, thresholds);

    DashboardSummary {
        total_computers: snapshots.len(),
        problems_count: alerts.len(),
        avg_cpu: average_cpu(snapshots),
        alerts,
        thresholds,
    }
}
