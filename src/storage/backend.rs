//! Storage trait definition
//!
//! All durable stores (SQLite today, PostgreSQL some day) implement
//! `MetricStore`. Implementations must be `Send + Sync` as they are shared
//! across API handler tasks behind an `Arc`.

use async_trait::async_trait;

use super::error::StorageResult;
use super::schema::{HostRow, HostSnapshot, MetricRow, MetricValues};

/// Trait for the host registry and metric store
///
/// ## Invariants implementations must uphold
///
/// - `hostname` uniquely identifies a host; `ensure_host` must be safe under
///   concurrent calls with the same new hostname (unique constraint or
///   equivalent, not just application-level checks)
/// - the host row from `ensure_host` is committed before any subsequent
///   metric insert, so a host exists even if the metric insert fails
/// - metric rows are append-only; recency is defined by the monotonic `id`,
///   never by wall-clock timestamps
#[async_trait]
pub trait MetricStore: Send + Sync {
    /// Look up a host by hostname, creating it on first sighting.
    ///
    /// Idempotent: repeated (and racing) calls for the same hostname all
    /// resolve to the same single row.
    async fn ensure_host(&self, hostname: &str) -> StorageResult<HostRow>;

    /// Append one metric row for a host. `captured_at` is assigned here.
    async fn insert_metric(&self, host_id: i64, values: &MetricValues) -> StorageResult<MetricRow>;

    /// All registered hosts, oldest first.
    async fn list_hosts(&self) -> StorageResult<Vec<HostRow>>;

    /// Look up a single host by its hostname.
    async fn host_by_name(&self, hostname: &str) -> StorageResult<Option<HostRow>>;

    /// Every host paired with its most recently inserted metric.
    ///
    /// This is the dashboard/alert read path: one snapshot per host, hosts
    /// without metrics included with `latest = None`.
    async fn latest_snapshots(&self) -> StorageResult<Vec<HostSnapshot>>;

    /// The most recent `limit` metrics for a host, newest first.
    async fn recent_metrics(&self, host_id: i64, limit: usize) -> StorageResult<Vec<MetricRow>>;

    /// Administrative host removal; cascades to the host's metrics.
    /// Returns false if the host did not exist.
    async fn delete_host(&self, host_id: i64) -> StorageResult<bool>;

    /// Lightweight connectivity check.
    async fn health_check(&self) -> StorageResult<()>;

    /// Close the store and release resources.
    async fn close(&self) -> StorageResult<()>;
}
