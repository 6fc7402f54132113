//! SQLite implementation of the `MetricStore` trait
//!
//! ## Features
//!
//! - **Embedded**: no separate database server required
//! - **WAL mode**: better concurrency for reads during writes
//! - **Connection pooling**: shared across API handler tasks
//! - **Migrations**: automatic schema versioning with sqlx
//!
//! The `hostname` UNIQUE constraint is what makes `ensure_host` safe under
//! racing ingests for the same new host: the losing insert becomes a no-op
//! and both callers resolve to the same row.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info, instrument};

use super::backend::MetricStore;
use super::error::{StorageError, StorageResult};
use super::schema::{HostRow, HostSnapshot, MetricRow, MetricValues};

/// SQLite-backed host registry and metric store
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if missing) the database file and run migrations.
    #[instrument(skip_all)]
    pub async fn new(db_path: impl AsRef<Path>) -> StorageResult<Self> {
        let db_path_str = db_path.as_ref().to_string_lossy().to_string();

        info!("initializing SQLite store at: {}", db_path_str);

        let options = SqliteConnectOptions::new()
            .filename(&db_path_str)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // FK enforcement is off by default in SQLite; the metric→host
            // cascade depends on it
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        debug!("running database migrations");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;

        info!("database migrations complete");

        Ok(Self { pool })
    }

    fn timestamp_to_millis(dt: &DateTime<Utc>) -> i64 {
        dt.timestamp_millis()
    }

    fn millis_to_timestamp(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
    }

    fn host_from_row(row: &sqlx::sqlite::SqliteRow) -> HostRow {
        HostRow {
            id: row.get("id"),
            hostname: row.get("hostname"),
            registered_at: Self::millis_to_timestamp(row.get("registered_at")),
        }
    }

    fn metric_from_row(row: &sqlx::sqlite::SqliteRow) -> MetricRow {
        MetricRow {
            id: row.get("id"),
            host_id: row.get("host_id"),
            cpu_percent: row.get("cpu_percent"),
            memory_percent: row.get("memory_percent"),
            disk_percent: row.get("disk_percent"),
            process_count: row.get("process_count"),
            captured_at: Self::millis_to_timestamp(row.get("captured_at")),
        }
    }
}

#[async_trait]
impl MetricStore for SqliteStore {
    #[instrument(skip(self))]
    async fn ensure_host(&self, hostname: &str) -> StorageResult<HostRow> {
        // Insert-or-ignore plus lookup. The UNIQUE constraint resolves the
        // check-then-insert race: of N concurrent calls with the same new
        // hostname, exactly one insert wins and all callers read that row.
        // This statement commits on its own, so the host exists even if a
        // following metric insert fails.
        sqlx::query(
            "INSERT INTO hosts (hostname, registered_at) VALUES (?, ?) \
             ON CONFLICT (hostname) DO NOTHING",
        )
        .bind(hostname)
        .bind(Self::timestamp_to_millis(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        let row = sqlx::query("SELECT id, hostname, registered_at FROM hosts WHERE hostname = ?")
            .bind(hostname)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(Self::host_from_row(&row))
    }

    #[instrument(skip(self, values))]
    async fn insert_metric(&self, host_id: i64, values: &MetricValues) -> StorageResult<MetricRow> {
        let captured_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO metrics \
             (host_id, cpu_percent, memory_percent, disk_percent, process_count, captured_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(host_id)
        .bind(values.cpu_percent)
        .bind(values.memory_percent)
        .bind(values.disk_percent)
        .bind(values.process_count)
        .bind(Self::timestamp_to_millis(&captured_at))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(MetricRow {
            id: result.last_insert_rowid(),
            host_id,
            cpu_percent: values.cpu_percent,
            memory_percent: values.memory_percent,
            disk_percent: values.disk_percent,
            process_count: values.process_count,
            captured_at,
        })
    }

    #[instrument(skip(self))]
    async fn list_hosts(&self) -> StorageResult<Vec<HostRow>> {
        let rows = sqlx::query("SELECT id, hostname, registered_at FROM hosts ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(rows.iter().map(Self::host_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn host_by_name(&self, hostname: &str) -> StorageResult<Option<HostRow>> {
        let row = sqlx::query("SELECT id, hostname, registered_at FROM hosts WHERE hostname = ?")
            .bind(hostname)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(row.as_ref().map(Self::host_from_row))
    }

    #[instrument(skip(self))]
    async fn latest_snapshots(&self) -> StorageResult<Vec<HostSnapshot>> {
        // Latest metric = max(id) per host, never wall-clock. Hosts without
        // metrics are included with a NULL metric side.
        let rows = sqlx::query(
            "SELECT h.id AS host_pk, h.hostname, h.registered_at, \
                    m.id, m.host_id, m.cpu_percent, m.memory_percent, \
                    m.disk_percent, m.process_count, m.captured_at \
             FROM hosts h \
             LEFT JOIN metrics m ON m.host_id = h.id \
                 AND m.id = (SELECT MAX(id) FROM metrics WHERE host_id = h.id) \
             ORDER BY h.id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        let snapshots = rows
            .into_iter()
            .map(|row| {
                let host = HostRow {
                    id: row.get("host_pk"),
                    hostname: row.get("hostname"),
                    registered_at: Self::millis_to_timestamp(row.get("registered_at")),
                };

                let latest = row
                    .get::<Option<i64>, _>("id")
                    .map(|_| Self::metric_from_row(&row));

                HostSnapshot { host, latest }
            })
            .collect();

        Ok(snapshots)
    }

    #[instrument(skip(self))]
    async fn recent_metrics(&self, host_id: i64, limit: usize) -> StorageResult<Vec<MetricRow>> {
        let rows = sqlx::query(
            "SELECT id, host_id, cpu_percent, memory_percent, disk_percent, \
                    process_count, captured_at \
             FROM metrics \
             WHERE host_id = ? \
             ORDER BY id DESC \
             LIMIT ?",
        )
        .bind(host_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(rows.iter().map(Self::metric_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn delete_host(&self, host_id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM hosts WHERE id = ?")
            .bind(host_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        info!("closing SQLite store");
        self.pool.close().await;
        Ok(())
    }
}
