//! Storage backends for host and metric persistence
//!
//! This module provides a trait-based abstraction over the durable store
//! holding the `hosts` and `metrics` tables.
//!
//! ## Design
//!
//! - **Trait-based**: `MetricStore` allows swapping implementations
//! - **Async**: all operations are async for compatibility with the API layer
//! - **Append-only metrics**: metric rows are immutable once written; the
//!   monotonic `id` column is the recency ordering key
//!
//! ## Backends
//!
//! - **SQLite** (default): embedded database, enforces hostname uniqueness
//!   at the schema level so racing ingests cannot create duplicate hosts
//! - **PostgreSQL** (future)

pub mod backend;
pub mod error;
pub mod schema;
pub mod sqlite;

pub use backend::MetricStore;
pub use error::{StorageError, StorageResult};
pub use schema::{HostRow, HostSnapshot, MetricRow, MetricValues};
