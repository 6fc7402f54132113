use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::trace;

use crate::alerts::Thresholds;

/// Storage backend configuration
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// SQLite database (default)
    Sqlite {
        /// Path to the SQLite database file
        #[serde(default = "default_sqlite_path")]
        path: PathBuf,
    },
    // Future: PostgreSQL, etc.
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Sqlite {
            path: default_sqlite_path(),
        }
    }
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("./sysmonitor.db")
}

/// Server configuration, read from a JSON file.
///
/// Every field has a default, so the server also runs without a config file.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    /// Address the ingestion/read API binds to
    pub bind_addr: Option<SocketAddr>,

    /// Storage configuration (defaults to SQLite at ./sysmonitor.db)
    pub storage: Option<StorageConfig>,

    /// Optional bearer token guarding the read endpoints.
    /// Ingestion stays open regardless.
    pub auth_token: Option<String>,

    /// Initial alert thresholds for this deployment
    pub thresholds: Option<ThresholdsConfig>,
}

/// Alert threshold overrides (percent, clamped into [0, 100])
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct ThresholdsConfig {
    pub cpu: i64,
    pub ram: i64,
    pub disk: i64,
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or_else(default_bind_addr)
    }

    pub fn initial_thresholds(&self) -> Thresholds {
        self.thresholds
            .map(|t| Thresholds::clamped(t.cpu, t.ram, t.disk))
            .unwrap_or_default()
    }
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:5000".parse().expect("static address is valid")
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
