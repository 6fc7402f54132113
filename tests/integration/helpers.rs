//! Shared helpers for integration tests

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use sysmonitor::{
    alerts::Thresholds,
    api::{ApiConfig, ApiState, spawn_api_server},
    storage::sqlite::SqliteStore,
};
use tempfile::TempDir;

/// A running API server backed by a throwaway SQLite file
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    _dir: TempDir,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with_token(None).await
    }

    pub async fn spawn_with_token(auth_token: Option<&str>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            SqliteStore::new(dir.path().join("test.db"))
                .await
                .unwrap(),
        );

        let state = ApiState::new(store, Thresholds::default());

        let config = ApiConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(), // random port
            auth_token: auth_token.map(String::from),
            enable_cors: true,
        };

        let addr = spawn_api_server(config, state).await.unwrap();

        Self {
            addr,
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a raw JSON value to the ingestion endpoint
    pub async fn post_sample(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/metrics"))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    /// Number of hosts the server currently knows about
    pub async fn host_count(&self) -> usize {
        let response = self
            .client
            .get(self.url("/api/hosts"))
            .send()
            .await
            .unwrap();
        let json: Value = response.json().await.unwrap();
        json["count"].as_u64().unwrap() as usize
    }

    /// Recent metrics for one host, newest first
    pub async fn host_metrics(&self, hostname: &str, limit: Option<usize>) -> reqwest::Response {
        let mut url = self.url(&format!("/api/hosts/{hostname}/metrics"));
        if let Some(limit) = limit {
            url = format!("{url}?limit={limit}");
        }
        self.client.get(url).send().await.unwrap()
    }

    pub async fn dashboard(&self) -> Value {
        self.client
            .get(self.url("/api/dashboard"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

/// A complete, in-range sample body for a given hostname
pub fn sample_body(hostname: &str, cpu: f64, ram: f64, disk: f64) -> Value {
    serde_json::json!({
        "hostname": hostname,
        "cpu": cpu,
        "ram": ram,
        "disk": disk,
        "processes": 100,
    })
}
