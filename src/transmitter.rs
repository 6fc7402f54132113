//! Sample transmission to the central collector
//!
//! One HTTP POST per sample, no retry: the agent loop is best-effort and
//! self-heals on its next tick, so failures are reported as a boolean and
//! logged rather than propagated.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::HostSample;

/// Bounded request timeout so a stalled connection cannot stall the
/// agent's polling loop indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Serializes samples to the wire format and posts them to the server.
#[derive(Debug, Clone)]
pub struct Transmitter {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl Transmitter {
    /// Create a transmitter for a server base URL
    /// (e.g. `http://192.168.1.176:5000`).
    pub fn new(server_url: &str, token: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            endpoint: format!("{}/api/metrics", server_url.trim_end_matches('/')),
            token,
        }
    }

    /// Send one sample. Returns true only on HTTP 200; any network failure,
    /// timeout or non-200 response yields false and is merely logged.
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    pub async fn send(&self, sample: &HostSample) -> bool {
        let mut request = self.client.post(&self.endpoint).json(sample);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                debug!("sample for {} accepted", sample.hostname);
                true
            }
            Ok(response) => {
                warn!("server rejected sample: HTTP {}", response.status());
                false
            }
            Err(e) => {
                warn!("failed to send sample: {e}");
                false
            }
        }
    }
}
