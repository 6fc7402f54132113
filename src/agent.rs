//! The agent's collect → send → sleep loop
//!
//! A single task owns the loop. Collection blocks for its CPU sampling
//! window, so it runs on the blocking thread pool. The loop is
//! cooperatively stoppable via a flag checked once per iteration; there is
//! no cancellation finer than "finish the current cycle, then stop".

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task;
use tracing::{debug, error, info, instrument, warn};

use crate::{collector, transmitter::Transmitter};

pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Agent-side configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Base URL of the collector server (e.g. `http://127.0.0.1:5000`)
    pub server_url: String,

    /// Seconds to sleep between cycles
    pub interval_secs: u64,

    /// Optional bearer token forwarded with each sample
    pub token: Option<String>,
}

/// Run the agent loop until `stop` is set.
///
/// Every cycle is best-effort: collection or transmission failures are
/// logged and the loop self-heals on the next tick. Never panics, never
/// returns an error mid-loop.
#[instrument(skip_all, fields(server = %config.server_url))]
pub async fn run(config: AgentConfig, stop: Arc<AtomicBool>) {
    let transmitter = Transmitter::new(&config.server_url, config.token.clone());
    let interval = Duration::from_secs(config.interval_secs);

    info!(
        "starting agent loop (interval: {}s)",
        config.interval_secs
    );

    loop {
        if stop.load(Ordering::Relaxed) {
            info!("stop requested, finishing agent loop");
            break;
        }

        // collection blocks for its sampling window
        let sample = task::spawn_blocking(collector::collect).await;

        match sample {
            Ok(Ok(sample)) => {
                let delivered = transmitter.send(&sample).await;
                debug!("cycle complete (delivered: {delivered})");
            }
            Ok(Err(e)) => {
                warn!("failed to collect sample: {e}");
            }
            Err(e) => {
                error!("collector task panicked: {e}");
            }
        }

        tokio::time::sleep(interval).await;
    }
}
