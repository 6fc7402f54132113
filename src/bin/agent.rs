use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use sysmonitor::agent::{self, AgentConfig, DEFAULT_INTERVAL_SECS};
use tracing::{error, info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Base URL of the collector server
    #[arg(short, long, default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Seconds between collection cycles
    #[arg(short, long, default_value_t = DEFAULT_INTERVAL_SECS)]
    interval: u64,

    /// Optional bearer token sent with each sample
    #[arg(short, long)]
    token: Option<String>,

    /// Collect and print a single sample, then exit
    #[arg(long)]
    once: bool,
}

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new().with_targets(vec![
        ("sysmonitor", LevelFilter::TRACE),
        ("sysmonitor_agent", LevelFilter::TRACE),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    if args.once {
        let sample = tokio::task::spawn_blocking(sysmonitor::collector::collect).await??;
        println!("{}", serde_json::to_string_pretty(&sample)?);
        return Ok(());
    }

    let config = AgentConfig {
        server_url: args.server,
        interval_secs: args.interval,
        token: args.token,
    };

    let stop = Arc::new(AtomicBool::new(false));

    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("failed to listen for shutdown signal: {e}");
                return;
            }
            info!("shutdown signal received");
            stop.store(true, Ordering::Relaxed);
        });
    }

    agent::run(config, stop).await;

    Ok(())
}
