use std::sync::Arc;

use clap::Parser;
use sysmonitor::{
    api::{ApiConfig, ApiState, spawn_api_server},
    config::{Config, StorageConfig, read_config_file},
    storage::{MetricStore, sqlite::SqliteStore},
};
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file
    #[arg(short)]
    file: Option<String>,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("sysmonitor", LevelFilter::TRACE),
        ("sysmonitor_server", LevelFilter::TRACE),
        ("tower_http", LevelFilter::DEBUG),
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

    let config = match &args.file {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    let StorageConfig::Sqlite { path } = config.storage.clone().unwrap_or_default();
    let store = Arc::new(SqliteStore::new(&path).await?);

    let state = ApiState::new(store.clone(), config.initial_thresholds());

    let api_config = ApiConfig {
        bind_addr: config.bind_addr(),
        auth_token: config.auth_token.clone(),
        enable_cors: true,
    };

    let addr = spawn_api_server(api_config, state).await?;
    info!("sysmonitor server ready on {addr}");

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    store.close().await?;

    Ok(())
}
