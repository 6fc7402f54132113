//! HTTP surface of the collector server
//!
//! ## Architecture
//!
//! - **Axum** web framework with Tower middleware
//! - **Shared `ApiState`** holding the metric store and active thresholds
//! - **Open ingestion, optionally gated reads**: `POST /api/metrics` never
//!   requires authentication; the read endpoints are protected by a bearer
//!   token when one is configured
//!
//! ## Endpoints
//!
//! - `POST /api/metrics` - Ingest one host sample
//! - `GET /api/health` - Health check
//! - `GET /api/dashboard` - Alert summary for the dashboard
//! - `GET /api/hosts` - List registered hosts with latest metrics
//! - `GET /api/hosts/{hostname}/metrics` - Recent metric history
//! - `GET /api/thresholds` / `POST /api/thresholds` - Threshold config

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::ApiState;

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use tracing::info;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g. "0.0.0.0:5000")
    pub bind_addr: SocketAddr,

    /// Optional token guarding the read endpoints
    pub auth_token: Option<String>,

    /// Enable CORS for external dashboards
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".parse().unwrap(),
            auth_token: None,
            enable_cors: true,
        }
    }
}

/// Spawn the API server
///
/// Starts an Axum HTTP server in a background task and returns the bound
/// local address (useful with port 0 in tests).
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    info!("starting API server on {}", config.bind_addr);

    // Read surface, bearer-gated when a token is configured
    let mut read_routes: Router<ApiState> = Router::new()
        .route("/api/dashboard", get(routes::dashboard::get_dashboard))
        .route("/api/hosts", get(routes::hosts::list_hosts))
        .route(
            "/api/hosts/:hostname/metrics",
            get(routes::hosts::get_host_metrics),
        )
        .route(
            "/api/thresholds",
            get(routes::thresholds::get_thresholds).post(routes::thresholds::set_thresholds),
        );

    if let Some(token) = config.auth_token.clone() {
        read_routes = read_routes.layer(axum::middleware::from_fn_with_state(
            token,
            middleware::auth::auth_middleware,
        ));
    }

    // Ingestion and health stay open regardless of the token
    let mut app = Router::new()
        .route("/api/metrics", post(routes::ingest::ingest_metrics))
        .route("/api/health", get(routes::health::health_check))
        .merge(read_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}
