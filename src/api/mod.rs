//! HTTP server exposing the gauges for scraping
//!
//! ## Endpoints
//!
//! - `GET /metrics` - Prometheus text exposition of every zone gauge
//!
//! No other routes exist.

pub mod error;
pub mod routes;

pub use error::{ApiError, ApiResult};

use std::net::SocketAddr;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::metrics::ZoneMetrics;

pub const METRICS_PATH: &str = "/metrics";

/// Build the router serving the metrics endpoint
pub fn router(metrics: ZoneMetrics) -> Router {
    Router::new()
        .route(METRICS_PATH, get(routes::metrics::scrape))
        .with_state(metrics)
        .layer(TraceLayer::new_for_http())
}

/// Spawn the metrics server
///
/// Binding happens before this returns, so an unavailable port is reported
/// to the caller. Serving then continues in a background task.
/// Returns the server's local address.
pub async fn spawn_metrics_server(
    bind_addr: SocketAddr,
    metrics: ZoneMetrics,
) -> anyhow::Result<SocketAddr> {
    info!("starting metrics server on {bind_addr}");

    let app = router(metrics);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("listening on {addr}{METRICS_PATH}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("metrics server error: {}", e);
        }
    });

    Ok(addr)
}
