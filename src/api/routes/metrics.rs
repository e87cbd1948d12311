//! Prometheus scrape endpoint

use axum::{extract::State, http::header::CONTENT_TYPE, response::IntoResponse};
use tracing::trace;

use crate::{api::error::ApiResult, metrics::ZoneMetrics};

/// GET /metrics
///
/// Renders the current gauge table in the text exposition format
pub async fn scrape(State(metrics): State<ZoneMetrics>) -> ApiResult<impl IntoResponse> {
    let body = metrics.encode()?;
    trace!("serving {} bytes of metrics", body.len());

    Ok(([(CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}
