//! Error types for the Cloudflare API calls

use reqwest::StatusCode;
use thiserror::Error;

/// Longest response body excerpt kept in an error message
const BODY_SNIPPET_LEN: usize = 256;

pub(crate) fn body_snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}

/// Failure to build the zone registry at startup.
///
/// Every variant is fatal: the exporter never starts polling without zones.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("zone listing request failed")]
    Transport(#[from] reqwest::Error),

    #[error("zone listing returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse zone listing")]
    Parse(#[from] serde_json::Error),

    #[error("zone listing rejected by API: {}", .0.join("; "))]
    Api(Vec<String>),

    #[error("no active zones found")]
    NoActiveZones,
}

/// Failure to fetch statistics of a single zone.
///
/// Recoverable: the zone is skipped for the current pass and retried on the
/// next one.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("stats request failed")]
    Transport(#[from] reqwest::Error),

    #[error("stats query returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse stats response")]
    Parse(#[from] serde_json::Error),

    #[error("stats query rejected by API: {}", .0.join("; "))]
    Api(Vec<String>),

    #[error("stats response contained no data for the zone")]
    MissingZone,
}
