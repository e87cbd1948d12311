pub mod actors;
pub mod api;
pub mod cloudflare;
pub mod config;
pub mod context;
pub mod metrics;
pub mod util;
pub mod zones;

/// A monitored Cloudflare zone.
///
/// `id` is the opaque identifier assigned by Cloudflare and is what the
/// analytics API filters on. `tag` is the zone's domain name and is only used
/// as a label value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zone {
    pub tag: String,
    pub id: String,
}

impl Zone {
    pub fn new(tag: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: id.into(),
        }
    }
}

/// Aggregated statistics of one zone for one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStatGroup {
    /// Date in `YYYY-MM-DD` form, as reported by the API
    pub date: String,
    pub total_requests: f64,
    pub cached_requests: f64,
    /// Request counts by edge response status code
    pub status_breakdown: Vec<StatusCount>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusCount {
    pub status_code: String,
    pub requests: f64,
}
