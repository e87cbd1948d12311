//! HTTP client for the Cloudflare zone listing and analytics APIs

use async_trait::async_trait;
use chrono::Local;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument, trace, warn};

use crate::{DailyStatGroup, Zone, config::Config};

use super::error::{DiscoveryError, FetchError, body_snippet};
use super::query::{
    GraphqlResponse, ZONES_PER_PAGE, ZoneListResponse, ZoneRecord, build_stats_query,
    stats_since,
};

/// The two remote calls the exporter depends on.
///
/// `CloudflareClient` is the production implementation. Discovery and the
/// poll loop only see this trait, so tests can substitute fakes.
#[async_trait]
pub trait ZoneStatsSource: Send + Sync {
    /// List the first page of zones visible to the token, regardless of status
    async fn list_zones(&self) -> Result<Vec<ZoneRecord>, DiscoveryError>;

    /// Fetch the trailing window of daily statistics for one zone
    async fn fetch_zone_stats(&self, zone: &Zone) -> Result<Vec<DailyStatGroup>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct CloudflareClient {
    /// HTTP client (reused across requests)
    client: reqwest::Client,

    api_base: String,

    graphql_url: String,

    token: String,
}

impl CloudflareClient {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            graphql_url: config.graphql_url(),
            token: config.api_token.clone().unwrap_or_default(),
        })
    }

    fn zones_url(&self) -> String {
        format!("{}/zones?per_page={ZONES_PER_PAGE}", self.api_base)
    }
}

#[async_trait]
impl ZoneStatsSource for CloudflareClient {
    #[instrument(skip(self))]
    async fn list_zones(&self) -> Result<Vec<ZoneRecord>, DiscoveryError> {
        let url = self.zones_url();
        trace!("requesting zone listing from {url}");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DiscoveryError::Status {
                status,
                body: body_snippet(&body),
            });
        }

        let listing: ZoneListResponse = serde_json::from_str(&body)?;

        let skipped = listing.skipped_pages();
        if skipped > 0 {
            warn!(
                "ignoring {skipped} more pages of zones, only the first {ZONES_PER_PAGE} zones are monitored"
            );
        }

        let records = listing.into_records()?;
        debug!("zone listing returned {} zones", records.len());

        Ok(records)
    }

    #[instrument(skip(self, zone), fields(zone = %zone.tag))]
    async fn fetch_zone_stats(&self, zone: &Zone) -> Result<Vec<DailyStatGroup>, FetchError> {
        debug!("loading zone {}:{}", zone.tag, zone.id);

        let since = stats_since(Local::now().date_naive());
        let query = build_stats_query(&zone.id, since);

        let response = self
            .client
            .post(&self.graphql_url)
            .bearer_auth(&self.token)
            .json(&query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: body_snippet(&body),
            });
        }

        let parsed: GraphqlResponse = serde_json::from_str(&body)?;
        let groups = parsed.into_daily_groups()?;

        trace!("parsed {} daily groups", groups.len());

        Ok(groups)
    }
}
