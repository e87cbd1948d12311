//! Wire types of the Cloudflare REST and GraphQL APIs
//!
//! The zone listing is a plain REST envelope (`result`, `success`, `errors`).
//! Daily statistics come from the `httpRequests1dGroups` dataset of the
//! GraphQL analytics API.

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use crate::{DailyStatGroup, StatusCount};

use super::error::{DiscoveryError, FetchError};

/// Page size requested from the zone listing. Only the first page is read.
pub const ZONES_PER_PAGE: u32 = 500;

/// Days subtracted from today before the date filter is formatted
pub const STATS_LOOKBACK_DAYS: i64 = 7;

/// Maximum number of daily groups returned per zone
pub const STATS_GROUP_LIMIT: u32 = 10;

/// Zone status that makes a zone eligible for polling
pub const ACTIVE_STATUS: &str = "active";

const STATS_QUERY: &str = "query ZoneDailyStats($zoneTag: string, $since: Date, $limit: uint64!) { \
viewer { zones(filter: { zoneTag: $zoneTag }) { \
httpRequests1dGroups(filter: { date_geq: $since }, limit: $limit, orderBy: [date_DESC]) { \
sum { requests cachedRequests responseStatusMap { edgeResponseStatus requests } } \
dimensions { date } } } } }";

/// First date included in the stats window.
pub fn stats_since(today: NaiveDate) -> NaiveDate {
    today - TimeDelta::days(STATS_LOOKBACK_DAYS)
}

/// Build the GraphQL request body for one zone.
pub fn build_stats_query(zone_id: &str, since: NaiveDate) -> Value {
    json!({
        "query": STATS_QUERY,
        "variables": {
            "zoneTag": zone_id,
            "since": since.format("%Y-%m-%d").to_string(),
            "limit": STATS_GROUP_LIMIT,
        },
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}

impl ApiMessage {
    fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("{code}: {}", self.message),
            None => self.message.clone(),
        }
    }
}

/// One entry of the zone listing
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneRecord {
    pub id: String,
    pub name: String,
    pub status: String,
}

impl ZoneRecord {
    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultInfo {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneListResponse {
    pub result: Option<Vec<ZoneRecord>>,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
}

impl ZoneListResponse {
    /// Pages of zones beyond the first one, which are never requested.
    pub fn skipped_pages(&self) -> u32 {
        self.result_info
            .as_ref()
            .map_or(0, |info| info.total_pages.saturating_sub(1))
    }

    pub fn into_records(self) -> Result<Vec<ZoneRecord>, DiscoveryError> {
        if self.success == Some(false) {
            return Err(DiscoveryError::Api(
                self.errors.iter().map(ApiMessage::describe).collect(),
            ));
        }
        Ok(self.result.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    data: Option<GraphqlData>,
    #[serde(default)]
    errors: Option<Vec<ApiMessage>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlData {
    viewer: Viewer,
}

#[derive(Debug, Deserialize)]
struct Viewer {
    zones: Vec<ZoneGroups>,
}

#[derive(Debug, Deserialize)]
struct ZoneGroups {
    #[serde(rename = "httpRequests1dGroups", default)]
    groups: Vec<Group>,
}

#[derive(Debug, Deserialize)]
struct Group {
    sum: GroupSum,
    dimensions: GroupDimensions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupSum {
    requests: f64,
    cached_requests: f64,
    #[serde(default)]
    response_status_map: Vec<StatusEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusEntry {
    #[serde(default, deserialize_with = "status_code_string")]
    edge_response_status: String,
    requests: f64,
}

#[derive(Debug, Deserialize)]
struct GroupDimensions {
    date: String,
}

/// Status codes arrive as numbers, but strings and nulls are tolerated.
fn status_code_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(status)) => status,
        _ => String::new(),
    })
}

impl From<Group> for DailyStatGroup {
    fn from(group: Group) -> Self {
        let status_breakdown = group
            .sum
            .response_status_map
            .into_iter()
            .filter(|entry| !entry.edge_response_status.is_empty())
            .map(|entry| StatusCount {
                status_code: entry.edge_response_status,
                requests: entry.requests,
            })
            .collect();

        DailyStatGroup {
            date: group.dimensions.date,
            total_requests: group.sum.requests,
            cached_requests: group.sum.cached_requests,
            status_breakdown,
        }
    }
}

impl GraphqlResponse {
    pub fn into_daily_groups(self) -> Result<Vec<DailyStatGroup>, FetchError> {
        if let Some(errors) = self.errors
            && !errors.is_empty()
        {
            return Err(FetchError::Api(
                errors.iter().map(ApiMessage::describe).collect(),
            ));
        }

        let zone = self
            .data
            .and_then(|data| data.viewer.zones.into_iter().next())
            .ok_or(FetchError::MissingZone)?;

        Ok(zone.groups.into_iter().map(DailyStatGroup::from).collect())
    }
}
