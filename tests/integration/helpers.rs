//! Test helpers for the mocked Cloudflare API

use std::net::SocketAddr;

use cloudflare_exporter::{
    config::{Config, ConfigFile},
    context::AppContext,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";

/// A local address nothing listens on: bound once, then released
pub async fn unused_local_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Create an AppContext whose REST and GraphQL calls go to `server`
pub fn create_test_context(server: &MockServer) -> AppContext {
    create_test_context_for(&server.uri())
}

pub fn create_test_context_for(api_base: &str) -> AppContext {
    let config = Config {
        api_token: Some(TEST_TOKEN.to_string()),
        ..Default::default()
    }
    .merge(ConfigFile {
        api_base: Some(api_base.to_string()),
        http_timeout: Some(2),
        ..Default::default()
    });

    AppContext::from_config(config).unwrap()
}

/// Build a zone listing envelope from (id, name, status) triples
pub fn zone_listing_json(zones: &[(&str, &str, &str)]) -> Value {
    let result: Vec<Value> = zones
        .iter()
        .map(|(id, name, status)| json!({ "id": id, "name": name, "status": status }))
        .collect();

    json!({
        "result": result,
        "result_info": { "page": 1, "per_page": 500, "total_pages": 1 },
        "success": true,
        "errors": [],
        "messages": []
    })
}

/// One daily group of the GraphQL response
pub struct Day<'a> {
    pub date: &'a str,
    pub requests: f64,
    pub cached: f64,
    pub statuses: Vec<(Value, f64)>,
}

/// Build a GraphQL stats response for a single zone
pub fn stats_json(days: &[Day<'_>]) -> Value {
    let groups: Vec<Value> = days
        .iter()
        .map(|day| {
            let statuses: Vec<Value> = day
                .statuses
                .iter()
                .map(|(code, requests)| json!({ "edgeResponseStatus": code, "requests": requests }))
                .collect();
            json!({
                "sum": {
                    "requests": day.requests,
                    "cachedRequests": day.cached,
                    "responseStatusMap": statuses
                },
                "dimensions": { "date": day.date }
            })
        })
        .collect();

    json!({
        "data": { "viewer": { "zones": [{ "httpRequests1dGroups": groups }] } },
        "errors": null
    })
}

pub async fn mount_zone_listing(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer stats queries for `zone_id` with `response`
pub async fn mount_zone_stats(server: &MockServer, zone_id: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "zoneTag": zone_id } })))
        .respond_with(response)
        .mount(server)
        .await;
}
