//! Zone discovery against the mocked zone listing

use cloudflare_exporter::{Zone, cloudflare::DiscoveryError};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

#[tokio::test]
async fn test_discovery_registers_active_zones() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zones"))
        .and(query_param("per_page", "500"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(zone_listing_json(&[
            ("abc", "example.com", "active"),
            ("def", "example.org", "pending"),
            ("ghi", "example.net", "active"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let context = create_test_context(&mock_server);
    let zones = context.discover_zones().await.unwrap();

    let expected = vec![
        Zone::new("example.com", "abc"),
        Zone::new("example.net", "ghi"),
    ];
    assert_eq!(zones, expected);
    assert_eq!(context.registry.snapshot().await, expected);
}

#[tokio::test]
async fn test_discovery_with_empty_result_fails() {
    let mock_server = MockServer::start().await;
    mount_zone_listing(&mock_server, zone_listing_json(&[])).await;

    let context = create_test_context(&mock_server);
    let result = context.discover_zones().await;

    assert!(matches!(result, Err(DiscoveryError::NoActiveZones)));
    assert!(context.registry.is_empty().await);
}

#[tokio::test]
async fn test_discovery_without_active_zones_fails() {
    let mock_server = MockServer::start().await;
    mount_zone_listing(
        &mock_server,
        zone_listing_json(&[("abc", "example.com", "deactivated")]),
    )
    .await;

    let context = create_test_context(&mock_server);

    assert!(matches!(
        context.discover_zones().await,
        Err(DiscoveryError::NoActiveZones)
    ));
    assert!(context.registry.is_empty().await);
}

#[tokio::test]
async fn test_discovery_rejected_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "result": null,
            "success": false,
            "errors": [{ "code": 9109, "message": "Invalid access token" }]
        })))
        .mount(&mock_server)
        .await;

    let context = create_test_context(&mock_server);
    let err = context.discover_zones().await.unwrap_err();

    match err {
        DiscoveryError::Status { status, body } => {
            assert_eq!(status.as_u16(), 403);
            assert!(body.contains("Invalid access token"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(context.registry.is_empty().await);
}

#[tokio::test]
async fn test_discovery_failure_envelope() {
    let mock_server = MockServer::start().await;
    mount_zone_listing(
        &mock_server,
        json!({
            "result": [],
            "success": false,
            "errors": [{ "code": 1000, "message": "Internal error" }]
        }),
    )
    .await;

    let context = create_test_context(&mock_server);

    assert!(matches!(
        context.discover_zones().await,
        Err(DiscoveryError::Api(_))
    ));
}

#[tokio::test]
async fn test_discovery_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{invalid json"))
        .mount(&mock_server)
        .await;

    let context = create_test_context(&mock_server);

    assert!(matches!(
        context.discover_zones().await,
        Err(DiscoveryError::Parse(_))
    ));
}

#[tokio::test]
async fn test_discovery_unreachable_api() {
    let context = create_test_context_for(&format!("http://{}", unused_local_addr().await));

    let err = context.discover_zones().await.unwrap_err();
    assert!(matches!(err, DiscoveryError::Transport(_)));

    let summary = err.to_string();
    let chain = format!("{:#}", anyhow::Error::new(err));
    assert_eq!(summary, "zone listing request failed");
    assert!(chain.starts_with("zone listing request failed: error sending request"));
    assert!(chain.matches(": ").count() >= 2, "connect cause missing from `{chain}`");
}
