//! Scraping the metrics endpoint after a pass

use cloudflare_exporter::{
    Zone,
    actors::ZonePollerActor,
    api::spawn_metrics_server,
};
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::{MockServer, ResponseTemplate};

use crate::helpers::*;

#[tokio::test]
async fn test_scrape_after_pass() {
    let mock_server = MockServer::start().await;
    mount_zone_stats(
        &mock_server,
        "abc",
        ResponseTemplate::new(200).set_body_json(stats_json(&[Day {
            date: "2024-01-01",
            requests: 100.0,
            cached: 40.0,
            statuses: vec![(json!(200), 90.0), (json!(404), 10.0)],
        }])),
    )
    .await;

    let context = create_test_context(&mock_server);
    context
        .registry
        .replace(vec![Zone::new("example.com", "abc")])
        .await;

    let addr = spawn_metrics_server("127.0.0.1:0".parse().unwrap(), context.metrics.clone())
        .await
        .unwrap();

    let (_tx, rx) = mpsc::channel(1);
    ZonePollerActor::new(&context, rx).run_pass().await;

    let response = reqwest::get(format!("http://{addr}/metrics")).await.unwrap();
    assert!(response.status().is_success());

    let body = response.text().await.unwrap();
    for line in [
        r#"cloudflare_zone_requests_total{date="2024-01-01",zone_tag="example.com"} 100"#,
        r#"cloudflare_zone_cached_requests_total{date="2024-01-01",zone_tag="example.com"} 40"#,
        r#"cloudflare_zone_status_code_requests_total{date="2024-01-01",status_code="200",zone_tag="example.com"} 90"#,
        r#"cloudflare_zone_status_code_requests_total{date="2024-01-01",status_code="404",zone_tag="example.com"} 10"#,
    ] {
        assert!(body.contains(line), "missing `{line}` in:\n{body}");
    }
}

#[tokio::test]
async fn test_scrape_before_first_pass_is_empty() {
    let mock_server = MockServer::start().await;
    let context = create_test_context(&mock_server);

    let addr = spawn_metrics_server("127.0.0.1:0".parse().unwrap(), context.metrics.clone())
        .await
        .unwrap();

    let response = reqwest::get(format!("http://{addr}/metrics")).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "");
}

#[tokio::test]
async fn test_only_metrics_path_is_served() {
    let mock_server = MockServer::start().await;
    let context = create_test_context(&mock_server);

    let addr = spawn_metrics_server("127.0.0.1:0".parse().unwrap(), context.metrics.clone())
        .await
        .unwrap();

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}
