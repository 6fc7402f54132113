//! Read-surface tests: dashboard, thresholds, host history, auth gating

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::Value;

use crate::helpers::{TestServer, sample_body};

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let server = TestServer::spawn().await;

    let response = server
        .client
        .get(server.url("/api/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_end_to_end_cpu_alert_scenario() {
    let server = TestServer::spawn().await;

    // default thresholds: cpu 85, ram 80, disk 90
    let response = server
        .post_sample(&serde_json::json!({
            "hostname": "PC-1",
            "cpu": 90,
            "ram": 50,
            "disk": 50,
            "processes": 10,
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let dashboard = server.dashboard().await;
    assert_eq!(dashboard["total_computers"], 1);
    assert_eq!(dashboard["problems_count"], 1);
    assert_eq!(dashboard["avg_cpu"], 90);

    let alerts = dashboard["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["hostname"], "PC-1");
    assert_eq!(alerts[0]["message"], "High CPU usage: 90%");
}

#[tokio::test]
async fn test_average_cpu_excludes_silent_hosts() {
    let server = TestServer::spawn().await;

    server
        .post_sample(&sample_body("a", 20.0, 10.0, 10.0))
        .await;
    server
        .post_sample(&sample_body("b", 60.0, 10.0, 10.0))
        .await;
    // a host whose latest sample carries no CPU value is excluded from
    // the mean, not counted as zero
    server.post_sample(&serde_json::json!({"hostname": "c"})).await;

    let dashboard = server.dashboard().await;
    assert_eq!(dashboard["total_computers"], 3);
    assert_eq!(dashboard["avg_cpu"], 40);
}

#[tokio::test]
async fn test_get_thresholds_returns_defaults() {
    let server = TestServer::spawn().await;

    let response = server
        .client
        .get(server.url("/api/thresholds"))
        .send()
        .await
        .unwrap();

    let json: Value = response.json().await.unwrap();
    assert_eq!(json["cpu"], 85);
    assert_eq!(json["ram"], 80);
    assert_eq!(json["disk"], 90);
}

#[tokio::test]
async fn test_threshold_update_is_monotonic() {
    let server = TestServer::spawn().await;

    server
        .post_sample(&sample_body("pc-1", 90.0, 10.0, 10.0))
        .await;

    // default cpu threshold 85: alert fires
    assert_eq!(server.dashboard().await["problems_count"], 1);

    // raising the threshold above the metric removes the alert
    server
        .client
        .post(server.url("/api/thresholds"))
        .form(&[
            ("cpu_threshold", "91"),
            ("ram_threshold", "80"),
            ("disk_threshold", "90"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(server.dashboard().await["problems_count"], 0);

    // lowering it to exactly the metric value re-adds it (inclusive >=)
    server
        .client
        .post(server.url("/api/thresholds"))
        .form(&[
            ("cpu_threshold", "90"),
            ("ram_threshold", "80"),
            ("disk_threshold", "90"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(server.dashboard().await["problems_count"], 1);
}

#[tokio::test]
async fn test_threshold_form_values_are_clamped() {
    let server = TestServer::spawn().await;

    let response = server
        .client
        .post(server.url("/api/thresholds"))
        .form(&[
            ("cpu_threshold", "150"),
            ("ram_threshold", "-5"),
            ("disk_threshold", "50"),
        ])
        .send()
        .await
        .unwrap();

    let json: Value = response.json().await.unwrap();
    assert_eq!(json["cpu"], 100);
    assert_eq!(json["ram"], 0);
    assert_eq!(json["disk"], 50);
}

#[tokio::test]
async fn test_host_history_defaults_to_twenty_newest_first() {
    let server = TestServer::spawn().await;

    for i in 0..25 {
        server
            .post_sample(&sample_body("pc-1", i as f64, 10.0, 10.0))
            .await;
    }

    let response = server.host_metrics("pc-1", None).await;
    let json: Value = response.json().await.unwrap();
    let metrics = json["metrics"].as_array().unwrap();

    assert_eq!(metrics.len(), 20);
    assert_eq!(metrics[0]["cpu_percent"], 24.0);
    assert_eq!(metrics[19]["cpu_percent"], 5.0);
}

#[tokio::test]
async fn test_unknown_host_history_is_404() {
    let server = TestServer::spawn().await;

    let response = server.host_metrics("nope", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json: Value = response.json().await.unwrap();
    assert!(json["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_read_endpoints_require_token_when_configured() {
    let server = TestServer::spawn_with_token(Some("test-token")).await;

    // no token
    let response = server
        .client
        .get(server.url("/api/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // wrong token
    let response = server
        .client
        .get(server.url("/api/dashboard"))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // correct token
    let response = server
        .client
        .get(server.url("/api/dashboard"))
        .bearer_auth("test-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_ingestion_stays_open_when_token_configured() {
    let server = TestServer::spawn_with_token(Some("test-token")).await;

    let response = server
        .post_sample(&sample_body("pc-1", 10.0, 10.0, 10.0))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}
