//! Concurrency tests: racing ingests must never duplicate hosts

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::Value;

use crate::helpers::{TestServer, sample_body};

#[tokio::test]
async fn test_racing_posts_for_same_new_hostname_create_one_host() {
    let server = TestServer::spawn().await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let client = server.client.clone();
        let url = server.url("/api/metrics");
        let body = sample_body("race-host", i as f64, 10.0, 10.0);

        handles.push(tokio::spawn(async move {
            client.post(url).json(&body).send().await.unwrap().status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    // all ten requests converge on a single host row
    assert_eq!(server.host_count().await, 1);

    let response = server.host_metrics("race-host", None).await;
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["count"], 10);
}

#[tokio::test]
async fn test_concurrent_posts_from_distinct_hosts() {
    let server = TestServer::spawn().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = server.client.clone();
        let url = server.url("/api/metrics");
        let body = sample_body(&format!("host-{i}"), 50.0, 50.0, 50.0);

        handles.push(tokio::spawn(async move {
            client.post(url).json(&body).send().await.unwrap().status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    assert_eq!(server.host_count().await, 8);
}
