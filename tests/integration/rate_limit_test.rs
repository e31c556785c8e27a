// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{as_scrapers, create_test_server, test_settings, StubScraper};
use axum::http::StatusCode;
use jobrs::domain::models::job_posting::JobSource;
use serde_json::{json, Value};

#[tokio::test]
async fn test_sixth_request_within_a_minute_is_rejected() {
    let linkedin = StubScraper::returning(JobSource::LinkedIn, Vec::new());
    let server = create_test_server(as_scrapers(&[&linkedin]), test_settings(), Some(5));

    for _ in 0..5 {
        let response = server
            .get("/api/jobs")
            .add_header("X-Forwarded-For", "203.0.113.7")
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    let response = server
        .get("/api/jobs")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await;
    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Too many requests, please try again later." })
    );
    let retry_after: u64 = response
        .header("retry-after")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));
    assert_eq!(linkedin.calls(), 5);

    // 其他客户端和健康检查不受影响
    let response = server
        .get("/api/jobs")
        .add_header("X-Forwarded-For", "198.51.100.2")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .get("/health")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
