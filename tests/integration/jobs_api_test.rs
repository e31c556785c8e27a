// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{as_scrapers, create_test_server, job, test_settings, StubScraper};
use axum::http::StatusCode;
use jobrs::domain::models::job_posting::JobSource;
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_and_version() {
    let server = create_test_server(Vec::new(), test_settings(), None);

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");

    let response = server.get("/version").await;
    assert_eq!(response.text(), env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_missing_parameters_fall_back_to_defaults() {
    let linkedin = StubScraper::returning(JobSource::LinkedIn, Vec::new());
    let server = create_test_server(as_scrapers(&[&linkedin]), test_settings(), None);

    let response = server
        .get("/api/jobs")
        .add_query_param("keyword", "")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!([]));

    let query = linkedin.last_query().unwrap();
    assert_eq!(query.keyword, "developer");
    assert_eq!(query.location, "Israel");
}

#[tokio::test]
async fn test_returns_postings_as_json() {
    let linkedin = StubScraper::returning(
        JobSource::LinkedIn,
        vec![job("Junior Rust Developer", "https://www.linkedin.com/jobs/view/1", JobSource::LinkedIn)
            .with_posted_at(Some("2 hours ago".to_string()))],
    );
    let server = create_test_server(as_scrapers(&[&linkedin]), test_settings(), None);

    let response = server
        .get("/api/jobs")
        .add_query_param("keyword", "rust")
        .add_query_param("location", "Haifa")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!([{
            "title": "Junior Rust Developer",
            "company": "Acme",
            "location": "Tel Aviv",
            "link": "https://www.linkedin.com/jobs/view/1",
            "source": "LinkedIn",
            "postedAt": "2 hours ago"
        }])
    );
    assert_eq!(linkedin.last_query().unwrap().location, "Haifa");
}

#[tokio::test]
async fn test_empty_source_list_returns_empty_array() {
    let linkedin = StubScraper::returning(
        JobSource::LinkedIn,
        vec![job("Junior Dev", "https://jobs.test/1", JobSource::LinkedIn)],
    );
    let server = create_test_server(as_scrapers(&[&linkedin]), test_settings(), None);

    let response = server.get("/api/jobs").add_query_param("sources", "").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!([]));
    assert_eq!(linkedin.calls(), 0);
}

#[tokio::test]
async fn test_source_selection() {
    let linkedin = StubScraper::returning(
        JobSource::LinkedIn,
        vec![job("Junior Dev", "https://jobs.test/1", JobSource::LinkedIn)],
    );
    let indeed = StubScraper::returning(
        JobSource::Indeed,
        vec![job("QA Intern", "https://jobs.test/2", JobSource::Indeed)],
    );
    let server = create_test_server(as_scrapers(&[&linkedin, &indeed]), test_settings(), None);

    let response = server
        .get("/api/jobs")
        .add_query_param("sources", "Indeed")
        .await;

    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["source"], "Indeed");
    assert_eq!(linkedin.calls(), 0);
}

#[tokio::test]
async fn test_invalid_parameters_are_rejected() {
    let server = create_test_server(Vec::new(), test_settings(), None);

    let response = server
        .get("/api/jobs")
        .add_query_param("sources", "linkedin,monster")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"]
        .as_str()
        .unwrap()
        .contains("monster"));

    let response = server
        .get("/api/jobs")
        .add_query_param("keyword", "x".repeat(201))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_duplicates_across_sources_are_removed() {
    let linkedin = StubScraper::returning(
        JobSource::LinkedIn,
        vec![
            job("Junior Dev", "https://jobs.test/1?trk=feed", JobSource::LinkedIn),
            job("Junior Dev", "https://jobs.test/1", JobSource::LinkedIn),
        ],
    );
    let alljobs = StubScraper::returning(
        JobSource::AllJobs,
        vec![
            job("Junior Dev", "https://jobs.test/1#apply", JobSource::AllJobs),
            job("Support Engineer", "https://jobs.test/5", JobSource::AllJobs),
        ],
    );
    let server = create_test_server(as_scrapers(&[&linkedin, &alljobs]), test_settings(), None);

    let body: Vec<Value> = server.get("/api/jobs").await.json();
    let links: Vec<&str> = body.iter().map(|j| j["link"].as_str().unwrap()).collect();
    assert_eq!(links, vec!["https://jobs.test/1?trk=feed", "https://jobs.test/5"]);
}

#[tokio::test]
async fn test_failing_source_does_not_fail_request() {
    let linkedin = StubScraper::failing(JobSource::LinkedIn);
    let indeed = StubScraper::returning(
        JobSource::Indeed,
        vec![job("Junior Dev", "https://jobs.test/7", JobSource::Indeed)],
    );
    let server = create_test_server(as_scrapers(&[&linkedin, &indeed]), test_settings(), None);

    let response = server.get("/api/jobs").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["source"], "Indeed");
    assert_eq!(linkedin.calls(), 1);
}

#[tokio::test]
async fn test_crashed_scraper_returns_fetch_error() {
    let linkedin = StubScraper::returning(
        JobSource::LinkedIn,
        vec![job("Junior Dev", "https://jobs.test/7", JobSource::LinkedIn)],
    );
    let indeed = StubScraper::panicking(JobSource::Indeed);
    let server = create_test_server(as_scrapers(&[&linkedin, &indeed]), test_settings(), None);

    let response = server.get("/api/jobs").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>(), json!({ "error": "Error fetching jobs" }));
    assert_eq!(indeed.calls(), 1);
}

#[tokio::test]
async fn test_senior_titles_are_filtered() {
    let linkedin = StubScraper::returning(
        JobSource::LinkedIn,
        vec![
            job("Senior Backend Engineer", "https://jobs.test/1", JobSource::LinkedIn),
            job("Junior Backend Engineer", "https://jobs.test/2", JobSource::LinkedIn),
        ],
    );
    let server = create_test_server(as_scrapers(&[&linkedin]), test_settings(), None);

    let body: Vec<Value> = server.get("/api/jobs").await.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["title"], "Junior Backend Engineer");
}
