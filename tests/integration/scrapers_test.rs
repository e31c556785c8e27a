// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_server, test_settings};
use axum::http::StatusCode;
use jobrs::config::settings::Settings;
use jobrs::domain::models::job_posting::JobSource;
use jobrs::domain::models::job_query::JobQuery;
use jobrs::domain::scraping::scraper::{JobScraper, ScraperError};
use jobrs::engines::reqwest_engine::ReqwestEngine;
use jobrs::engines::router::EngineRouter;
use jobrs::engines::traits::{EngineError, PageEngine};
use jobrs::infrastructure::scrapers::factory::build_scrapers;
use jobrs::infrastructure::scrapers::indeed::IndeedSite;
use jobrs::infrastructure::scrapers::paged::PagedScraper;
use jobrs::utils::retry_policy::RetryPolicy;
use serde_json::Value;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LINKEDIN_PATH: &str = "/jobs-guest/jobs/api/seeMoreJobPostings/search";

fn linkedin_cards(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| {
            format!(
                r#"<li><div class="base-card">
                     <a class="base-card__full-link" href="https://il.linkedin.com/jobs/view/{id}?refId=r{id}"></a>
                     <h3 class="base-search-card__title">Junior Developer {id}</h3>
                     <h4 class="base-search-card__subtitle">Company {id}</h4>
                     <span class="job-search-card__location">Tel Aviv</span>
                     <time class="job-search-card__listdate">1 hour ago</time>
                   </div></li>"#
            )
        })
        .collect()
}

fn router() -> Arc<EngineRouter> {
    let engine: Arc<dyn PageEngine> = Arc::new(ReqwestEngine::new().unwrap());
    Arc::new(EngineRouter::new(vec![engine], 2))
}

/// 所有来源指向模拟服务器，无翻页间隔、不重试
fn mock_settings(server: &MockServer) -> Settings {
    let mut settings = test_settings();
    for source in [
        &mut settings.sources.linkedin,
        &mut settings.sources.alljobs,
        &mut settings.sources.indeed,
    ] {
        source.base_url = server.uri();
        source.page_delay_ms = 0;
        source.retries = 1;
        source.navigation_timeout_secs = 5;
    }
    settings
}

fn scraper_for(settings: &Settings, source: JobSource) -> Arc<dyn JobScraper> {
    build_scrapers(settings, router())
        .unwrap()
        .into_iter()
        .find(|s| s.source() == source)
        .unwrap()
}

#[tokio::test]
async fn test_linkedin_paginates_until_no_new_jobs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LINKEDIN_PATH))
        .and(query_param("start", "0"))
        .and(query_param("keywords", "junior developer"))
        .and(query_param("f_E", "1,2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(linkedin_cards(&[1, 2])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LINKEDIN_PATH))
        .and(query_param("start", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_string(linkedin_cards(&[2, 3])))
        .expect(1)
        .mount(&server)
        .await;
    // 两页没有新职位后停止
    Mock::given(method("GET"))
        .and(path(LINKEDIN_PATH))
        .and(query_param("start", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_string(linkedin_cards(&[3])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LINKEDIN_PATH))
        .and(query_param("start", "75"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    let settings = mock_settings(&server);
    let scraper = scraper_for(&settings, JobSource::LinkedIn);
    let jobs = scraper
        .search(&JobQuery::new("junior developer", "Israel"))
        .await
        .unwrap();

    let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Junior Developer 1", "Junior Developer 2", "Junior Developer 3"]
    );
    assert_eq!(jobs[0].company, "Company 1");
    assert_eq!(jobs[0].posted_at.as_deref(), Some("1 hour ago"));
}

#[tokio::test]
async fn test_linkedin_respects_max_jobs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LINKEDIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(linkedin_cards(&[1, 2, 3, 4])))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = mock_settings(&server);
    settings.sources.linkedin.max_jobs = 3;
    let jobs = scraper_for(&settings, JobSource::LinkedIn)
        .search(&JobQuery::new("developer", "Israel"))
        .await
        .unwrap();
    assert_eq!(jobs.len(), 3);
}

#[tokio::test]
async fn test_alljobs_resolves_relative_links_over_http() {
    let server = MockServer::start().await;
    let page = r#"
        <div class="open-board-item">
          <div class="job-content-top-title"><a href="/Search/UploadSingle.aspx?JobID=11">Junior QA</a></div>
          <div class="job-company-name">Acme</div>
          <div class="job-content-top-location">Haifa</div>
        </div>"#;
    Mock::given(method("GET"))
        .and(path("/SearchResultsGuest.aspx"))
        .and(query_param("page", "1"))
        .and(query_param("fdate", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/SearchResultsGuest.aspx"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    let settings = mock_settings(&server);
    let jobs = scraper_for(&settings, JobSource::AllJobs)
        .search(&JobQuery::new("qa", "Haifa"))
        .await
        .unwrap();

    assert_eq!(jobs.len(), 1);
    assert_eq!(
        jobs[0].link,
        format!("{}/Search/UploadSingle.aspx?JobID=11", server.uri())
    );
    assert_eq!(jobs[0].source, JobSource::AllJobs);
}

#[tokio::test]
async fn test_indeed_first_page_rejection_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let settings = mock_settings(&server);
    let err = scraper_for(&settings, JobSource::Indeed)
        .search(&JobQuery::new("developer", "Israel"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::Engine(EngineError::HttpStatus(403))));
}

#[tokio::test]
async fn test_indeed_retries_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="job_seen_beacon">
                 <h2 class="jobTitle"><a data-jk="abc" href="/rc/clk?jk=abc"><span title="Junior Analyst">Junior Analyst</span></a></h2>
                 <span data-testid="company-name">Globex</span>
               </div>"#,
        ))
        .with_priority(2)
        .mount(&server)
        .await;

    let mut settings = mock_settings(&server);
    settings.sources.indeed.max_pages = 1;
    let site = IndeedSite::new(&server.uri()).unwrap();
    let scraper = PagedScraper::new(site, router(), settings.sources.indeed.clone())
        .with_retry_policy(RetryPolicy::immediate(2));

    let jobs = scraper
        .search(&JobQuery::new("analyst", "Israel"))
        .await
        .unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].link, format!("{}/rc/clk?jk=abc", server.uri()));
}

#[tokio::test]
async fn test_api_degrades_blocked_source_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LINKEDIN_PATH))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(linkedin_cards(&[9])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><title>Just a moment...</title><div class="cf-turnstile"></div></html>"#),
        )
        .mount(&server)
        .await;

    let settings = mock_settings(&server);
    let scrapers = build_scrapers(&settings, router()).unwrap();
    let app = create_test_server(scrapers, settings, None);

    let response = app
        .get("/api/jobs")
        .add_query_param("sources", "linkedin,indeed")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["source"], "LinkedIn");
    assert_eq!(body[0]["title"], "Junior Developer 9");
}
