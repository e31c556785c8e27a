// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum_test::TestServer;
use jobrs::config::settings::Settings;
use jobrs::domain::models::job_posting::{JobPosting, JobSource};
use jobrs::domain::models::job_query::JobQuery;
use jobrs::domain::scraping::scraper::{JobScraper, ScraperError};
use jobrs::domain::services::entry_level_filter::EntryLevelFilter;
use jobrs::domain::services::job_service::JobService;
use jobrs::presentation::middleware::rate_limit_middleware::RateLimiter;
use jobrs::presentation::routes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 返回固定结果的抓取器，并记录收到的查询
pub struct StubScraper {
    source: JobSource,
    result: Result<Vec<JobPosting>, String>,
    panics: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<JobQuery>>,
}

impl StubScraper {
    pub fn returning(source: JobSource, jobs: Vec<JobPosting>) -> Arc<Self> {
        Arc::new(Self {
            source,
            result: Ok(jobs),
            panics: false,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(source: JobSource) -> Arc<Self> {
        Arc::new(Self {
            source,
            result: Err("navigation failed".to_string()),
            panics: false,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    /// 抓取时直接 panic 的抓取器
    pub fn panicking(source: JobSource) -> Arc<Self> {
        Arc::new(Self {
            source,
            result: Ok(Vec::new()),
            panics: true,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<JobQuery> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl JobScraper for StubScraper {
    async fn search(&self, query: &JobQuery) -> Result<Vec<JobPosting>, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        if self.panics {
            panic!("selector engine crashed");
        }
        self.result
            .clone()
            .map_err(ScraperError::Parse)
    }

    fn source(&self) -> JobSource {
        self.source
    }
}

pub fn job(title: &str, link: &str, source: JobSource) -> JobPosting {
    JobPosting::new(title, "Acme", "Tel Aviv", link, source)
}

/// 测试配置：不缓存，单个来源超时 5 秒
pub fn test_settings() -> Settings {
    let mut settings = Settings::defaults().unwrap();
    settings.scraping.cache_ttl_secs = 0;
    settings.scraping.source_timeout_secs = 5;
    settings
}

/// 使用给定抓取器创建测试服务器
pub fn create_test_server(
    scrapers: Vec<Arc<dyn JobScraper>>,
    settings: Settings,
    requests_per_minute: Option<u32>,
) -> TestServer {
    let filter = EntryLevelFilter::new(&settings.filter.exclude_title_keywords).unwrap();
    let service = Arc::new(JobService::new(scrapers, &settings.scraping, filter));
    let rate_limiter = requests_per_minute.map(|rpm| Arc::new(RateLimiter::new(rpm).unwrap()));

    let app = routes::app(service, Arc::new(settings), rate_limiter);
    TestServer::new(app).unwrap()
}

pub fn as_scrapers(stubs: &[&Arc<StubScraper>]) -> Vec<Arc<dyn JobScraper>> {
    stubs
        .iter()
        .map(|s| (*s).clone() as Arc<dyn JobScraper>)
        .collect()
}
