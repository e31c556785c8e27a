// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SourceSettings;
use crate::domain::models::job_posting::{JobPosting, JobSource};
use crate::domain::models::job_query::JobQuery;
use crate::domain::scraping::scraper::{JobScraper, ScraperError};
use crate::engines::router::EngineRouter;
use crate::engines::traits::{PageAction, PageRequest, PageResponse};
use crate::infrastructure::scrapers::deduplicator::JobDeduplicator;
use crate::infrastructure::scrapers::html;
use crate::utils::retry_policy::RetryPolicy;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// 浏览器渲染时的页面提示
#[derive(Debug, Clone, Default)]
pub struct PageHints {
    /// 内容就绪的标志选择器
    pub wait_for: Vec<String>,
    /// 内容就绪后执行的动作
    pub actions: Vec<PageAction>,
}

/// 单个招聘站点的描述
///
/// 负责构建分页URL和解析结果页，分页、重试和去重由 [`PagedScraper`] 统一处理
pub trait JobSite: Send + Sync {
    /// 来源站点
    fn source(&self) -> JobSource;

    /// 第 `page` 页（从 0 开始）的搜索地址
    fn page_url(&self, query: &JobQuery, page: u32) -> String;

    /// 浏览器渲染提示
    fn page_hints(&self) -> PageHints {
        PageHints::default()
    }

    /// 解析结果页，`page_url` 用于解析相对链接
    fn parse_page(&self, html: &str, page_url: &str) -> Vec<JobPosting>;

    /// 页面是否被反爬挑战或登录墙拦截
    fn is_blocked(&self, html: &str) -> bool {
        html::looks_blocked(html)
    }
}

/// 通用分页抓取器
pub struct PagedScraper<S: JobSite> {
    site: S,
    router: Arc<EngineRouter>,
    settings: SourceSettings,
    retry: RetryPolicy,
}

impl<S: JobSite> PagedScraper<S> {
    /// 创建分页抓取器
    ///
    /// # 参数
    ///
    /// * `site` - 站点描述
    /// * `router` - 页面引擎路由器
    /// * `settings` - 站点配置
    pub fn new(site: S, router: Arc<EngineRouter>, settings: SourceSettings) -> Self {
        let retry = RetryPolicy::navigation(settings.retries);
        Self {
            site,
            router,
            settings,
            retry,
        }
    }

    /// 替换重试策略
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn page_request(&self, url: String) -> PageRequest {
        let hints = self.site.page_hints();
        let mut request = PageRequest::new(url, self.settings.navigation_timeout());
        request.needs_js = self.settings.use_browser;
        request.wait_for = hints.wait_for;
        request.actions = hints.actions;
        request
    }

    /// 获取单页，只对可重试的错误进行重试
    async fn fetch_page(&self, url: &str) -> Result<PageResponse, ScraperError> {
        let request = self.page_request(url.to_string());
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.router.route(&request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && self.retry.should_retry(attempt) => {
                    let backoff = self.retry.calculate_backoff(attempt);
                    warn!(
                        "{} navigation attempt {} failed: {}, retrying in {:?}",
                        self.site.source(),
                        attempt,
                        e,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn collect(&self, query: &JobQuery) -> Result<Vec<JobPosting>, ScraperError> {
        let source = self.site.source();
        let max_jobs = self.settings.max_jobs;
        let max_idle_pages = self.settings.max_idle_pages.max(1);

        let mut deduplicator = JobDeduplicator::new();
        let mut jobs: Vec<JobPosting> = Vec::new();
        let mut idle_pages = 0;

        info!(
            "Scraping {} for \"{}\" in \"{}\"",
            source, query.keyword, query.location
        );

        for page in 0..self.settings.max_pages {
            if jobs.len() >= max_jobs {
                break;
            }
            if page > 0 {
                let delay = self.settings.page_delay();
                if delay > Duration::ZERO {
                    tokio::time::sleep(delay).await;
                }
            }

            let url = self.site.page_url(query, page);
            debug!("{} page {}: {}", source, page + 1, url);

            let response = match self.fetch_page(&url).await {
                Ok(response) => response,
                Err(e) if page == 0 => return Err(e),
                Err(e) => {
                    warn!(
                        "{} page {} failed: {}, keeping {} jobs",
                        source,
                        page + 1,
                        e,
                        jobs.len()
                    );
                    break;
                }
            };

            let base = if Url::parse(&response.final_url).is_ok() {
                response.final_url.as_str()
            } else {
                url.as_str()
            };
            let found = self.site.parse_page(&response.content, base);

            if found.is_empty() && self.site.is_blocked(&response.content) {
                if page == 0 {
                    return Err(ScraperError::Blocked(url));
                }
                warn!("{} page {} is a challenge page, stopping", source, page + 1);
                break;
            }

            let before = jobs.len();
            for job in found {
                if jobs.len() >= max_jobs {
                    break;
                }
                if deduplicator.insert(&job) {
                    jobs.push(job);
                }
            }
            let added = jobs.len() - before;
            debug!(
                "{} page {}: added {} unique jobs (total {})",
                source,
                page + 1,
                added,
                jobs.len()
            );

            if added == 0 {
                idle_pages += 1;
                if idle_pages >= max_idle_pages {
                    debug!("{}: no new jobs for {} pages, stopping", source, idle_pages);
                    break;
                }
            } else {
                idle_pages = 0;
            }
        }

        info!("{}: collected {} unique jobs", source, jobs.len());
        Ok(jobs)
    }
}

#[async_trait]
impl<S: JobSite> JobScraper for PagedScraper<S> {
    async fn search(&self, query: &JobQuery) -> Result<Vec<JobPosting>, ScraperError> {
        let jobs = self.collect(query).await?;
        metrics::counter!("jobs_scraped_total", "source" => self.site.source().key())
            .increment(jobs.len() as u64);
        Ok(jobs)
    }

    fn source(&self) -> JobSource {
        self.site.source()
    }
}
