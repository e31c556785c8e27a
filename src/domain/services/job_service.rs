// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScrapingSettings;
use crate::domain::models::job_posting::{JobPosting, JobSource};
use crate::domain::models::job_query::JobQuery;
use crate::domain::scraping::scraper::{JobScraper, ScraperError};
use crate::domain::services::entry_level_filter::EntryLevelFilter;
use crate::infrastructure::cache::job_cache::JobCache;
use crate::infrastructure::scrapers::deduplicator::JobDeduplicator;
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum JobServiceError {
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 职位聚合服务
///
/// 将查询分发给各站点抓取器，合并、去重并过滤结果。单个站点失败或超时只会让该站点
/// 贡献空列表，不会导致整个请求失败
pub struct JobService {
    scrapers: Vec<Arc<dyn JobScraper>>,
    cache: JobCache,
    filter: EntryLevelFilter,
    parallel: bool,
    source_timeout: Duration,
}

impl JobService {
    /// 创建职位聚合服务
    ///
    /// # 参数
    ///
    /// * `scrapers` - 按结果顺序排列的抓取器
    /// * `settings` - 抓取配置
    /// * `filter` - 初级职位过滤器
    pub fn new(
        scrapers: Vec<Arc<dyn JobScraper>>,
        settings: &ScrapingSettings,
        filter: EntryLevelFilter,
    ) -> Self {
        Self {
            scrapers,
            cache: JobCache::new(settings.cache_ttl()),
            filter,
            parallel: settings.parallel_sources,
            source_timeout: settings.source_timeout(),
        }
    }

    /// 已注册的来源
    pub fn sources(&self) -> Vec<JobSource> {
        self.scrapers.iter().map(|s| s.source()).collect()
    }

    /// 搜索职位
    ///
    /// # 参数
    ///
    /// * `query` - 搜索条件
    /// * `sources` - 限定的来源，`None` 表示全部已注册来源，空切片直接返回空结果
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<JobPosting>)` - 去重并过滤后的职位列表
    /// * `Err(JobServiceError)` - 抓取任务异常终止
    pub async fn search(
        &self,
        query: &JobQuery,
        sources: Option<&[JobSource]>,
    ) -> Result<Vec<JobPosting>, JobServiceError> {
        let selected: Vec<Arc<dyn JobScraper>> = match sources {
            Some(sources) => self
                .scrapers
                .iter()
                .filter(|s| sources.contains(&s.source()))
                .cloned()
                .collect(),
            None => self.scrapers.clone(),
        };

        if selected.is_empty() {
            return Ok(Vec::new());
        }

        let cache_key = cache_key(query, &selected);
        if let Some(jobs) = self.cache.get(&cache_key) {
            info!("Serving {} cached jobs for {}", jobs.len(), cache_key);
            return Ok(jobs);
        }

        let start = Instant::now();
        let per_source = if self.parallel {
            join_all(
                selected
                    .iter()
                    .map(|scraper| self.run_source(scraper.clone(), query.clone())),
            )
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?
        } else {
            let mut results = Vec::with_capacity(selected.len());
            for scraper in &selected {
                results.push(self.run_source(scraper.clone(), query.clone()).await?);
            }
            results
        };

        let total: usize = per_source.iter().map(Vec::len).sum();
        let unique = JobDeduplicator::dedup(per_source.concat());
        let jobs = self.filter.apply(unique);

        info!(
            "Search \"{}\" in \"{}\": {} scraped, {} returned in {:?}",
            query.keyword,
            query.location,
            total,
            jobs.len(),
            start.elapsed()
        );

        self.cache.insert(cache_key, jobs.clone());
        Ok(jobs)
    }

    /// 运行单个抓取器，失败或超时降级为空列表
    ///
    /// 抓取在调用方的 future 内执行，调用方被丢弃时抓取随之取消
    async fn run_source(
        &self,
        scraper: Arc<dyn JobScraper>,
        query: JobQuery,
    ) -> Result<Vec<JobPosting>, JobServiceError> {
        let source = scraper.source();

        let scrape = async {
            match tokio::time::timeout(self.source_timeout, scraper.search(&query)).await {
                Ok(result) => result,
                Err(_) => Err(ScraperError::Timeout),
            }
        };

        let result = AssertUnwindSafe(scrape).catch_unwind().await.map_err(|panic| {
            JobServiceError::Internal(format!(
                "{} scraper panicked: {}",
                source,
                panic_message(&*panic)
            ))
        })?;

        match result {
            Ok(jobs) => {
                info!("{} returned {} jobs", source, jobs.len());
                Ok(jobs)
            }
            Err(e) => {
                warn!("{} scraper failed: {}", source, e);
                metrics::counter!("scraper_failures_total", "source" => source.key()).increment(1);
                Ok(Vec::new())
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn cache_key(query: &JobQuery, scrapers: &[Arc<dyn JobScraper>]) -> String {
    let sources: Vec<&str> = scrapers.iter().map(|s| s.source().key()).collect();
    format!("{}|{}", query.cache_key(), sources.join(","))
}
