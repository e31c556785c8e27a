// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::{JobPosting, JobSource};
use crate::domain::models::job_query::JobQuery;
use crate::engines::traits::EngineError;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("Blocked by site: {0}")]
    Blocked(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Timeout")]
    Timeout,
}

/// 职位抓取器
///
/// 每个实现负责一个来源站点
#[async_trait]
pub trait JobScraper: Send + Sync {
    /// 按关键词和地点搜索职位
    async fn search(&self, query: &JobQuery) -> Result<Vec<JobPosting>, ScraperError>;

    /// 来源站点
    fn source(&self) -> JobSource;
}
