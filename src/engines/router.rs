// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{EngineError, PageEngine, PageRequest, PageResponse};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// 引擎路由器
///
/// 按支持分数选择页面引擎，可重试的错误会降级到下一个引擎；
/// 全局信号量限制同时进行的页面请求数
pub struct EngineRouter {
    /// 引擎列表
    engines: Vec<Arc<dyn PageEngine>>,
    /// 并发请求许可
    permits: Semaphore,
}

impl EngineRouter {
    /// 创建新的引擎路由器
    ///
    /// # 参数
    ///
    /// * `engines` - 引擎列表
    /// * `max_concurrent_fetches` - 同时进行的页面请求上限
    ///
    /// # 返回值
    ///
    /// 返回新的引擎路由器实例
    pub fn new(engines: Vec<Arc<dyn PageEngine>>, max_concurrent_fetches: usize) -> Self {
        Self {
            engines,
            permits: Semaphore::new(max_concurrent_fetches.max(1)),
        }
    }

    /// 已注册的引擎名称
    pub fn engine_names(&self) -> Vec<&'static str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// 按支持分数从高到低排列候选引擎，分数为 0 的引擎不参与
    fn candidates(&self, request: &PageRequest) -> Vec<(u8, Arc<dyn PageEngine>)> {
        let mut candidates: Vec<(u8, Arc<dyn PageEngine>)> = self
            .engines
            .iter()
            .map(|engine| (engine.support_score(request), engine.clone()))
            .filter(|(score, _)| *score > 0)
            .collect();

        // 稳定排序，同分时保持注册顺序
        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        candidates
    }

    /// 路由请求到合适的引擎
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(PageResponse)` - 抓取响应
    /// * `Err(EngineError)` - 不可重试的错误，或所有候选引擎都失败时的最后一个错误
    pub async fn route(&self, request: &PageRequest) -> Result<PageResponse, EngineError> {
        let candidates = self.candidates(request);
        if candidates.is_empty() {
            warn!("No suitable engines available for request to {}", request.url);
            return Err(EngineError::AllEnginesFailed);
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| EngineError::Other("engine router closed".to_string()))?;

        let start_time = Instant::now();
        let mut last_error = None;

        for (score, engine) in candidates {
            let engine_name = engine.name();
            debug!(
                "Trying engine {} with score {} for request to {}",
                engine_name, score, request.url
            );

            match engine.fetch(request).await {
                Ok(response) => {
                    info!(
                        "Engine {} fetched {} in {:?}",
                        engine_name,
                        request.url,
                        start_time.elapsed()
                    );
                    return Ok(response);
                }
                Err(e) if e.is_retryable() || matches!(e, EngineError::Unsupported) => {
                    warn!(
                        "Engine {} failed with retryable error: {}, trying next engine",
                        engine_name, e
                    );
                    last_error = Some(e);
                }
                Err(e) => {
                    warn!("Engine {} failed with non-retryable error: {}", engine_name, e);
                    return Err(e);
                }
            }
        }

        warn!("All engines failed for request to {}", request.url);
        Err(last_error.unwrap_or(EngineError::AllEnginesFailed))
    }
}
