// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::engines::traits::{EngineError, PageEngine, PageRequest, PageResponse};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use std::time::Instant;

/// HTTP抓取引擎
///
/// 基于reqwest实现，只返回服务器下发的静态HTML
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建新的HTTP引擎
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestEngine)` - 引擎实例
    /// * `Err(EngineError)` - 客户端构建失败
    pub fn new() -> Result<Self, EngineError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageEngine for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(PageResponse)` - 2xx 响应
    /// * `Err(EngineError)` - 网络错误或非 2xx 状态码
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse, EngineError> {
        let start = Instant::now();
        let response = self
            .client
            .get(&request.url)
            .header(reqwest::header::USER_AGENT, &request.user_agent)
            .timeout(request.timeout)
            .send()
            .await?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            metrics::counter!("engine_fetch_total", "engine" => self.name(), "outcome" => "http_error")
                .increment(1);
            return Err(EngineError::HttpStatus(status.as_u16()));
        }

        let content = response.text().await?;
        metrics::counter!("engine_fetch_total", "engine" => self.name(), "outcome" => "ok")
            .increment(1);

        Ok(PageResponse {
            status_code: status.as_u16(),
            content,
            final_url,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// 不需要JS的请求优先使用；需要JS时仍可作为降级获取静态HTML
    fn support_score(&self, request: &PageRequest) -> u8 {
        if request.needs_js {
            return 10;
        }
        100
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}
