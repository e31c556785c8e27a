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

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::warn;

/// 超出限制时返回给客户端的消息
pub const TOO_MANY_REQUESTS_MESSAGE: &str = "Too many requests, please try again later.";

/// 计数窗口长度
const WINDOW: Duration = Duration::from_secs(60);

/// 超过该数量的客户端状态时清理已过期的窗口
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// 速率限制错误类型
#[derive(Error, Debug, PartialEq)]
pub enum RateLimitError {
    /// 请求过多错误
    #[error("Too many requests, retry after {0:?}")]
    TooManyRequests(Duration),

    /// 配置错误
    #[error("Invalid rate limit: {0} requests per minute")]
    InvalidQuota(u32),
}

/// 按客户端计数的固定窗口速率限制器
///
/// 每个客户端的窗口从其首个请求开始，窗口内最多放行 `requests_per_minute` 个请求，
/// 窗口结束后计数清零
pub struct RateLimiter {
    requests_per_minute: u32,
    windows: DashMap<String, (Instant, u32)>,
}

impl RateLimiter {
    /// 创建新的速率限制器实例
    ///
    /// # 参数
    ///
    /// * `requests_per_minute` - 每个客户端每分钟请求数限制
    ///
    /// # 返回值
    ///
    /// * `Ok(RateLimiter)` - 速率限制器
    /// * `Err(RateLimitError)` - 限制值为 0
    pub fn new(requests_per_minute: u32) -> Result<Self, RateLimitError> {
        if requests_per_minute == 0 {
            return Err(RateLimitError::InvalidQuota(requests_per_minute));
        }
        Ok(Self {
            requests_per_minute,
            windows: DashMap::new(),
        })
    }

    /// 检查客户端的请求速率是否超出限制
    ///
    /// # 参数
    ///
    /// * `client` - 客户端标识
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 请求未超出限制
    /// * `Err(RateLimitError::TooManyRequests)` - 超出限制，附带当前窗口剩余的时间
    pub fn check(&self, client: &str) -> Result<(), RateLimitError> {
        let now = Instant::now();
        if self.windows.len() > MAX_TRACKED_CLIENTS {
            self.windows
                .retain(|_, (started, _)| now.duration_since(*started) < WINDOW);
        }

        let mut entry = self.windows.entry(client.to_string()).or_insert((now, 0));
        let (started, count) = entry.value_mut();

        if now.duration_since(*started) >= WINDOW {
            *started = now;
            *count = 0;
        }

        if *count >= self.requests_per_minute {
            let remaining = WINDOW.saturating_sub(now.duration_since(*started));
            return Err(RateLimitError::TooManyRequests(remaining));
        }

        *count += 1;
        Ok(())
    }
}

/// 识别客户端：优先使用 `X-Forwarded-For` 中的第一个地址，其次是连接的对端地址
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// 速率限制中间件
///
/// # 参数
///
/// * `rate_limiter` - 速率限制器
/// * `request` - HTTP请求
/// * `next` - 下一个中间件
///
/// # 返回值
///
/// 未超出限制时返回下游响应，否则返回 429 和 `Retry-After` 头
pub async fn rate_limit_middleware(
    State(rate_limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_key(request.headers(), peer);

    match rate_limiter.check(&client) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            warn!("Rate limit exceeded for client {}: {}", client, e);
            metrics::counter!("rate_limited_total").increment(1);
            too_many_requests(&e)
        }
    }
}

fn too_many_requests(error: &RateLimitError) -> Response {
    let retry_after = match error {
        RateLimitError::TooManyRequests(wait) => wait.as_secs_f64().ceil().max(1.0) as u64,
        RateLimitError::InvalidQuota(_) => 60,
    };

    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "error": TOO_MANY_REQUESTS_MESSAGE })),
    )
        .into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}
