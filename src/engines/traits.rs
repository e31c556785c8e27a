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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 默认桌面浏览器 User-Agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功的HTTP状态码
    #[error("Unexpected HTTP status {0}")]
    HttpStatus(u16),
    /// 浏览器操作失败
    #[error("Browser error: {0}")]
    Browser(String),
    /// 引擎不支持该请求
    #[error("Request not supported by engine")]
    Unsupported,
    /// 所有引擎都失败
    #[error("All engines failed")]
    AllEnginesFailed,
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 判断错误是否可重试
    ///
    /// 超时、连接失败、5xx 和 429 视为暂时性错误；403 等其余 4xx 视为被站点拒绝
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::RequestFailed(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            EngineError::HttpStatus(status) => *status == 429 || (500..600).contains(status),
            EngineError::Browser(_) => true,
            EngineError::Timeout => true,
            _ => false,
        }
    }
}

/// 页面交互动作
#[derive(Debug, Clone, PartialEq)]
pub enum PageAction {
    /// 等待指定毫秒
    Wait { milliseconds: u64 },
    /// 点击所有匹配的元素，忽略单个失败
    ClickAll { selector: String },
    /// 滚动到页面底部
    ScrollToBottom,
}

/// 页面抓取请求
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// 目标URL
    pub url: String,
    /// 超时时间
    pub timeout: Duration,
    /// 是否需要JavaScript渲染
    pub needs_js: bool,
    /// 等待出现的选择器，任意一个出现即视为内容就绪
    pub wait_for: Vec<String>,
    /// 等待选择器的最长时间
    pub wait_timeout: Duration,
    /// 内容就绪后执行的动作
    pub actions: Vec<PageAction>,
    /// User-Agent
    pub user_agent: String,
}

impl PageRequest {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
            needs_js: false,
            wait_for: Vec::new(),
            wait_timeout: Duration::from_secs(20),
            actions: Vec::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// 页面抓取响应
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 页面HTML
    pub content: String,
    /// 跳转后的最终URL
    pub final_url: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 页面抓取引擎特质
#[async_trait]
pub trait PageEngine: Send + Sync {
    /// 获取页面内容
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse, EngineError>;

    /// 计算对请求的支持分数（0-100），0 表示不支持
    fn support_score(&self, request: &PageRequest) -> u8;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
