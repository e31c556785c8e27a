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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::models::job_posting::JobSource;

/// 应用程序配置设置
///
/// 包含服务器、速率限制、抓取、浏览器、过滤和各站点的所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 速率限制配置
    pub rate_limiting: RateLimitingSettings,
    /// 抓取配置
    pub scraping: ScrapingSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 职位过滤配置
    pub filter: FilterSettings,
    /// 各站点配置
    pub sources: SourcesSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 速率限制配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitingSettings {
    /// 是否启用速率限制
    pub enabled: bool,
    /// 每个客户端每分钟请求数限制
    pub requests_per_minute: u32,
}

/// 抓取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapingSettings {
    /// 缺省关键词
    pub default_keyword: String,
    /// 缺省地点
    pub default_location: String,
    /// 是否并行抓取各站点
    pub parallel_sources: bool,
    /// 单个站点的总超时时间（秒）
    pub source_timeout_secs: u64,
    /// 全局同时进行的页面请求数
    pub max_concurrent_fetches: usize,
    /// 结果缓存时间（秒），0 表示不缓存
    pub cache_ttl_secs: u64,
}

impl ScrapingSettings {
    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否启用浏览器引擎
    pub enabled: bool,
    /// 远程调试地址，设置后连接已有的 Chrome 而不是启动新进程
    pub remote_debugging_url: Option<String>,
    /// Chrome 可执行文件路径
    pub executable_path: Option<String>,
    /// 是否无头模式
    pub headless: bool,
    /// 同时打开的标签页上限
    pub max_tabs: usize,
    /// 是否禁止加载图片
    pub block_resources: bool,
}

/// 职位过滤配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSettings {
    /// 标题中出现即排除的资深职位关键词
    pub exclude_title_keywords: Vec<String>,
}

/// 单个站点配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    /// 是否启用
    pub enabled: bool,
    /// 站点根地址
    pub base_url: String,
    /// 最多抓取的页数
    pub max_pages: u32,
    /// 最多收集的职位数
    pub max_jobs: usize,
    /// 连续多少页没有新职位后停止
    pub max_idle_pages: u32,
    /// 翻页间隔（毫秒）
    pub page_delay_ms: u64,
    /// 每页导航尝试次数
    pub retries: u32,
    /// 单页导航超时（秒）
    pub navigation_timeout_secs: u64,
    /// 是否需要浏览器渲染
    pub use_browser: bool,
}

impl SourceSettings {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

/// 各站点配置
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesSettings {
    pub linkedin: SourceSettings,
    pub alljobs: SourceSettings,
    pub indeed: SourceSettings,
}

impl SourcesSettings {
    /// 获取指定来源的配置
    pub fn get(&self, source: JobSource) -> &SourceSettings {
        match source {
            JobSource::LinkedIn => &self.linkedin,
            JobSource::AllJobs => &self.alljobs,
            JobSource::Indeed => &self.indeed,
        }
    }
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载内置默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和 `JOBRS__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("JOBRS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("filter.exclude_title_keywords")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值的配置，不读取文件和环境变量
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let builder = Config::builder()
            // Server
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Rate limiting
            .set_default("rate_limiting.enabled", true)?
            .set_default("rate_limiting.requests_per_minute", 5)?
            // Scraping
            .set_default("scraping.default_keyword", "developer")?
            .set_default("scraping.default_location", "Israel")?
            .set_default("scraping.parallel_sources", true)?
            .set_default("scraping.source_timeout_secs", 180)?
            .set_default("scraping.max_concurrent_fetches", 4)?
            .set_default("scraping.cache_ttl_secs", 300)?
            // Browser
            .set_default("browser.enabled", false)?
            .set_default("browser.headless", true)?
            .set_default("browser.max_tabs", 2)?
            .set_default("browser.block_resources", true)?
            // Filter
            .set_default(
                "filter.exclude_title_keywords",
                vec![
                    "senior",
                    "sr",
                    "lead",
                    "principal",
                    "staff",
                    "manager",
                    "director",
                    "head",
                    "architect",
                    "vp",
                ],
            )?
            // Metrics
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?;

        let builder = source_defaults(builder, "linkedin", "https://www.linkedin.com", 8, 200, 2, 1500, false)?;
        let builder = source_defaults(builder, "alljobs", "https://www.alljobs.co.il", 10, 500, 1, 3500, true)?;
        source_defaults(builder, "indeed", "https://il.indeed.com", 5, 150, 1, 2500, false)
    }
}

#[allow(clippy::too_many_arguments)]
fn source_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    name: &str,
    base_url: &str,
    max_pages: u32,
    max_jobs: u32,
    max_idle_pages: u32,
    page_delay_ms: u32,
    use_browser: bool,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    let key = |field: &str| format!("sources.{}.{}", name, field);
    builder
        .set_default(key("enabled"), true)?
        .set_default(key("base_url"), base_url)?
        .set_default(key("max_pages"), max_pages)?
        .set_default(key("max_jobs"), max_jobs)?
        .set_default(key("max_idle_pages"), max_idle_pages)?
        .set_default(key("page_delay_ms"), page_delay_ms)?
        .set_default(key("retries"), 2)?
        .set_default(key("navigation_timeout_secs"), 60)?
        .set_default(key("use_browser"), use_browser)
}
