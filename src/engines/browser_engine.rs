// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{EngineError, PageAction, PageEngine, PageRequest, PageResponse};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 等待选择器时的轮询间隔
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// 共享的浏览器实例及其事件处理任务
struct SharedBrowser {
    browser: Arc<Browser>,
    handler: JoinHandle<()>,
}

impl SharedBrowser {
    /// 事件处理任务结束意味着与浏览器的连接已断开
    fn is_alive(&self) -> bool {
        !self.handler.is_finished()
    }
}

/// 浏览器引擎
///
/// 基于chromiumoxide实现的浏览器自动化引擎。浏览器进程在首次使用时启动并在请求间复用，
/// 连接断开后下一次抓取会重新启动。每次抓取使用独立的标签页，标签页数量由信号量限制
pub struct BrowserEngine {
    settings: BrowserSettings,
    browser: Mutex<Option<SharedBrowser>>,
    tabs: Semaphore,
}

impl BrowserEngine {
    /// 创建新的浏览器引擎，不会立即启动浏览器
    ///
    /// # 参数
    ///
    /// * `settings` - 浏览器配置
    pub fn new(settings: BrowserSettings) -> Self {
        let tabs = Semaphore::new(settings.max_tabs.max(1));
        Self {
            settings,
            browser: Mutex::new(None),
            tabs,
        }
    }

    /// 获取共享的浏览器实例，尚未启动或连接已断开时重新启动
    async fn browser(&self) -> Result<Arc<Browser>, EngineError> {
        let mut shared = self.browser.lock().await;
        if let Some(current) = shared.as_ref() {
            if current.is_alive() {
                return Ok(current.browser.clone());
            }
            warn!("Browser connection lost, relaunching");
        }

        let (browser, mut handler) = if let Some(url) = &self.settings.remote_debugging_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url.as_str()).await.map_err(|e| {
                EngineError::Browser(format!("Failed to connect to remote Chrome: {}", e))
            })?
        } else {
            Browser::launch(self.launch_config()?)
                .await
                .map_err(|e| EngineError::Browser(format!("Failed to launch Chrome: {}", e)))?
        };

        // Spawn a handler to process browser events
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        info!("Browser ready");
        let browser = Arc::new(browser);
        *shared = Some(SharedBrowser {
            browser: browser.clone(),
            handler,
        });
        Ok(browser)
    }

    fn launch_config(&self) -> Result<BrowserConfig, EngineError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(Duration::from_secs(30))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-setuid-sandbox");

        if !self.settings.headless {
            builder = builder.with_head();
        }
        if self.settings.block_resources {
            builder = builder.arg("--blink-settings=imagesEnabled=false");
        }
        if let Some(path) = &self.settings.executable_path {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(EngineError::Browser)
    }

    async fn render(&self, page: &Page, request: &PageRequest) -> Result<String, EngineError> {
        page.set_user_agent(request.user_agent.as_str())
            .await
            .map_err(browser_error)?;
        page.goto(request.url.as_str()).await.map_err(browser_error)?;

        match wait_for_any(page, &request.wait_for, request.wait_timeout).await {
            Some(selector) => debug!("Content ready, matched selector {}", selector),
            None if !request.wait_for.is_empty() => {
                warn!("None of {:?} appeared on {}", request.wait_for, request.url)
            }
            None => {}
        }

        for action in &request.actions {
            run_action(page, action).await?;
        }

        page.content().await.map_err(browser_error)
    }
}

/// 轮询等待任意一个选择器出现
///
/// 返回首个匹配的选择器；超时返回 `None`，由调用方决定如何处理空页面
async fn wait_for_any(page: &Page, selectors: &[String], timeout: Duration) -> Option<String> {
    if selectors.is_empty() {
        return None;
    }

    let deadline = Instant::now() + timeout;
    loop {
        for selector in selectors {
            if page.find_element(selector.as_str()).await.is_ok() {
                return Some(selector.clone());
            }
        }
        if Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(WAIT_POLL_INTERVAL).await;
    }
}

async fn run_action(page: &Page, action: &PageAction) -> Result<(), EngineError> {
    match action {
        PageAction::Wait { milliseconds } => {
            tokio::time::sleep(Duration::from_millis(*milliseconds)).await;
        }
        PageAction::ClickAll { selector } => {
            if let Ok(elements) = page.find_elements(selector.as_str()).await {
                for element in elements {
                    if let Err(e) = element.click().await {
                        debug!("Ignoring failed click on {}: {}", selector, e);
                    }
                }
            }
        }
        PageAction::ScrollToBottom => {
            page.evaluate(SCROLL_TO_BOTTOM)
                .await
                .map_err(|e| EngineError::Browser(format!("Scroll failed: {}", e)))?;
        }
    }
    Ok(())
}

/// 在时限内完成标签页上的工作，无论成功、失败还是超时都执行清理
async fn within_then<T>(
    timeout: Duration,
    work: impl Future<Output = Result<T, EngineError>>,
    cleanup: impl Future<Output = ()>,
) -> Result<T, EngineError> {
    let result = tokio::time::timeout(timeout, work)
        .await
        .unwrap_or(Err(EngineError::Timeout));
    cleanup.await;
    result
}

async fn close_tab(page: Page) {
    if let Err(e) = page.close().await {
        debug!("Failed to close tab: {}", e);
    }
}

fn browser_error(e: chromiumoxide::error::CdpError) -> EngineError {
    EngineError::Browser(e.to_string())
}

#[async_trait]
impl PageEngine for BrowserEngine {
    /// 在独立标签页中渲染页面
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(PageResponse)` - 渲染后的HTML
    /// * `Err(EngineError)` - 浏览器错误或超时
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse, EngineError> {
        if !request.needs_js {
            return Err(EngineError::Unsupported);
        }

        let start = Instant::now();

        let _permit = tokio::time::timeout(request.timeout, self.tabs.acquire())
            .await
            .map_err(|_| EngineError::Timeout)?
            .map_err(|_| EngineError::Browser("tab pool closed".to_string()))?;

        let browser = self.browser().await?;
        let page = browser.new_page("about:blank").await.map_err(browser_error)?;

        let remaining = request.timeout.saturating_sub(start.elapsed());
        let result = within_then(
            remaining,
            async {
                let content = self.render(&page, request).await?;
                Ok::<_, EngineError>((content, page.url().await.ok().flatten()))
            },
            close_tab(page.clone()),
        )
        .await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!("engine_fetch_total", "engine" => self.name(), "outcome" => outcome)
            .increment(1);

        let (content, final_url) = result?;
        Ok(PageResponse {
            status_code: 200,
            content,
            final_url: final_url.unwrap_or_else(|| request.url.clone()),
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// 只处理需要JS渲染的请求
    fn support_score(&self, request: &PageRequest) -> u8 {
        if request.needs_js {
            100
        } else {
            0
        }
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}
