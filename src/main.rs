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

use jobrs::config::settings::Settings;
use jobrs::domain::services::entry_level_filter::EntryLevelFilter;
use jobrs::domain::services::job_service::JobService;
use jobrs::engines::browser_engine::BrowserEngine;
use jobrs::engines::reqwest_engine::ReqwestEngine;
use jobrs::engines::router::EngineRouter;
use jobrs::engines::traits::PageEngine;
use jobrs::infrastructure::scrapers::factory::build_scrapers;
use jobrs::presentation::middleware::rate_limit_middleware::RateLimiter;
use jobrs::presentation::routes;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use jobrs::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting jobrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    if settings.metrics.enabled {
        jobrs::infrastructure::metrics::init_metrics(&settings.metrics.listen_addr);
    }

    // 3. Initialize Engines
    let mut engines: Vec<Arc<dyn PageEngine>> = vec![Arc::new(ReqwestEngine::new()?)];
    if settings.browser.enabled {
        engines.push(Arc::new(BrowserEngine::new(settings.browser.clone())));
    }
    let router = Arc::new(EngineRouter::new(
        engines,
        settings.scraping.max_concurrent_fetches,
    ));
    info!("Engines initialized: {:?}", router.engine_names());

    // 4. Initialize Scrapers and Service
    let scrapers = build_scrapers(&settings, router)?;
    let filter = EntryLevelFilter::new(&settings.filter.exclude_title_keywords)?;
    let service = Arc::new(JobService::new(scrapers, &settings.scraping, filter));

    // 5. Initialize Rate Limiter
    let rate_limiter = if settings.rate_limiting.enabled {
        info!(
            "Rate limiting /api/jobs to {} requests per minute per client",
            settings.rate_limiting.requests_per_minute
        );
        Some(Arc::new(RateLimiter::new(
            settings.rate_limiting.requests_per_minute,
        )?))
    } else {
        None
    };

    // 6. Start HTTP server
    let app = routes::app(service, settings.clone(), rate_limiter);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
