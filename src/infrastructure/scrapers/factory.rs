// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::models::job_posting::JobSource;
use crate::domain::scraping::scraper::{JobScraper, ScraperError};
use crate::engines::router::EngineRouter;
use crate::infrastructure::scrapers::alljobs::AllJobsSite;
use crate::infrastructure::scrapers::indeed::IndeedSite;
use crate::infrastructure::scrapers::linkedin::LinkedInSite;
use crate::infrastructure::scrapers::paged::PagedScraper;
use std::sync::Arc;
use tracing::info;

/// 按配置创建已启用的抓取器，顺序为 LinkedIn、AllJobs、Indeed
///
/// 未启用浏览器引擎时，需要浏览器的站点退回到静态抓取
///
/// # 参数
///
/// * `settings` - 应用配置
/// * `router` - 共享的页面引擎路由器
pub fn build_scrapers(
    settings: &Settings,
    router: Arc<EngineRouter>,
) -> Result<Vec<Arc<dyn JobScraper>>, ScraperError> {
    let mut scrapers: Vec<Arc<dyn JobScraper>> = Vec::new();

    for source in JobSource::ALL {
        let mut source_settings = settings.sources.get(source).clone();
        if !source_settings.enabled {
            info!("{} scraper disabled", source);
            continue;
        }
        source_settings.use_browser &= settings.browser.enabled;

        let scraper: Arc<dyn JobScraper> = match source {
            JobSource::LinkedIn => Arc::new(PagedScraper::new(
                LinkedInSite::new(&source_settings.base_url, source_settings.use_browser)?,
                router.clone(),
                source_settings,
            )),
            JobSource::AllJobs => Arc::new(PagedScraper::new(
                AllJobsSite::new(&source_settings.base_url)?,
                router.clone(),
                source_settings,
            )),
            JobSource::Indeed => Arc::new(PagedScraper::new(
                IndeedSite::new(&source_settings.base_url)?,
                router.clone(),
                source_settings,
            )),
        };
        scrapers.push(scraper);
    }

    info!(
        "Registered scrapers: {:?}",
        scrapers.iter().map(|s| s.source()).collect::<Vec<_>>()
    );
    Ok(scrapers)
}
