// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::{JobPosting, JobSource};
use crate::domain::models::job_query::JobQuery;
use crate::domain::scraping::scraper::ScraperError;
use crate::engines::traits::PageAction;
use crate::infrastructure::scrapers::html::{self, attr_of, text_of, NOT_AVAILABLE};
use crate::infrastructure::scrapers::paged::{JobSite, PageHints};
use scraper::{Html, Selector};
use url::Url;

/// 每页职位数
const PAGE_SIZE: u32 = 25;

/// 只看最近 24 小时、实习和初级职位，按时间排序
const RECENT_ENTRY_LEVEL: &str = "f_TPR=r86400&f_E=1%2C2&sortBy=DD";

/// LinkedIn 职位搜索
///
/// 静态模式使用游客接口返回的卡片片段，浏览器模式渲染公开搜索页并展开无限滚动
pub struct LinkedInSite {
    base_url: String,
    use_browser: bool,
    card: Selector,
    title: Selector,
    company: Selector,
    location: Selector,
    link: Selector,
    date: Selector,
    time: Selector,
}

impl LinkedInSite {
    /// 创建 LinkedIn 站点描述
    ///
    /// # 参数
    ///
    /// * `base_url` - 站点根地址
    /// * `use_browser` - 是否通过浏览器渲染搜索页
    pub fn new(base_url: &str, use_browser: bool) -> Result<Self, ScraperError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            use_browser,
            card: html::compile("ul.jobs-search__results-list li, .base-card")?,
            title: html::compile(".base-search-card__title")?,
            company: html::compile(".base-search-card__subtitle")?,
            location: html::compile(".job-search-card__location")?,
            link: html::compile("a[href]")?,
            date: html::compile(".job-search-card__listdate, .job-search-card__listdate--new")?,
            time: html::compile("time")?,
        })
    }
}

impl JobSite for LinkedInSite {
    fn source(&self) -> JobSource {
        JobSource::LinkedIn
    }

    fn page_url(&self, query: &JobQuery, page: u32) -> String {
        let path = if self.use_browser {
            "jobs/search/"
        } else {
            "jobs-guest/jobs/api/seeMoreJobPostings/search"
        };
        format!(
            "{}/{}?keywords={}&location={}&{}&start={}",
            self.base_url,
            path,
            urlencoding::encode(&query.keyword),
            urlencoding::encode(&query.location),
            RECENT_ENTRY_LEVEL,
            page * PAGE_SIZE
        )
    }

    fn page_hints(&self) -> PageHints {
        PageHints {
            wait_for: vec![
                "ul.jobs-search__results-list".to_string(),
                ".base-card".to_string(),
            ],
            actions: vec![
                PageAction::ScrollToBottom,
                PageAction::ClickAll {
                    selector: "button.infinite-scroller__show-more-button".to_string(),
                },
                PageAction::Wait { milliseconds: 1500 },
            ],
        }
    }

    fn parse_page(&self, page_html: &str, page_url: &str) -> Vec<JobPosting> {
        let document = Html::parse_document(page_html);
        let base = Url::parse(page_url).ok();

        // 结果列表的 li 和内部的 .base-card 可能同时命中，同一卡片由去重器合并
        document
            .select(&self.card)
            .filter_map(|card| {
                let title = text_of(card, &self.title)?;
                let company = text_of(card, &self.company)?;
                let href = attr_of(card, &self.link, "href")?;
                let link = html::resolve_link(base.as_ref(), &href)?;
                let location = text_of(card, &self.location).unwrap_or_else(|| NOT_AVAILABLE.to_string());
                let posted_at = text_of(card, &self.date).or_else(|| text_of(card, &self.time));

                Some(
                    JobPosting::new(title, company, location, link, JobSource::LinkedIn)
                        .with_posted_at(posted_at),
                )
            })
            .collect()
    }
}
