// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::{JobPosting, JobSource};
use crate::domain::models::job_query::JobQuery;
use crate::domain::scraping::scraper::ScraperError;
use crate::infrastructure::scrapers::html::{self, attr_of, text_of, NOT_AVAILABLE};
use crate::infrastructure::scrapers::paged::{JobSite, PageHints};
use scraper::{Html, Selector};
use url::Url;

const PRIMARY_CARD: &str = ".open-board-item";
const FALLBACK_CARDS: &str = ".job-item, .job-card, .result, .searchResultItem";

/// AllJobs 游客搜索页
///
/// 结果页受 Turnstile 保护，配置浏览器时通过浏览器渲染
pub struct AllJobsSite {
    base_url: String,
    card: Selector,
    fallback_card: Selector,
    title: Selector,
    company: Selector,
    location: Selector,
    date: Selector,
    description: Selector,
}

impl AllJobsSite {
    /// 创建 AllJobs 站点描述
    ///
    /// # 参数
    ///
    /// * `base_url` - 站点根地址
    pub fn new(base_url: &str) -> Result<Self, ScraperError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            card: html::compile(PRIMARY_CARD)?,
            fallback_card: html::compile(FALLBACK_CARDS)?,
            title: html::compile(".job-content-top-title a, a.job-title, .job-title a")?,
            company: html::compile(".job-company-name, .company, .employer")?,
            location: html::compile(".job-content-top-location, .job-location, .location")?,
            date: html::compile(".job-date, .date, .posted-date")?,
            description: html::compile(".job-content-description, .short-description, .desc")?,
        })
    }
}

impl JobSite for AllJobsSite {
    fn source(&self) -> JobSource {
        JobSource::AllJobs
    }

    /// AllJobs 的页码从 1 开始
    fn page_url(&self, query: &JobQuery, page: u32) -> String {
        format!(
            "{}/SearchResultsGuest.aspx?keywords={}&location={}&duration=0&fdate=1&page={}&position=&type=&region=",
            self.base_url,
            urlencoding::encode(&query.keyword),
            urlencoding::encode(&query.location),
            page + 1
        )
    }

    fn page_hints(&self) -> PageHints {
        let mut wait_for = vec![PRIMARY_CARD.to_string()];
        wait_for.extend(FALLBACK_CARDS.split(", ").map(str::to_string));
        PageHints {
            wait_for,
            actions: Vec::new(),
        }
    }

    fn parse_page(&self, page_html: &str, page_url: &str) -> Vec<JobPosting> {
        let document = Html::parse_document(page_html);
        let base = Url::parse(page_url).ok();

        html::select_cards(&document, &self.card, Some(&self.fallback_card))
            .into_iter()
            .filter_map(|card| {
                let title = text_of(card, &self.title)?;
                let href = attr_of(card, &self.title, "href")?;
                let link = html::resolve_link(base.as_ref(), &href)?;
                let company = text_of(card, &self.company).unwrap_or_else(|| NOT_AVAILABLE.to_string());
                let location =
                    text_of(card, &self.location).unwrap_or_else(|| NOT_AVAILABLE.to_string());

                Some(
                    JobPosting::new(title, company, location, link, JobSource::AllJobs)
                        .with_posted_at(text_of(card, &self.date))
                        .with_description(text_of(card, &self.description)),
                )
            })
            .collect()
    }
}
