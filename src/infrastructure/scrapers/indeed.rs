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

/// 每页职位数
const PAGE_SIZE: u32 = 10;

/// 入门级经验过滤器
const ENTRY_LEVEL_FILTER: &str = "0kf%3Aexplvl%28ENTRY_LEVEL%29%3B";

/// Indeed 职位搜索
pub struct IndeedSite {
    base_url: String,
    card: Selector,
    fallback_card: Selector,
    title: Selector,
    link: Selector,
    job_key: Selector,
    company: Selector,
    location: Selector,
    date: Selector,
}

impl IndeedSite {
    /// 创建 Indeed 站点描述
    ///
    /// # 参数
    ///
    /// * `base_url` - 站点根地址，例如 `https://il.indeed.com`
    pub fn new(base_url: &str) -> Result<Self, ScraperError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            card: html::compile("div.job_seen_beacon")?,
            fallback_card: html::compile("td.resultContent, li div.cardOutline")?,
            title: html::compile("h2.jobTitle span[title], h2.jobTitle span, h2.jobTitle a")?,
            link: html::compile("h2.jobTitle a[href]")?,
            job_key: html::compile("a[data-jk]")?,
            company: html::compile("[data-testid='company-name'], span.companyName")?,
            location: html::compile("[data-testid='text-location'], div.companyLocation")?,
            date: html::compile("span.date")?,
        })
    }

    fn card_link(&self, card: scraper::ElementRef<'_>, base: Option<&Url>) -> Option<String> {
        if let Some(link) = attr_of(card, &self.link, "href")
            .and_then(|href| html::resolve_link(base, &href))
        {
            return Some(link);
        }
        attr_of(card, &self.job_key, "data-jk").map(|jk| {
            format!("{}/viewjob?jk={}", self.base_url, urlencoding::encode(&jk))
        })
    }
}

impl JobSite for IndeedSite {
    fn source(&self) -> JobSource {
        JobSource::Indeed
    }

    fn page_url(&self, query: &JobQuery, page: u32) -> String {
        format!(
            "{}/jobs?q={}&l={}&fromage=1&sc={}&sort=date&start={}",
            self.base_url,
            urlencoding::encode(&query.keyword),
            urlencoding::encode(&query.location),
            ENTRY_LEVEL_FILTER,
            page * PAGE_SIZE
        )
    }

    fn page_hints(&self) -> PageHints {
        PageHints {
            wait_for: vec![
                "div.job_seen_beacon".to_string(),
                "td.resultContent".to_string(),
            ],
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
                let link = self.card_link(card, base.as_ref())?;
                let company = text_of(card, &self.company).unwrap_or_else(|| NOT_AVAILABLE.to_string());
                let location =
                    text_of(card, &self.location).unwrap_or_else(|| NOT_AVAILABLE.to_string());

                Some(
                    JobPosting::new(title, company, location, link, JobSource::Indeed)
                        .with_posted_at(text_of(card, &self.date)),
                )
            })
            .collect()
    }
}
