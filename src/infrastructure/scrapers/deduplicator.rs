// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::JobPosting;
use std::collections::HashSet;
use url::Url;

/// 不影响职位身份的跟踪参数
const TRACKING_PARAMS: &[&str] = &[
    "refid",
    "trackingid",
    "position",
    "pagenum",
    "trk",
    "tk",
    "from",
    "vjs",
];

/// 职位去重器
///
/// 以规范化后的链接作为去重键
#[derive(Debug, Default)]
pub struct JobDeduplicator {
    seen_links: HashSet<String>,
}

impl JobDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录职位，首次出现返回 true
    pub fn insert(&mut self, job: &JobPosting) -> bool {
        self.seen_links.insert(normalize_link(&job.link))
    }

    pub fn len(&self) -> usize {
        self.seen_links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen_links.is_empty()
    }

    /// 去除重复职位，保留首次出现的顺序
    pub fn dedup(jobs: Vec<JobPosting>) -> Vec<JobPosting> {
        let mut deduplicator = Self::new();
        jobs.into_iter()
            .filter(|job| deduplicator.insert(job))
            .collect()
    }
}

/// 规范化链接
///
/// 移除片段标识符、跟踪参数和末尾斜杠，主机名转小写；无法解析的链接只做去空格处理
pub fn normalize_link(link: &str) -> String {
    let trimmed = link.trim();
    let Ok(mut url) = Url::parse(trimmed) else {
        return trimmed.trim_end_matches('/').to_string();
    };

    url.set_fragment(None);

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| {
            let key = key.to_ascii_lowercase();
            !key.starts_with("utm_") && !TRACKING_PARAMS.contains(&key.as_str())
        })
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    // Url 已经把 scheme 和 host 转为小写
    url.to_string().trim_end_matches('/').to_string()
}
