// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::JobPosting;
use regex::Regex;

/// 初级职位过滤器
///
/// 标题中以完整单词形式出现任一资深关键词（忽略大小写）的职位会被排除
#[derive(Debug, Clone)]
pub struct EntryLevelFilter {
    pattern: Option<Regex>,
}

impl EntryLevelFilter {
    /// 创建过滤器，关键词列表为空时不过滤
    ///
    /// # 参数
    ///
    /// * `keywords` - 需要排除的资深职位关键词
    ///
    /// # 返回值
    ///
    /// * `Ok(EntryLevelFilter)` - 过滤器
    /// * `Err(regex::Error)` - 关键词无法组成正则表达式
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self::disabled());
        }

        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|")))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// 不做任何过滤的过滤器
    pub fn disabled() -> Self {
        Self { pattern: None }
    }

    /// 职位是否保留
    pub fn accepts(&self, job: &JobPosting) -> bool {
        self.pattern
            .as_ref()
            .map_or(true, |pattern| !pattern.is_match(&job.title))
    }

    pub fn apply(&self, jobs: Vec<JobPosting>) -> Vec<JobPosting> {
        if self.pattern.is_none() {
            return jobs;
        }
        jobs.into_iter().filter(|job| self.accepts(job)).collect()
    }
}
