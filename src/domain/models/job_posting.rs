// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 职位来源站点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobSource {
    #[serde(rename = "LinkedIn")]
    LinkedIn,
    #[serde(rename = "AllJobs")]
    AllJobs,
    #[serde(rename = "Indeed")]
    Indeed,
}

impl JobSource {
    /// 全部已知来源，按默认抓取顺序排列
    pub const ALL: [JobSource; 3] = [JobSource::LinkedIn, JobSource::AllJobs, JobSource::Indeed];

    /// 配置和查询参数中使用的小写标识
    pub fn key(&self) -> &'static str {
        match self {
            JobSource::LinkedIn => "linkedin",
            JobSource::AllJobs => "alljobs",
            JobSource::Indeed => "indeed",
        }
    }
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobSource::LinkedIn => "LinkedIn",
            JobSource::AllJobs => "AllJobs",
            JobSource::Indeed => "Indeed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown job source: {0}")]
pub struct UnknownSource(pub String);

impl FromStr for JobSource {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linkedin" => Ok(JobSource::LinkedIn),
            "alljobs" => Ok(JobSource::AllJobs),
            "indeed" => Ok(JobSource::Indeed),
            other => Err(UnknownSource(other.to_string())),
        }
    }
}

/// 职位信息
///
/// 一次抓取得到的单条职位记录，只在一次请求-响应周期内存在
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    /// 职位链接，同时作为去重键
    pub link: String,
    pub source: JobSource,
    /// 站点给出的相对时间文本，例如 "2 hours ago"
    #[serde(
        default,
        alias = "dateTime",
        alias = "date",
        skip_serializing_if = "Option::is_none"
    )]
    pub posted_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JobPosting {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        link: impl Into<String>,
        source: JobSource,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            location: location.into(),
            link: link.into(),
            source,
            posted_at: None,
            description: None,
        }
    }

    pub fn with_posted_at(mut self, posted_at: Option<String>) -> Self {
        self.posted_at = posted_at;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}
