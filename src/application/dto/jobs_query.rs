// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::{JobSource, UnknownSource};
use serde::Deserialize;
use validator::Validate;

/// `GET /api/jobs` 的查询参数
#[derive(Debug, Default, Deserialize, Validate)]
pub struct JobsQueryDto {
    #[validate(length(max = 200, message = "keyword must be at most 200 characters"))]
    pub keyword: Option<String>,
    #[validate(length(max = 200, message = "location must be at most 200 characters"))]
    pub location: Option<String>,
    /// 逗号分隔的来源列表，例如 `linkedin,alljobs`
    pub sources: Option<String>,
}

impl JobsQueryDto {
    /// 解析来源列表
    ///
    /// # 返回值
    ///
    /// * `Ok(None)` - 未指定来源，使用全部来源
    /// * `Ok(Some(vec))` - 指定的来源，去重后保持原顺序；空字符串得到空列表
    /// * `Err(UnknownSource)` - 包含未知来源
    pub fn parse_sources(&self) -> Result<Option<Vec<JobSource>>, UnknownSource> {
        let Some(raw) = self.sources.as_deref() else {
            return Ok(None);
        };

        let mut sources = Vec::new();
        for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let source: JobSource = name.parse()?;
            if !sources.contains(&source) {
                sources.push(source);
            }
        }
        Ok(Some(sources))
    }
}
