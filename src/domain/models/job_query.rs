// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 职位搜索条件
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobQuery {
    /// 职位关键词
    pub keyword: String,
    /// 地点
    pub location: String,
}

impl JobQuery {
    pub fn new(keyword: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            location: location.into(),
        }
    }

    /// 使用默认值补全缺失或空白的字段
    ///
    /// # 参数
    ///
    /// * `keyword` - 请求中的关键词
    /// * `location` - 请求中的地点
    /// * `default_keyword` - 默认关键词
    /// * `default_location` - 默认地点
    pub fn with_defaults(
        keyword: Option<&str>,
        location: Option<&str>,
        default_keyword: &str,
        default_location: &str,
    ) -> Self {
        let pick = |value: Option<&str>, fallback: &str| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };

        Self {
            keyword: pick(keyword, default_keyword),
            location: pick(location, default_location),
        }
    }

    /// 缓存键，忽略大小写
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}",
            self.keyword.to_lowercase(),
            self.location.to_lowercase()
        )
    }
}
