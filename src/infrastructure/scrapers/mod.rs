// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 招聘站点抓取器
///
/// 各站点只负责构建搜索地址和解析结果页，分页、重试和去重由 `paged` 统一处理
pub mod alljobs;
pub mod deduplicator;
pub mod factory;
pub mod html;
pub mod indeed;
pub mod linkedin;
pub mod paged;
