// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 职位聚合服务（job_service）：分发查询、合并去重各站点结果
/// - 初级职位过滤（entry_level_filter）：按标题排除资深职位
pub mod entry_level_filter;
pub mod job_service;
