// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：职位和查询条件
/// - 抓取接口（scraping）：各站点抓取器的统一抽象
/// - 服务（services）：结果聚合和过滤规则
pub mod models;
pub mod scraping;
pub mod services;
