// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 包含与外部系统交互的技术实现：
/// - 缓存（cache）：进程内的职位结果缓存
/// - 指标（metrics）：Prometheus 指标导出
/// - 抓取器（scrapers）：各招聘站点的抓取实现
pub mod cache;
pub mod metrics;
pub mod scrapers;
