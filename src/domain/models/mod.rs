// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 职位信息（job_posting）：抓取到的单条职位记录及其来源
/// - 搜索条件（job_query）：关键词与地点
pub mod job_posting;
pub mod job_query;
