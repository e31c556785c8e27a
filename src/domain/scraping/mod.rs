// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 抓取领域模块
///
/// 定义职位抓取器接口和抓取错误
pub mod scraper;
