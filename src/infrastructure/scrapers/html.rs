// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::scraping::scraper::ScraperError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// 缺失字段的占位值
pub const NOT_AVAILABLE: &str = "N/A";

/// 编译CSS选择器
pub fn compile(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::Parse(format!("invalid selector {css}: {e}")))
}

/// 合并空白并去除首尾空格
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 元素内首个匹配节点的可见文本，空文本视为缺失
pub fn text_of(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .map(|node| clean_text(&node.text().collect::<String>()))
        .find(|text| !text.is_empty())
}

/// 元素内首个带有指定属性的匹配节点的属性值
pub fn attr_of(element: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .filter_map(|node| node.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// 选择职位卡片，主选择器无结果时使用备用选择器
pub fn select_cards<'a>(
    document: &'a Html,
    primary: &Selector,
    fallback: Option<&Selector>,
) -> Vec<ElementRef<'a>> {
    let cards: Vec<ElementRef<'a>> = document.select(primary).collect();
    match fallback {
        Some(fallback) if cards.is_empty() => document.select(fallback).collect(),
        _ => cards,
    }
}

/// 将相对链接解析为绝对地址，只接受 http/https
pub fn resolve_link(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(_) => base?.join(href).ok()?,
    };

    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

/// 常见的反爬挑战页特征
const CHALLENGE_MARKERS: &[&str] = &[
    "cf-turnstile",
    "challenge-platform",
    "cf-chl-",
    "Just a moment...",
    "captcha-delivery",
    "authwall",
];

/// 页面是否是挑战页或登录墙
pub fn looks_blocked(html: &str) -> bool {
    CHALLENGE_MARKERS.iter().any(|marker| html.contains(marker))
}
