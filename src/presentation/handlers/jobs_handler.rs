// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{Extension, Json, Query};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::{
    application::dto::jobs_query::JobsQueryDto,
    config::settings::Settings,
    domain::{
        models::{job_posting::JobPosting, job_query::JobQuery},
        services::job_service::JobService,
    },
    presentation::errors::AppError,
};

/// 处理职位搜索请求
///
/// # 参数
///
/// * `service` - 职位聚合服务
/// * `settings` - 应用配置，提供缺省关键词和地点
/// * `params` - 查询参数
///
/// # 返回值
///
/// 返回职位列表的JSON数组
///
/// # 错误
///
/// - 参数过长或来源未知时返回 400
/// - 抓取任务异常时返回 500
pub async fn get_jobs(
    Extension(service): Extension<Arc<JobService>>,
    Extension(settings): Extension<Arc<Settings>>,
    Query(params): Query<JobsQueryDto>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    metrics::counter!("jobs_requests_total").increment(1);

    params.validate()?;
    let sources = params.parse_sources()?;

    let query = JobQuery::with_defaults(
        params.keyword.as_deref(),
        params.location.as_deref(),
        &settings.scraping.default_keyword,
        &settings.scraping.default_location,
    );
    info!(
        "Job search: keyword=\"{}\" location=\"{}\" sources={:?}",
        query.keyword, query.location, sources
    );

    let jobs = service.search(&query, sources.as_deref()).await?;
    Ok(Json(jobs))
}
