// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::services::job_service::JobService;
use crate::presentation::handlers::jobs_handler;
use crate::presentation::middleware::rate_limit_middleware::{rate_limit_middleware, RateLimiter};
use axum::{middleware, routing::get, Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 参数
///
/// * `service` - 职位聚合服务
/// * `settings` - 应用配置
/// * `rate_limiter` - 职位接口的速率限制器，`None` 表示不限制
///
/// # 返回值
///
/// 返回配置好的路由
pub fn app(
    service: Arc<JobService>,
    settings: Arc<Settings>,
    rate_limiter: Option<Arc<RateLimiter>>,
) -> Router {
    let mut job_routes = Router::new().route("/api/jobs", get(jobs_handler::get_jobs));
    if let Some(rate_limiter) = rate_limiter {
        job_routes = job_routes.route_layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));
    }

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version));

    Router::new()
        .merge(public_routes)
        .merge(job_routes)
        .layer(Extension(service))
        .layer(Extension(settings))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
