// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::domain::models::job_posting::UnknownSource;
use crate::domain::services::job_service::JobServiceError;

/// 抓取失败时返回给客户端的消息
pub const FETCH_FAILED_MESSAGE: &str = "Error fetching jobs";

/// 应用错误类型
///
/// 封装所有可能的应用层错误，统一转换为 `{"error": ...}` 响应
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = if self.0.downcast_ref::<validator::ValidationErrors>().is_some()
            || self.0.downcast_ref::<UnknownSource>().is_some()
        {
            (StatusCode::BAD_REQUEST, self.0.to_string())
        } else if self.0.downcast_ref::<JobServiceError>().is_some() {
            error!("Job search failed: {:#}", self.0);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                FETCH_FAILED_MESSAGE.to_string(),
            )
        } else {
            error!("Request failed: {:#}", self.0);
            (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string())
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
