//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::errors::{ErrorCategory, ErrorKind, UrlVaultError};

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    kind: Option<ErrorKind>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            kind,
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", None, Some(data))
}

/// 构建 201 Created 响应
pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(
        StatusCode::CREATED,
        ErrorCode::Success,
        "Created",
        None,
        Some(data),
    )
}

/// 错误对应的 HTTP 状态码
pub fn status_for(err: &UrlVaultError) -> StatusCode {
    match err.category() {
        ErrorCategory::Validation => StatusCode::BAD_REQUEST,
        ErrorCategory::Conflict => StatusCode::CONFLICT,
        ErrorCategory::NotFound => StatusCode::NOT_FOUND,
        ErrorCategory::Auth if err.kind() == ErrorKind::AdminRequired => StatusCode::FORBIDDEN,
        ErrorCategory::Auth => StatusCode::UNAUTHORIZED,
        ErrorCategory::Capacity => StatusCode::FORBIDDEN,
        ErrorCategory::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 从 UrlVaultError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
///
/// 存储类错误只记录日志，对外统一返回笼统信息。
pub fn error_from_vault(err: &UrlVaultError) -> HttpResponse {
    let status = status_for(err);
    let message = if err.category() == ErrorCategory::Storage {
        error!("Internal error while handling request: {}", err);
        "Internal server error"
    } else {
        err.message()
    };

    let mut builder = HttpResponse::build(status);
    if status == StatusCode::UNAUTHORIZED {
        builder.append_header(("WWW-Authenticate", "Bearer"));
    }
    builder
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse::<()> {
            code: ErrorCode::from(err) as i32,
            message: message.to_string(),
            kind: Some(err.kind()),
            data: None,
        })
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 UrlVaultError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<UrlVaultError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_vault(&e.into()),
    }
}

impl ResponseError for UrlVaultError {
    fn status_code(&self) -> StatusCode {
        status_for(self)
    }

    fn error_response(&self) -> HttpResponse {
        error_from_vault(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&UrlVaultError::invalid_url("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&UrlVaultError::custom_code_taken("x")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&UrlVaultError::empty("x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&UrlVaultError::token_expired("x")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&UrlVaultError::admin_required("x")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(&UrlVaultError::quota_exceeded("x")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(&UrlVaultError::database_operation("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_carries_bearer_challenge() {
        let resp = error_from_vault(&UrlVaultError::missing_token("Not authenticated"));
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get("WWW-Authenticate").unwrap(),
            "Bearer"
        );

        let resp = error_from_vault(&UrlVaultError::admin_required("nope"));
        assert!(resp.headers().get("WWW-Authenticate").is_none());
    }
}
