//! 反馈服务错误类型定义
//!
//! 所有处理器错误最终都转换为 [`AppError`]，再统一映射为 HTTP 状态码和响应信封。
//! 内部错误详情不直接写入响应体，而是作为响应扩展携带，
//! 由 [`attach_error_detail`] 中间件根据部署环境决定是否合并到 `error` 字段。

use axum::{
    Json,
    body::Body,
    extract::{Request, State, rejection::JsonRejection},
    http::{StatusCode, header::CONTENT_LENGTH},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::any::Any;

use crate::dto::ApiResponse;
use crate::repository::StoreError;
use crate::state::AppState;
use crate::validation::FieldError;

pub const MSG_VALIDATION_FAILED: &str = "Validation failed";
pub const MSG_FEEDBACK_NOT_FOUND: &str = "Feedback not found";
pub const MSG_INTERNAL: &str = "Internal server error";

/// 错误详情响应体的读取上限
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// 反馈服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("参数验证失败: {0:?}")]
    Validation(Vec<FieldError>),

    #[error("反馈不存在")]
    FeedbackNotFound,

    #[error("列表过滤条件无效: {0}")]
    InvalidFilter(String),

    #[error("存储错误: {0}")]
    Store(#[from] StoreError),

    #[error("路由不存在: {method} {path}")]
    RouteNotFound { method: String, path: String },

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 附带在错误响应上的内部错误详情
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl AppError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            Self::FeedbackNotFound | Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Store(err) => match err {
                StoreError::UniqueViolation(_) => StatusCode::CONFLICT,
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::Query(_) | StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                StoreError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回面向客户端的提示信息
    pub fn message(&self) -> String {
        match self {
            Self::Validation(_) => MSG_VALIDATION_FAILED.to_string(),
            Self::FeedbackNotFound => MSG_FEEDBACK_NOT_FOUND.to_string(),
            Self::InvalidFilter(_) => "Validation error".to_string(),
            Self::Store(err) => match err {
                StoreError::UniqueViolation(_) => "A record with this data already exists",
                StoreError::NotFound => "Record not found",
                StoreError::Query(_) => "Database error occurred",
                StoreError::InvalidInput(_) => "Validation error",
                StoreError::Unavailable(_) => MSG_INTERNAL,
            }
            .to_string(),
            Self::RouteNotFound { method, path } => format!("Route not found: {} {}", method, path),
            Self::Internal(msg) if msg.is_empty() => MSG_INTERNAL.to_string(),
            Self::Internal(msg) => msg.clone(),
        }
    }

    /// 内部错误详情，仅在非生产环境对外暴露
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Store(err) => Some(err.to_string()),
            Self::InvalidFilter(msg) => Some(msg.clone()),
            Self::Validation(_)
            | Self::FeedbackNotFound
            | Self::RouteNotFound { .. }
            | Self::Internal(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "请求处理失败");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "请求被拒绝");
        }

        let message = self.message();
        let detail = self.detail();
        let body = match self {
            Self::Validation(errors) => ApiResponse::validation(message, errors),
            _ => ApiResponse::error(message),
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(detail) = detail {
            response.extensions_mut().insert(ErrorDetail(detail));
        }
        response
    }
}

/// 请求体无法解析为 JSON 或字段类型不匹配
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl From<Vec<FieldError>> for AppError {
    fn from(errors: Vec<FieldError>) -> Self {
        Self::Validation(errors)
    }
}

/// 处理器 panic 时的兜底响应，panic 信息作为 [`AppError::Internal`] 的消息
///
/// 配合 `tower_http::catch_panic::CatchPanicLayer::custom` 使用
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        String::new()
    };
    AppError::Internal(message).into_response()
}

/// 按部署环境把错误详情合并到响应体的 `error` 字段
///
/// 扩展总是被移除，生产环境下详情只出现在日志中
pub async fn attach_error_detail(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(ErrorDetail(detail)) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };
    if !state.expose_error_details {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "读取错误响应体失败");
            parts.headers.remove(CONTENT_LENGTH);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let mut value: Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };
    if let Some(object) = value.as_object_mut() {
        object.insert("error".to_string(), Value::String(detail));
    }

    match serde_json::to_vec(&value) {
        Ok(body) => {
            parts.headers.remove(CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(body))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    use crate::repository::InMemoryFeedbackRepository;

    /// 所有错误变体与期望的 (StatusCode, message) 映射
    fn all_error_variants() -> Vec<(AppError, StatusCode, &'static str)> {
        vec![
            (
                AppError::Validation(vec![FieldError::new("name", "Name is required")]),
                StatusCode::BAD_REQUEST,
                "Validation failed",
            ),
            (AppError::FeedbackNotFound, StatusCode::NOT_FOUND, "Feedback not found"),
            (
                AppError::InvalidFilter("unknown status: closed".into()),
                StatusCode::BAD_REQUEST,
                "Validation error",
            ),
            (
                AppError::Store(StoreError::UniqueViolation("dup".into())),
                StatusCode::CONFLICT,
                "A record with this data already exists",
            ),
            (
                AppError::Store(StoreError::NotFound),
                StatusCode::NOT_FOUND,
                "Record not found",
            ),
            (
                AppError::Store(StoreError::Query("fk".into())),
                StatusCode::BAD_REQUEST,
                "Database error occurred",
            ),
            (
                AppError::Store(StoreError::InvalidInput("too long".into())),
                StatusCode::BAD_REQUEST,
                "Validation error",
            ),
            (
                AppError::Store(StoreError::Unavailable("pool timed out".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ),
            (
                AppError::RouteNotFound {
                    method: "GET".into(),
                    path: "/nope".into(),
                },
                StatusCode::NOT_FOUND,
                "Route not found: GET /nope",
            ),
            (
                AppError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "boom",
            ),
            (
                AppError::Internal(String::new()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ),
        ]
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_status_codes_and_messages() {
        for (err, status, message) in all_error_variants() {
            assert_eq!(err.status_code(), status, "status of {:?}", err);
            assert_eq!(err.message(), message, "message of {:?}", err);
        }
    }

    #[tokio::test]
    async fn test_into_response_envelope() {
        for (err, status, message) in all_error_variants() {
            let response = err.into_response();
            assert_eq!(response.status(), status);
            let json = body_json(response).await;
            assert_eq!(json["success"], false);
            assert_eq!(json["message"], message);
            assert!(json.get("error").is_none());
        }
    }

    #[tokio::test]
    async fn test_validation_response_lists_errors() {
        let response = AppError::Validation(vec![
            FieldError::new("name", "Name is required"),
            FieldError::new("rating", "Rating is required"),
        ])
        .into_response();

        assert!(response.extensions().get::<ErrorDetail>().is_none());
        let json = body_json(response).await;
        assert_eq!(json["errors"][0]["field"], "name");
        assert_eq!(json["errors"][1]["message"], "Rating is required");
    }

    #[test]
    fn test_detail_carried_only_for_internal_causes() {
        let response = AppError::Store(StoreError::Query("fk violation".into())).into_response();
        let detail = response.extensions().get::<ErrorDetail>().unwrap();
        assert!(detail.0.contains("fk violation"));

        let response = AppError::FeedbackNotFound.into_response();
        assert!(response.extensions().get::<ErrorDetail>().is_none());
    }

    fn detail_app(expose: bool) -> Router {
        let state = AppState::new(Arc::new(InMemoryFeedbackRepository::new()), expose);
        Router::new()
            .route(
                "/fail",
                get(|| async {
                    Err::<(), _>(AppError::Store(StoreError::Unavailable("db exploded".into())))
                }),
            )
            .layer(middleware::from_fn_with_state(
                state.clone(),
                attach_error_detail,
            ))
            .with_state(state)
    }

    fn fail_request() -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .uri("/fail")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_detail_attached_outside_production() {
        let response = detail_app(true).oneshot(fail_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Internal server error");
        assert!(json["error"].as_str().unwrap().contains("db exploded"));
    }

    #[tokio::test]
    async fn test_detail_hidden_in_production() {
        let response = detail_app(false).oneshot(fail_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json.get("error").is_none());
    }

    async fn poisoned() -> &'static str {
        panic!("feedback store poisoned")
    }

    async fn panics_without_message() -> &'static str {
        std::panic::panic_any(42_u8)
    }

    fn panicking_app() -> Router {
        Router::new()
            .route("/panic", get(poisoned))
            .route("/panic-any", get(panics_without_message))
            .layer(CatchPanicLayer::custom(panic_response))
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error_with_message() {
        let response = panicking_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/panic")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "feedback store poisoned");
    }

    #[tokio::test]
    async fn test_panic_without_message_uses_default() {
        let response = panicking_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/panic-any")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Internal server error");
    }
}
