//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射，以及整个应用的中间件栈

use axum::{
    Router,
    extract::{OriginalUri, Request},
    http::{HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use feedback_shared::{
    config::{AppConfig, CorsConfig},
    observability::middleware as obs_middleware,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
};
use tracing::{info, warn};

use crate::{
    error::{AppError, attach_error_detail, panic_response},
    handlers,
    state::AppState,
};

/// 反馈资源路由，挂载在 `{api.prefix}/{api.version}/feedback` 下
pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::feedback::list_feedbacks).post(handlers::feedback::create_feedback),
        )
        .route(
            "/{id}",
            get(handlers::feedback::get_feedback)
                .put(handlers::feedback::update_feedback)
                .delete(handlers::feedback::delete_feedback),
        )
        .method_not_allowed_fallback(route_not_found)
}

/// 构建完整应用：业务路由、探针、文档与中间件
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let base_path = config.api.base_path();

    let feedback_path = format!("{}/feedback", base_path);

    Router::new()
        .nest(&feedback_path, feedback_routes())
        // 带尾部斜杠的集合路径与不带斜杠的等价
        .route(
            &format!("{}/", feedback_path),
            get(handlers::feedback::list_feedbacks).post(handlers::feedback::create_feedback),
        )
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .merge(handlers::docs::docs_routes(&base_path))
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        // 处理器 panic 转换为 500 错误响应
        .layer(CatchPanicLayer::custom(panic_response))
        // 错误详情合并：直接处理处理器返回的错误响应
        .layer(middleware::from_fn_with_state(
            state.clone(),
            attach_error_detail,
        ))
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer(&config.cors))
        // 可观测性中间件：请求追踪和指标收集
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}

/// 未匹配的路由或方法
async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

/// 根据配置构建 CORS 层
///
/// "*" 允许任意来源，否则只允许列出的来源
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any() {
        info!("CORS allowed_origins: * (all origins)");
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .origins()
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "忽略无效的 CORS 来源");
                None
            }
        })
        .collect();
    info!("CORS allowed_origins: {}", config.allowed_origins);
    layer.allow_origin(origins)
}

/// 为所有响应注入 HTTP 安全头
async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    // 旧的 XSS 过滤器显式关闭，由 CSP 负责
    headers.insert("x-xss-protection", HeaderValue::from_static("0"));
    response
}
