//! 健康检查处理器

use axum::{Json, extract::State, http::StatusCode};
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use tracing::warn;

use crate::state::AppState;

/// 存活探针：服务进程正常即返回
///
/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

/// 就绪探针：检查存储是否可用
///
/// GET /ready
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.repo.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Service is ready",
                "checks": { "database": "ok" }
            })),
        ),
        Err(e) => {
            warn!(error = %e, "就绪检查失败");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "Service is not ready",
                    "checks": { "database": "fail" }
                })),
            )
        }
    }
}
