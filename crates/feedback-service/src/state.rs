//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use crate::repository::FeedbackRepositoryTrait;

/// Axum 应用共享状态
///
/// 创建后只读，通过 Arc 在 handler 间共享
#[derive(Clone)]
pub struct AppState {
    /// 反馈仓储
    pub repo: Arc<dyn FeedbackRepositoryTrait>,
    /// 是否在错误响应中附带内部错误详情（非生产环境开启）
    pub expose_error_details: bool,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(repo: Arc<dyn FeedbackRepositoryTrait>, expose_error_details: bool) -> Self {
        Self {
            repo,
            expose_error_details,
        }
    }
}
