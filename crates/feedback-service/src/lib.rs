//! 活动反馈服务
//!
//! 提供活动反馈的提交、查询、更新和删除 REST API。
//!
//! ## 核心功能
//!
//! - **反馈管理**：反馈记录的 CRUD 操作，支持按状态、部门过滤和分页
//! - **输入校验**：所有输入在访问存储之前完成校验，逐字段返回错误
//! - **错误转换**：存储层错误统一映射为 HTTP 状态码和响应信封
//!
//! ## 模块结构
//!
//! - `dto`: 请求和响应的数据传输对象
//! - `models`: 反馈实体与枚举
//! - `validation`: 校验规则与邮箱规范化
//! - `repository`: 存储访问（PostgreSQL / 内存）
//! - `error`: 错误类型定义
//! - `extract`: 请求体提取器（JSON / 表单）
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据库：PostgreSQL (sqlx)
//! - 数据验证：validator
//! - 序列化：serde (camelCase)

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;
pub mod validation;

// 重新导出核心类型
pub use dto::{ApiResponse, CreateFeedbackRequest, FeedbackListQuery, UpdateFeedbackRequest};
pub use error::{AppError, Result};
pub use models::{Division, Feedback, FeedbackChanges, FeedbackFilter, FeedbackStatus, NewFeedback};
pub use repository::{
    FeedbackRepository, FeedbackRepositoryTrait, InMemoryFeedbackRepository, StoreError,
};
pub use state::AppState;
