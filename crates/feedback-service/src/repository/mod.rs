//! 数据库仓储层
//!
//! 提供反馈实体的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 使用 SQLx 进行类型安全的数据库操作
//! - 驱动错误统一归类为 `StoreError`，由上层模式匹配
//! - 定义 trait 接口以支持 mock 测试与内存实现

mod error;
mod feedback_repo;
mod memory_repo;
mod traits;

pub use error::{Result, StoreError};
pub use feedback_repo::FeedbackRepository;
pub use memory_repo::InMemoryFeedbackRepository;
pub use traits::*;
