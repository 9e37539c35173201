//! 反馈服务模型模块
//!
//! 包含反馈实体及其枚举、变更集与过滤条件

pub mod enums;
pub mod feedback;

// 重新导出常用类型
pub use enums::{Division, FeedbackStatus};
pub use feedback::{Feedback, FeedbackChanges, FeedbackFilter, NewFeedback};
