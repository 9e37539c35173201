//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于处理器依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;

use super::error::Result;
use crate::models::{Feedback, FeedbackChanges, FeedbackFilter, NewFeedback};

/// 反馈仓储接口
///
/// 每个写操作都是单条原子语句，一致性依赖数据库自身的事务保证
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepositoryTrait: Send + Sync {
    /// 按创建时间倒序分页查询
    async fn list(&self, filter: FeedbackFilter, offset: i64, limit: i64)
    -> Result<Vec<Feedback>>;

    /// 满足过滤条件的记录总数
    async fn count(&self, filter: FeedbackFilter) -> Result<i64>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Feedback>>;

    /// 新建记录，状态固定为 open，id 与创建时间由存储生成
    async fn create(&self, feedback: &NewFeedback) -> Result<Feedback>;

    /// 部分更新，记录不存在时返回 `StoreError::NotFound`
    async fn update(&self, id: i64, changes: &FeedbackChanges) -> Result<Feedback>;

    /// 物理删除，记录不存在时返回 `StoreError::NotFound`
    async fn delete(&self, id: i64) -> Result<()>;

    /// 存储连通性检查
    async fn ping(&self) -> Result<()>;
}
