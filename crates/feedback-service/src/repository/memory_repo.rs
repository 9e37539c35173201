//! 内存反馈仓储
//!
//! 使用 DashMap 实现，行为与 PostgreSQL 仓储保持一致（排序、分页、NotFound 语义），
//! 适用于测试和本地开发。

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use super::error::{Result, StoreError};
use super::traits::FeedbackRepositoryTrait;
use crate::models::{Feedback, FeedbackChanges, FeedbackFilter, FeedbackStatus, NewFeedback};

/// 内存反馈仓储
#[derive(Debug)]
pub struct InMemoryFeedbackRepository {
    data: DashMap<i64, Feedback>,
    next_id: AtomicI64,
}

impl Default for InMemoryFeedbackRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// 当前记录数
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 按过滤条件取出并排序：创建时间倒序，相同时间按 id 倒序
    fn sorted(&self, filter: FeedbackFilter) -> Vec<Feedback> {
        let mut items: Vec<Feedback> = self
            .data
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        items
    }
}

#[async_trait]
impl FeedbackRepositoryTrait for InMemoryFeedbackRepository {
    async fn list(
        &self,
        filter: FeedbackFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Feedback>> {
        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);

        Ok(self
            .sorted(filter)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn count(&self, filter: FeedbackFilter) -> Result<i64> {
        let total = self
            .data
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .count();
        Ok(total as i64)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Feedback>> {
        Ok(self.data.get(&id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, feedback: &NewFeedback) -> Result<Feedback> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Feedback {
            id,
            name: feedback.name.clone(),
            email: feedback.email.clone(),
            event_name: feedback.event_name.clone(),
            division: feedback.division,
            rating: feedback.rating,
            comment: feedback.comment.clone(),
            suggestion: feedback.suggestion.clone(),
            created_at: Utc::now(),
            status: FeedbackStatus::Open,
        };
        self.data.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: &FeedbackChanges) -> Result<Feedback> {
        let mut entry = self.data.get_mut(&id).ok_or(StoreError::NotFound)?;
        changes.apply_to(entry.value_mut());
        Ok(entry.value().clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.data
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
