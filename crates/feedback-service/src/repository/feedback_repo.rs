//! 反馈仓储（PostgreSQL）
//!
//! 提供 feedbacks 表的数据访问，过滤条件与部分更新使用 QueryBuilder 动态拼接

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::error::{Result, StoreError};
use super::traits::FeedbackRepositoryTrait;
use crate::models::{Feedback, FeedbackChanges, FeedbackFilter, FeedbackStatus, NewFeedback};

const FEEDBACK_COLUMNS: &str =
    "id, name, email, event_name, division, rating, comment, suggestion, created_at, status";

/// 反馈仓储
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 追加 WHERE 子句，只包含已设置的过滤字段
    fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: FeedbackFilter) {
        let mut keyword = " WHERE ";
        if let Some(status) = filter.status {
            qb.push(keyword).push("status = ").push_bind(status);
            keyword = " AND ";
        }
        if let Some(division) = filter.division {
            qb.push(keyword).push("division = ").push_bind(division);
        }
    }
}

#[async_trait]
impl FeedbackRepositoryTrait for FeedbackRepository {
    async fn list(
        &self,
        filter: FeedbackFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Feedback>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM feedbacks",
            FEEDBACK_COLUMNS
        ));
        Self::push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let feedbacks = qb
            .build_query_as::<Feedback>()
            .fetch_all(&self.pool)
            .await?;

        Ok(feedbacks)
    }

    async fn count(&self, filter: FeedbackFilter) -> Result<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM feedbacks");
        Self::push_filter(&mut qb, filter);

        let total: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(total)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {} FROM feedbacks WHERE id = $1",
            FEEDBACK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(feedback)
    }

    async fn create(&self, feedback: &NewFeedback) -> Result<Feedback> {
        let created = sqlx::query_as::<_, Feedback>(&format!(
            r#"
            INSERT INTO feedbacks
                (name, email, event_name, division, rating, comment, suggestion, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            FEEDBACK_COLUMNS
        ))
        .bind(&feedback.name)
        .bind(&feedback.email)
        .bind(&feedback.event_name)
        .bind(feedback.division)
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .bind(&feedback.suggestion)
        .bind(FeedbackStatus::Open)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, changes: &FeedbackChanges) -> Result<Feedback> {
        // 没有需要更新的字段时等价于读取
        if changes.is_empty() {
            return self.find_by_id(id).await?.ok_or(StoreError::NotFound);
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE feedbacks SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(name) = &changes.name {
                set.push("name = ").push_bind_unseparated(name.clone());
            }
            if let Some(email) = &changes.email {
                set.push("email = ").push_bind_unseparated(email.clone());
            }
            if let Some(event_name) = &changes.event_name {
                set.push("event_name = ")
                    .push_bind_unseparated(event_name.clone());
            }
            if let Some(division) = changes.division {
                set.push("division = ").push_bind_unseparated(division);
            }
            if let Some(rating) = changes.rating {
                set.push("rating = ").push_bind_unseparated(rating);
            }
            if let Some(comment) = &changes.comment {
                set.push("comment = ").push_bind_unseparated(comment.clone());
            }
            if let Some(suggestion) = &changes.suggestion {
                set.push("suggestion = ")
                    .push_bind_unseparated(suggestion.clone());
            }
            if let Some(status) = changes.status {
                set.push("status = ").push_bind_unseparated(status);
            }
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(FEEDBACK_COLUMNS);

        qb.build_query_as::<Feedback>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM feedbacks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
