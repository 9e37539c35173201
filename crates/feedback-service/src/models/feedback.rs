//! 反馈实体模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{Division, FeedbackStatus};

/// 反馈实体
///
/// `id` 与 `created_at` 由存储层生成，创建后不可修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub event_name: String,
    pub division: Division,
    /// 评分，取值范围 [1, 5]
    pub rating: i32,
    pub comment: Option<String>,
    pub suggestion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: FeedbackStatus,
}

/// 待创建的反馈（已通过校验）
///
/// 不含 status：新建记录的状态固定为 open
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub name: String,
    pub email: String,
    pub event_name: String,
    pub division: Division,
    pub rating: i32,
    pub comment: Option<String>,
    pub suggestion: Option<String>,
}

/// 部分更新的字段集合
///
/// 外层 `None` 表示请求中未出现该字段，保持原值；
/// 可空字段的 `Some(None)` 表示显式置空。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub event_name: Option<String>,
    pub division: Option<Division>,
    pub rating: Option<i32>,
    pub comment: Option<Option<String>>,
    pub suggestion: Option<Option<String>>,
    pub status: Option<FeedbackStatus>,
}

impl FeedbackChanges {
    /// 是否没有任何字段需要更新
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.event_name.is_none()
            && self.division.is_none()
            && self.rating.is_none()
            && self.comment.is_none()
            && self.suggestion.is_none()
            && self.status.is_none()
    }

    /// 将变更应用到已有记录上
    pub fn apply_to(&self, feedback: &mut Feedback) {
        if let Some(name) = &self.name {
            feedback.name = name.clone();
        }
        if let Some(email) = &self.email {
            feedback.email = email.clone();
        }
        if let Some(event_name) = &self.event_name {
            feedback.event_name = event_name.clone();
        }
        if let Some(division) = self.division {
            feedback.division = division;
        }
        if let Some(rating) = self.rating {
            feedback.rating = rating;
        }
        if let Some(comment) = &self.comment {
            feedback.comment = comment.clone();
        }
        if let Some(suggestion) = &self.suggestion {
            feedback.suggestion = suggestion.clone();
        }
        if let Some(status) = self.status {
            feedback.status = status;
        }
    }
}

/// 列表查询的等值过滤条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackFilter {
    pub status: Option<FeedbackStatus>,
    pub division: Option<Division>,
}

impl FeedbackFilter {
    /// 判断记录是否满足过滤条件
    pub fn matches(&self, feedback: &Feedback) -> bool {
        self.status.is_none_or(|s| feedback.status == s)
            && self.division.is_none_or(|d| feedback.division == d)
    }
}
