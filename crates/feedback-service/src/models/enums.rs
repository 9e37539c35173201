//! 反馈服务枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化，
//! 取值集合是封闭的，数据库侧有对应的 CHECK 约束。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 负责活动的部门
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum Division {
    #[serde(rename = "LnT")]
    #[sqlx(rename = "LnT")]
    LnT,
    #[serde(rename = "Eeo")]
    #[sqlx(rename = "Eeo")]
    Eeo,
    #[serde(rename = "PR")]
    #[sqlx(rename = "PR")]
    Pr,
    #[serde(rename = "HRD")]
    #[sqlx(rename = "HRD")]
    Hrd,
    #[serde(rename = "AnD")]
    #[sqlx(rename = "AnD")]
    AnD,
}

impl Division {
    /// 全部取值，顺序即对外展示顺序
    pub const ALL: [Division; 5] = [
        Division::LnT,
        Division::Eeo,
        Division::Pr,
        Division::Hrd,
        Division::AnD,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LnT => "LnT",
            Self::Eeo => "Eeo",
            Self::Pr => "PR",
            Self::Hrd => "HRD",
            Self::AnD => "AnD",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Division {
    type Err = String;

    /// 大小写敏感，与数据库约束保持一致
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown division: {}", s))
    }
}

/// 反馈处理状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum FeedbackStatus {
    /// 新提交，尚未处理
    #[default]
    Open,
    /// 处理中
    InReview,
    /// 已处理
    Resolved,
}

impl FeedbackStatus {
    pub const ALL: [FeedbackStatus; 3] = [
        FeedbackStatus::Open,
        FeedbackStatus::InReview,
        FeedbackStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InReview => "in_review",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("unknown status: {}", s))
    }
}
