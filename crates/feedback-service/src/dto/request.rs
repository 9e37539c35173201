//! 反馈服务请求 DTO 定义
//!
//! 请求体字段全部声明为可选，缺失与格式错误统一由校验层报告到具体字段。

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::Validate;

use crate::models::{FeedbackChanges, FeedbackFilter, NewFeedback};
use crate::validation::{
    FieldError, MSG_DIVISION_ENUM, MSG_RATING_RANGE, MSG_STATUS_ENUM, Violations, check_division,
    check_optional_text, check_rating, check_status, normalize_email, trim_to_none,
};

const MSG_COMMENT_STRING: &str = "Comment must be a string";
const MSG_SUGGESTION_STRING: &str = "Suggestion must be a string";

/// 创建请求的字段顺序，决定错误列表的输出顺序
const CREATE_FIELDS: [&str; 7] = [
    "name",
    "email",
    "eventName",
    "division",
    "rating",
    "comment",
    "suggestion",
];

/// 更新请求的字段顺序（id 由处理器单独前置）
const UPDATE_FIELDS: [&str; 8] = [
    "name",
    "email",
    "eventName",
    "division",
    "rating",
    "comment",
    "suggestion",
    "status",
];

/// 区分「字段缺失」与「显式 null」
///
/// 配合 `#[serde(default)]` 使用：缺失为 `None`，null 为 `Some(None)`
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 创建反馈请求
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    #[validate(
        required(message = "Name is required"),
        length(max = 255, message = "Name must be less than 255 characters")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Email is required"),
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email must be less than 255 characters")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Event name is required"),
        length(max = 255, message = "Event name must be less than 255 characters")
    )]
    pub event_name: Option<String>,
    pub division: Option<String>,
    pub rating: Option<Value>,
    pub comment: Option<Value>,
    pub suggestion: Option<Value>,
}

impl CreateFeedbackRequest {
    /// 去除字符串字段首尾空白，空串视为缺失
    fn sanitize(&mut self) {
        self.name = trim_to_none(self.name.take());
        self.email = trim_to_none(self.email.take());
        self.event_name = trim_to_none(self.event_name.take());
    }

    /// 校验并转换为待创建记录
    pub fn into_new_feedback(mut self) -> Result<NewFeedback, Vec<FieldError>> {
        self.sanitize();

        let mut v = Violations::new();
        if let Err(errors) = self.validate() {
            v.extend_validator(errors);
        }
        let division = check_division(self.division.as_deref(), true, &mut v);
        let rating = check_rating(self.rating.as_ref(), true, &mut v);
        let comment = check_optional_text(
            self.comment.as_ref(),
            "comment",
            MSG_COMMENT_STRING,
            &mut v,
        );
        let suggestion = check_optional_text(
            self.suggestion.as_ref(),
            "suggestion",
            MSG_SUGGESTION_STRING,
            &mut v,
        );

        v.finish(&CREATE_FIELDS)?;

        match (
            self.name,
            self.email,
            self.event_name,
            division,
            rating,
            comment,
            suggestion,
        ) {
            (
                Some(name),
                Some(email),
                Some(event_name),
                Some(division),
                Some(rating),
                Ok(comment),
                Ok(suggestion),
            ) => Ok(NewFeedback {
                name,
                email: normalize_email(&email),
                event_name,
                division,
                rating,
                comment,
                suggestion,
            }),
            // 上面的校验通过时各字段必然齐全
            _ => Err(vec![FieldError::new("body", "Invalid request body")]),
        }
    }
}

/// 更新反馈请求
///
/// 只有出现在请求体中的字段会被更新；`comment`、`suggestion` 可显式置为 null，
/// `division`、`rating`、`status` 显式为 null 时按取值非法处理
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedbackRequest {
    #[validate(length(max = 255, message = "Name must be less than 255 characters"))]
    pub name: Option<String>,
    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email must be less than 255 characters")
    )]
    pub email: Option<String>,
    #[validate(length(max = 255, message = "Event name must be less than 255 characters"))]
    pub event_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub division: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub rating: Option<Option<Value>>,
    #[serde(default, deserialize_with = "nullable")]
    pub comment: Option<Option<Value>>,
    #[serde(default, deserialize_with = "nullable")]
    pub suggestion: Option<Option<Value>>,
    #[serde(default, deserialize_with = "nullable")]
    pub status: Option<Option<String>>,
}

impl UpdateFeedbackRequest {
    fn sanitize(&mut self) {
        for field in [&mut self.name, &mut self.email, &mut self.event_name] {
            if let Some(value) = field {
                *value = value.trim().to_string();
            }
        }
    }

    /// 校验并转换为变更集合
    pub fn into_changes(mut self) -> Result<FeedbackChanges, Vec<FieldError>> {
        self.sanitize();

        let mut v = Violations::new();
        if let Err(errors) = self.validate() {
            v.extend_validator(errors);
        }
        if self.name.as_deref() == Some("") {
            v.push("name", "Name cannot be empty if provided");
        }
        if self.event_name.as_deref() == Some("") {
            v.push("eventName", "Event name cannot be empty if provided");
        }
        let division = match &self.division {
            Some(None) => reject_null(&mut v, "division", MSG_DIVISION_ENUM),
            Some(Some(raw)) => check_division(Some(raw), false, &mut v),
            None => None,
        };
        let rating = match &self.rating {
            Some(None) => reject_null(&mut v, "rating", MSG_RATING_RANGE),
            Some(Some(value)) => check_rating(Some(value), false, &mut v),
            None => None,
        };
        let comment = Self::nullable_text(
            self.comment.as_ref(),
            "comment",
            MSG_COMMENT_STRING,
            &mut v,
        );
        let suggestion = Self::nullable_text(
            self.suggestion.as_ref(),
            "suggestion",
            MSG_SUGGESTION_STRING,
            &mut v,
        );
        let status = match &self.status {
            Some(None) => reject_null(&mut v, "status", MSG_STATUS_ENUM),
            Some(Some(raw)) => check_status(Some(raw), &mut v),
            None => None,
        };

        v.finish(&UPDATE_FIELDS)?;

        Ok(FeedbackChanges {
            name: self.name,
            email: self.email.as_deref().map(normalize_email),
            event_name: self.event_name,
            division,
            rating,
            comment,
            suggestion,
            status,
        })
    }

    /// 字段出现时（包括 null）返回 `Some`，内层为规范化后的值
    fn nullable_text(
        value: Option<&Option<Value>>,
        field: &str,
        message: &str,
        v: &mut Violations,
    ) -> Option<Option<String>> {
        let present = value?;
        check_optional_text(present.as_ref(), field, message, v).ok()
    }
}

/// 不可置空的字段显式传入 null
fn reject_null<T>(v: &mut Violations, field: &str, message: &str) -> Option<T> {
    v.push(field, message);
    None
}

/// 列表查询参数
///
/// 分页参数按字符串接收，无法解析时回落到默认值
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackListQuery {
    pub status: Option<String>,
    pub division: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

impl FeedbackListQuery {
    /// 页码，最小为 1
    pub fn page(&self) -> i64 {
        Self::parse_number(self.page.as_deref())
            .unwrap_or(DEFAULT_PAGE)
            .max(1)
    }

    /// 每页条数，限制在 [1, 100]
    pub fn limit(&self) -> i64 {
        Self::parse_number(self.limit.as_deref())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT)
    }

    /// 计算数据库查询的 offset
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// 构造等值过滤条件，空字符串视为未设置
    ///
    /// 取值不在枚举范围内时返回错误描述
    pub fn filter(&self) -> Result<FeedbackFilter, String> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse()?),
        };
        let division = match self.division.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse()?),
        };
        Ok(FeedbackFilter { status, division })
    }

    fn parse_number(raw: Option<&str>) -> Option<i64> {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
    }
}
