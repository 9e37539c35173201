//! 输入校验规则
//!
//! 请求 DTO 的声明式校验由 `validator` 派生完成，这里补充派生宏表达不了的规则：
//! 路径 ID、评分、枚举字段、可选文本字段，以及邮箱规范化。
//! 所有规则都把失败追加到 [`Violations`]，最后按字段声明顺序输出。

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;
use validator::ValidationErrors;

use crate::models::{Division, FeedbackStatus};

pub const MSG_INVALID_ID: &str = "ID must be a valid positive integer";
pub const MSG_RATING_REQUIRED: &str = "Rating is required";
pub const MSG_RATING_RANGE: &str = "Rating must be an integer between 1 and 5";
pub const MSG_DIVISION_REQUIRED: &str = "Division is required";
pub const MSG_DIVISION_ENUM: &str = "Division must be one of: LnT, Eeo, PR, HRD, AnD";
pub const MSG_STATUS_ENUM: &str = "Status must be one of: open, in_review, resolved";

const RATING_MIN: i64 = 1;
const RATING_MAX: i64 = 5;

/// 单个字段的校验失败
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 校验失败收集器
#[derive(Debug, Default)]
pub struct Violations {
    errors: Vec<FieldError>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// 合并 validator 派生校验的结果，字段名统一转为 camelCase
    pub fn extend_validator(&mut self, errors: ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            let field = camel_case(&field);
            for err in field_errors {
                let message = err
                    .message
                    .clone()
                    .unwrap_or_else(|| Cow::Owned(err.code.to_string()));
                self.push(field.clone(), message);
            }
        }
    }

    /// 按给定字段顺序排序后输出；未列出的字段排在最后
    ///
    /// 同一字段内保持追加顺序
    pub fn finish(mut self, order: &[&str]) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            return Ok(());
        }
        self.errors.sort_by_key(|e| {
            order
                .iter()
                .position(|f| *f == e.field)
                .unwrap_or(order.len())
        });
        Err(self.errors)
    }
}

/// snake_case 字段名转 camelCase（已是 camelCase 的保持不变）
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// 解析路径中的记录 ID，必须是正整数
pub fn parse_id(raw: &str) -> Result<i64, FieldError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id >= 1)
        .ok_or_else(|| FieldError::new("id", MSG_INVALID_ID))
}

/// 评分规则：接受 JSON 整数、无小数部分的浮点数（如 `5.0`）或数字字符串，取值范围 [1, 5]
///
/// `required` 为 true 时缺失字段记为失败
pub fn check_rating(value: Option<&Value>, required: bool, v: &mut Violations) -> Option<i32> {
    let Some(value) = value else {
        if required {
            v.push("rating", MSG_RATING_REQUIRED);
        }
        return None;
    };

    let parsed = match value {
        // 超出 i64 的浮点数在转换时饱和，随后由范围检查拒绝
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) if s.trim().is_empty() => {
            v.push("rating", MSG_RATING_REQUIRED);
            return None;
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if (RATING_MIN..=RATING_MAX).contains(&n) => Some(n as i32),
        _ => {
            v.push("rating", MSG_RATING_RANGE);
            None
        }
    }
}

/// 事业部规则
pub fn check_division(
    value: Option<&str>,
    required: bool,
    v: &mut Violations,
) -> Option<Division> {
    match value {
        None if required => {
            v.push("division", MSG_DIVISION_REQUIRED);
            None
        }
        None => None,
        Some("") if required => {
            v.push("division", MSG_DIVISION_REQUIRED);
            None
        }
        Some(raw) => match raw.parse::<Division>() {
            Ok(division) => Some(division),
            Err(_) => {
                v.push("division", MSG_DIVISION_ENUM);
                None
            }
        },
    }
}

/// 状态规则（仅在更新时出现，始终可选）
pub fn check_status(value: Option<&str>, v: &mut Violations) -> Option<FeedbackStatus> {
    let raw = value?;
    match raw.parse::<FeedbackStatus>() {
        Ok(status) => Some(status),
        Err(_) => {
            v.push("status", MSG_STATUS_ENUM);
            None
        }
    }
}

/// 可选文本字段规则
///
/// null 或去除空白后为空的字符串视为无值；非字符串记为失败。
/// 返回 `Err(())` 表示已记录失败。
pub(crate) fn check_optional_text(
    value: Option<&Value>,
    field: &str,
    message: &str,
    v: &mut Violations,
) -> Result<Option<String>, ()> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(_) => {
            v.push(field, message);
            Err(())
        }
    }
}

/// 去除首尾空白，空字符串归为 None
pub fn trim_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 邮箱规范化
///
/// 整体转小写；Gmail 去掉本地部分的点和 `+` 标签并统一域名为 gmail.com；
/// Outlook/Hotmail/Live 与 iCloud 去掉 `+` 标签；Yahoo 去掉 `-` 标签。
pub fn normalize_email(email: &str) -> String {
    let email = email.trim().to_lowercase();
    let Some((local, domain)) = email.rsplit_once('@') else {
        return email;
    };

    let (local, domain) = match domain {
        "gmail.com" | "googlemail.com" => {
            let base = strip_tag(local, '+').replace('.', "");
            (base, "gmail.com")
        }
        "outlook.com" | "hotmail.com" | "live.com" | "icloud.com" | "me.com" | "mac.com" => {
            (strip_tag(local, '+').to_string(), domain)
        }
        "yahoo.com" | "ymail.com" | "rocketmail.com" => {
            (strip_tag(local, '-').to_string(), domain)
        }
        _ => (local.to_string(), domain),
    };

    if local.is_empty() {
        return email;
    }
    format!("{}@{}", local, domain)
}

fn strip_tag(local: &str, separator: char) -> &str {
    local.split(separator).next().unwrap_or(local)
}
