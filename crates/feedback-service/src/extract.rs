//! 自定义 Axum 提取器

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::{HeaderMap, header::CONTENT_TYPE},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::validation::FieldError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// 请求体提取器
///
/// `application/x-www-form-urlencoded` 按表单解析，其余按 JSON 解析。
/// 表单中的值都是字符串，数值字段（如 rating）由校验层按数字字符串处理。
pub struct JsonOrForm<T>(pub T);

impl<T, S> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(req.headers()) {
            let Form(value) = Form::<T>::from_request(req, state).await.map_err(|e| {
                AppError::Validation(vec![FieldError::new("body", e.body_text())])
            })?;
            return Ok(Self(value));
        }

        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}
