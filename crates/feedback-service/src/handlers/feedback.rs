//! 反馈管理 API 处理器
//!
//! 实现反馈记录的 CRUD 操作。所有输入在访问仓储之前完成校验，
//! 错误通过 `?` 交给 [`AppError`] 统一转换为响应。

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use feedback_shared::observability::metrics::record_feedback_operation;
use tracing::info;

use crate::{
    dto::{
        ApiResponse, CreateFeedbackRequest, FeedbackListQuery, FeedbackPage, Pagination,
        UpdateFeedbackRequest,
    },
    error::{AppError, Result},
    extract::JsonOrForm,
    models::Feedback,
    state::AppState,
    validation::{FieldError, parse_id},
};

/// 获取反馈列表
///
/// GET /api/v1/feedback
pub async fn list_feedbacks(
    State(state): State<AppState>,
    query: std::result::Result<Query<FeedbackListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<FeedbackPage>>> {
    let Query(query) = query.map_err(|e| AppError::InvalidFilter(e.body_text()))?;
    let filter = query.filter().map_err(AppError::InvalidFilter)?;
    let page = query.page();
    let limit = query.limit();

    // 分页数据与总数并发查询
    let (feedbacks, total) = tokio::try_join!(
        state.repo.list(filter, query.offset(), limit),
        state.repo.count(filter),
    )?;

    record_feedback_operation("list", "success");

    Ok(Json(ApiResponse::success(
        "Feedbacks retrieved successfully",
        FeedbackPage {
            feedbacks,
            pagination: Pagination::new(page, limit, total),
        },
    )))
}

/// 获取反馈详情
///
/// GET /api/v1/feedback/{id}
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<Feedback>>> {
    let id = parse_id(&raw_id).map_err(|e| AppError::Validation(vec![e]))?;

    let feedback = find_existing(&state, id, "get").await?;

    record_feedback_operation("get", "success");

    Ok(Json(ApiResponse::success(
        "Feedback retrieved successfully",
        feedback,
    )))
}

/// 创建反馈
///
/// POST /api/v1/feedback，请求体可以是 JSON 或表单
pub async fn create_feedback(
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Feedback>>)> {
    let new_feedback = req.into_new_feedback()?;

    let feedback = state.repo.create(&new_feedback).await?;

    info!(
        feedback_id = feedback.id,
        division = %feedback.division,
        rating = feedback.rating,
        "Feedback created"
    );
    record_feedback_operation("create", "success");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Feedback created successfully", feedback)),
    ))
}

/// 更新反馈（部分更新）
///
/// PUT /api/v1/feedback/{id}
pub async fn update_feedback(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: std::result::Result<JsonOrForm<UpdateFeedbackRequest>, AppError>,
) -> Result<Json<ApiResponse<Feedback>>> {
    let id = parse_id(&raw_id);
    let changes = match payload {
        Ok(JsonOrForm(req)) => req.into_changes(),
        Err(AppError::Validation(errors)) => Err(errors),
        Err(other) => return Err(other),
    };

    // 路径参数与请求体的错误合并返回，路径参数在前
    let (id, changes) = match (id, changes) {
        (Ok(id), Ok(changes)) => (id, changes),
        (id, changes) => {
            let mut errors: Vec<FieldError> = id.err().into_iter().collect();
            errors.extend(changes.err().unwrap_or_default());
            return Err(AppError::Validation(errors));
        }
    };

    find_existing(&state, id, "update").await?;

    let feedback = state.repo.update(id, &changes).await?;

    info!(feedback_id = id, status = %feedback.status, "Feedback updated");
    record_feedback_operation("update", "success");

    Ok(Json(ApiResponse::success(
        "Feedback updated successfully",
        feedback,
    )))
}

/// 删除反馈（物理删除）
///
/// DELETE /api/v1/feedback/{id}
pub async fn delete_feedback(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let id = parse_id(&raw_id).map_err(|e| AppError::Validation(vec![e]))?;

    find_existing(&state, id, "delete").await?;

    state.repo.delete(id).await?;

    info!(feedback_id = id, "Feedback deleted");
    record_feedback_operation("delete", "success");

    Ok(Json(ApiResponse::success_empty(
        "Feedback deleted successfully",
    )))
}

/// 按 ID 查询，不存在时返回 `FeedbackNotFound`
async fn find_existing(state: &AppState, id: i64, operation: &'static str) -> Result<Feedback> {
    match state.repo.find_by_id(id).await? {
        Some(feedback) => Ok(feedback),
        None => {
            record_feedback_operation(operation, "not_found");
            Err(AppError::FeedbackNotFound)
        }
    }
}
