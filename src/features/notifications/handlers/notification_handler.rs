use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::notifications::dtos::CreateToastDto;
use crate::features::notifications::models::Toast;
use crate::features::notifications::services::NotificationService;
use crate::shared::types::ApiResponse;
use crate::shared::validation::FieldErrors;

/// List active notifications, oldest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Active notifications", body = ApiResponse<Vec<Toast>>)
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(service): State<Arc<NotificationService>>,
) -> Result<Json<ApiResponse<Vec<Toast>>>> {
    let toasts = service.list().await;
    Ok(Json(ApiResponse::success(Some(toasts), None, None)))
}

/// Raise a notification
#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateToastDto,
    responses(
        (status = 201, description = "Notification shown", body = ApiResponse<Toast>),
        (status = 400, description = "Validation error")
    ),
    tag = "notifications"
)]
pub async fn create_notification(
    State(service): State<Arc<NotificationService>>,
    AppJson(dto): AppJson<CreateToastDto>,
) -> Result<(StatusCode, Json<ApiResponse<Toast>>)> {
    dto.validate().map_err(FieldErrors::from)?;
    let toast = service.show(dto.into()).await;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(toast), None, None)),
    ))
}

/// Dismiss a notification before it expires
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(
        ("id" = String, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification dismissed", body = ApiResponse<Toast>),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications"
)]
pub async fn dismiss_notification(
    State(service): State<Arc<NotificationService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Toast>>> {
    let toast = service.dismiss(&id).await?;
    Ok(Json(ApiResponse::success(Some(toast), None, None)))
}
