use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::status::dtos::NetworkStatusDto;
use crate::features::status::services::StatusService;
use crate::shared::types::ApiResponse;

/// Current network status across campus
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Network status", body = ApiResponse<NetworkStatusDto>)
    ),
    tag = "status"
)]
pub async fn get_network_status(
    State(service): State<Arc<StatusService>>,
) -> Result<Json<ApiResponse<NetworkStatusDto>>> {
    let status = service.network_status().await?;
    Ok(Json(ApiResponse::success(Some(status), None, None)))
}
