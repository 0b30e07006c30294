use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    ContactSupportDto, CreateReportDto, QuickReportAckDto, QuickReportDto,
    ReportDetailResponseDto, ReportQuery, ReportResponseDto, SimilarReportsRequestDto,
    UpdateReportStatusDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta};

/// List reports matching the search, filters and sort
///
/// `meta.total` is the size of the unfiltered set.
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Filtered reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Login required")
    ),
    tag = "reports"
)]
pub async fn list_reports(
    _user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (reports, total) = service.list(&query).await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta {
            total: total as i64,
        }),
    )))
}

/// Submit a new outage report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Login required"),
        (status = 409, description = "A submission is already in progress")
    ),
    tag = "reports"
)]
pub async fn create_report(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let report = service.submit(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted successfully".to_string()),
            None,
        )),
    ))
}

/// Distinct buildings across all reports
#[utoipa::path(
    get,
    path = "/api/reports/buildings",
    responses(
        (status = 200, description = "Building names", body = ApiResponse<Vec<String>>),
        (status = 401, description = "Login required")
    ),
    tag = "reports"
)]
pub async fn list_buildings(
    _user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let buildings = service.buildings().await?;
    Ok(Json(ApiResponse::success(Some(buildings), None, None)))
}

/// Open reports similar to a draft
#[utoipa::path(
    post,
    path = "/api/reports/similar",
    request_body = SimilarReportsRequestDto,
    responses(
        (status = 200, description = "Similar open reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Login required")
    ),
    tag = "reports"
)]
pub async fn find_similar_reports(
    _user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<SimilarReportsRequestDto>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.find_similar(&dto).await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// One-click report from the quick report button
#[utoipa::path(
    post,
    path = "/api/reports/quick",
    request_body = QuickReportDto,
    responses(
        (status = 200, description = "Quick report received", body = ApiResponse<QuickReportAckDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "reports"
)]
pub async fn quick_report(
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<QuickReportDto>,
) -> Result<Json<ApiResponse<QuickReportAckDto>>> {
    let ack = service.quick_report(dto)?;
    Ok(Json(ApiResponse::success(
        Some(ack),
        Some("Thanks! IT has been notified.".to_string()),
        None,
    )))
}

/// Get a report with its update timeline
///
/// Opening a report raises a status notification.
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportDetailResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReportDetailResponseDto>>> {
    let report = service.open(&id).await?;
    Ok(Json(ApiResponse::success(
        Some(ReportDetailResponseDto::from(&report)),
        None,
        None,
    )))
}

/// Update report status (staff and faculty only)
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportDetailResponseDto>),
        (status = 401, description = "Login required"),
        (status = 403, description = "Staff or faculty access required"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn update_report_status(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportDetailResponseDto>>> {
    let report = service.update_status(&id, dto, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(ReportDetailResponseDto::from(&report)),
        None,
        None,
    )))
}

/// Send a message to IT support about a report
#[utoipa::path(
    post,
    path = "/api/reports/{id}/contact",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    request_body = ContactSupportDto,
    responses(
        (status = 200, description = "Message sent"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Login required"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn contact_support(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<ContactSupportDto>,
) -> Result<Json<ApiResponse<()>>> {
    service.contact_support(&id, dto, &user).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Message sent".to_string()),
        None,
    )))
}
