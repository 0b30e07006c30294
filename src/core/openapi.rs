use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, model as auth_model};
use crate::features::notifications::{
    dtos as notifications_dtos, handlers as notifications_handlers,
    models as notifications_models,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::status::{dtos as status_dtos, handlers as status_handlers};
use crate::shared::types::{ApiResponse, FieldErrorDto, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::logout,
        auth_handlers::get_me,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::create_report,
        reports_handlers::list_buildings,
        reports_handlers::find_similar_reports,
        reports_handlers::quick_report,
        reports_handlers::get_report,
        reports_handlers::update_report_status,
        reports_handlers::contact_support,
        // Status
        status_handlers::get_network_status,
        // Notifications
        notifications_handlers::list_notifications,
        notifications_handlers::create_notification,
        notifications_handlers::dismiss_notification,
    ),
    components(
        schemas(
            Meta,
            FieldErrorDto,
            // Auth
            auth_model::UserRole,
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::UserResponseDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::UserResponseDto>,
            // Reports
            reports_models::ReportSeverity,
            reports_models::ReportStatus,
            reports_dtos::CreateReportDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReportUpdateResponseDto,
            reports_dtos::ReportDetailResponseDto,
            reports_dtos::ReportSort,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::ContactSupportDto,
            reports_dtos::SimilarReportsRequestDto,
            reports_dtos::QuickIssue,
            reports_dtos::QuickReportDto,
            reports_dtos::QuickReportAckDto,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<reports_dtos::ReportDetailResponseDto>,
            ApiResponse<reports_dtos::QuickReportAckDto>,
            ApiResponse<Vec<String>>,
            // Status
            status_dtos::OverallState,
            status_dtos::StatusCountsDto,
            status_dtos::SeverityCountsDto,
            status_dtos::NetworkStatusDto,
            ApiResponse<status_dtos::NetworkStatusDto>,
            // Notifications
            notifications_models::ToastType,
            notifications_models::Toast,
            notifications_dtos::CreateToastDto,
            ApiResponse<notifications_models::Toast>,
            ApiResponse<Vec<notifications_models::Toast>>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and the current session"),
        (name = "reports", description = "Outage reports and their timelines"),
        (name = "status", description = "Network status summary (public)"),
        (name = "notifications", description = "Toast notifications"),
    ),
    info(
        title = "Campus Outage API",
        version = "0.1.0",
        description = "API documentation for the campus internet outage service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_report_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/reports"));
        assert!(doc.paths.paths.contains_key("/api/reports/{id}/status"));
        assert!(doc.paths.paths.contains_key("/api/status"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Outages".to_string(),
            version: "9.9.9".to_string(),
            description: "Custom".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Outages");
        assert_eq!(doc.info.description.as_deref(), Some("Custom"));
    }
}
