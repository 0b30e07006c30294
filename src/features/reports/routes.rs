use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Report routes open to anonymous visitors
pub fn public_routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/api/reports/quick", post(handlers::quick_report))
        .route("/api/reports/{id}", get(handlers::get_report))
        .with_state(service)
}

/// Report routes that require a current session
pub fn protected_routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route("/api/reports/buildings", get(handlers::list_buildings))
        .route("/api/reports/similar", post(handlers::find_similar_reports))
        .route(
            "/api/reports/{id}/status",
            patch(handlers::update_report_status),
        )
        .route("/api/reports/{id}/contact", post(handlers::contact_support))
        .with_state(service)
}
