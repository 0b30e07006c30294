use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::status::handlers;
use crate::features::status::services::StatusService;

pub fn routes(service: Arc<StatusService>) -> Router {
    Router::new()
        .route("/api/status", get(handlers::get_network_status))
        .with_state(service)
}
