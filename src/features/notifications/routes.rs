use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::features::notifications::handlers;
use crate::features::notifications::services::NotificationService;

pub fn routes(service: Arc<NotificationService>) -> Router {
    Router::new()
        .route(
            "/api/notifications",
            get(handlers::list_notifications).post(handlers::create_notification),
        )
        .route(
            "/api/notifications/{id}",
            delete(handlers::dismiss_notification),
        )
        .with_state(service)
}
