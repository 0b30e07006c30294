#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
use axum::Router;
#[cfg(test)]
use serde_json::{json, Value};

#[cfg(test)]
use crate::core::config::{NotificationConfig, ReportsConfig};
#[cfg(test)]
use crate::core::router::{app_routes, AppServices};
#[cfg(test)]
use crate::features::auth::AuthService;
#[cfg(test)]
use crate::features::notifications::NotificationService;
#[cfg(test)]
use crate::features::reports::{mock_reports, InMemoryReportRepository, ReportService};
#[cfg(test)]
use crate::features::status::StatusService;
#[cfg(test)]
use crate::modules::storage::MemoryKvStore;

#[cfg(test)]
pub struct TestApp {
    pub router: Router,
    #[allow(dead_code)]
    pub services: AppServices,
}

/// Routes over in-memory storage with no submission delay
#[cfg(test)]
fn build(repository: InMemoryReportRepository) -> TestApp {
    let repository = Arc::new(repository);
    let notifications = Arc::new(NotificationService::new(&NotificationConfig::default()));
    let reports_config = ReportsConfig {
        seed_mock_reports: false,
        submission_delay: Duration::ZERO,
    };

    let services = AppServices {
        auth: Arc::new(AuthService::new(Arc::new(MemoryKvStore::new()))),
        reports: Arc::new(ReportService::new(
            repository.clone(),
            Arc::clone(&notifications),
            &reports_config,
            &NotificationConfig::default(),
        )),
        status: Arc::new(StatusService::new(repository)),
        notifications,
    };

    TestApp {
        router: app_routes(&services),
        services,
    }
}

#[cfg(test)]
pub fn test_app() -> TestApp {
    build(InMemoryReportRepository::empty())
}

/// Same as [`test_app`] with the five sample reports loaded
#[cfg(test)]
pub fn app_with_seed() -> TestApp {
    build(InMemoryReportRepository::new(mock_reports(chrono::Utc::now())))
}

#[cfg(test)]
pub fn register_payload(name: &str, email: &str, role: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "password": "secret1",
        "confirmPassword": "secret1",
        "role": role,
    })
}
