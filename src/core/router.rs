use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::auth::{routes as auth_routes, AuthService};
use crate::features::notifications::{routes as notifications_routes, NotificationService};
use crate::features::pages::{routes as pages_routes, PageState};
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::features::status::{routes as status_routes, StatusService};

/// Services shared by every route group
#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub reports: Arc<ReportService>,
    pub status: Arc<StatusService>,
    pub notifications: Arc<NotificationService>,
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// API and page routes without the outer HTTP layers
pub fn app_routes(services: &AppServices) -> Router {
    // Protected routes (require a current session)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&services.auth)))
        .merge(reports_routes::protected_routes(Arc::clone(
            &services.reports,
        )))
        .route_layer(from_fn_with_state(
            Arc::clone(&services.auth),
            middleware::session_middleware,
        ));

    let public_routes = Router::new()
        .merge(auth_routes::public_routes(Arc::clone(&services.auth)))
        .merge(reports_routes::public_routes(Arc::clone(&services.reports)))
        .merge(status_routes::routes(Arc::clone(&services.status)))
        .merge(notifications_routes::routes(Arc::clone(
            &services.notifications,
        )))
        .route("/health", get(health_check));

    let pages = pages_routes::routes(PageState {
        auth: Arc::clone(&services.auth),
        reports: Arc::clone(&services.reports),
        status: Arc::clone(&services.status),
        notifications: Arc::clone(&services.notifications),
    });

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .merge(pages)
}

fn swagger_routes(config: &Config) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        swagger.layer(from_fn(middleware::basic_auth_middleware(Arc::new(
            credentials,
        ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        swagger
    }
}

/// Full application router
pub fn build_router(services: &AppServices, config: &Config) -> Router {
    // Outermost layer first
    let layers = ServiceBuilder::new()
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size));

    Router::new()
        .merge(swagger_routes(config))
        .merge(app_routes(services))
        .layer(layers)
}

#[cfg(test)]
mod tests {
    use axum::http::{header, StatusCode};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::shared::test_helpers::{app_with_seed, register_payload, test_app};

    fn server() -> TestServer {
        TestServer::new(test_app().router).unwrap()
    }

    async fn sign_in(server: &TestServer, role: &str) {
        server
            .post("/api/auth/register")
            .json(&register_payload("Test User", "tester@campus.edu", role))
            .await
            .assert_status(StatusCode::CREATED);
    }

    fn report_body() -> Value {
        json!({
            "location": "Room 204",
            "building": "Library",
            "severity": "high",
            "description": "WiFi keeps dropping every few minutes",
            "affectedAreas": ["WiFi Network"],
            "contactEmail": "tester@campus.edu"
        })
    }

    #[tokio::test]
    async fn test_health_check() {
        server().get("/health").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_protected_api_requires_session() {
        let server = server();
        server
            .get("/api/reports")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/api/auth/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_report_detail_and_status() {
        let server = TestServer::new(app_with_seed().router).unwrap();

        let detail = server.get("/api/reports/2").await;
        detail.assert_status_ok();
        let body: Value = detail.json();
        assert_eq!(body["data"]["status"], "in-progress");
        assert_eq!(body["data"]["updates"].as_array().map(Vec::len), Some(3));

        server
            .get("/api/reports/999")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let status: Value = server.get("/api/status").await.json();
        assert_eq!(status["data"]["state"], "degraded");
    }

    #[tokio::test]
    async fn test_submit_and_list_with_total() {
        let server = server();
        sign_in(&server, "student").await;

        let created = server.post("/api/reports").json(&report_body()).await;
        created.assert_status(StatusCode::CREATED);
        let created: Value = created.json();
        assert_eq!(created["data"]["id"], "1");
        assert_eq!(created["data"]["status"], "pending");

        let list: Value = server
            .get("/api/reports")
            .add_query_param("building", "Library")
            .await
            .json();
        assert_eq!(list["meta"]["total"], 1);
        assert_eq!(list["data"][0]["building"], "Library");
    }

    #[tokio::test]
    async fn test_invalid_report_returns_field_errors() {
        let server = server();
        sign_in(&server, "student").await;

        let response = server
            .post("/api/reports")
            .json(&json!({ "description": "short" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["fieldErrors"]["description"]["kind"], "too_short");
        assert_eq!(body["fieldErrors"]["location"]["kind"], "missing_field");
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let server = server();
        sign_in(&server, "staff").await;
        server.get("/api/auth/me").await.assert_status_ok();

        server.post("/api/auth/logout").await.assert_status_ok();
        server
            .get("/api/auth/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_student_cannot_update_status() {
        let server = TestServer::new(app_with_seed().router).unwrap();
        sign_in(&server, "student").await;

        server
            .patch("/api/reports/3/status")
            .json(&json!({ "status": "resolved", "message": "Fixed" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_staff_resolves_report() {
        let server = TestServer::new(app_with_seed().router).unwrap();
        sign_in(&server, "staff").await;

        let response = server
            .patch("/api/reports/3/status")
            .json(&json!({ "status": "resolved", "message": "Access point replaced" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["status"], "resolved");
        assert!(body["data"]["resolvedAt"].is_string());
        assert_eq!(body["data"]["updates"][0]["message"], "Access point replaced");
    }

    #[tokio::test]
    async fn test_protected_page_redirects_to_login() {
        let response = server().get("/dashboard").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/login");
    }

    #[tokio::test]
    async fn test_missing_report_page_renders_not_found_view() {
        let response = server().get("/report/404").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("Report Not Found"));
    }

    #[tokio::test]
    async fn test_login_form_rejects_unknown_account() {
        let response = server()
            .post("/login")
            .form(&[("email", "nobody@campus.edu"), ("password", "secret1")])
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert!(response.text().contains("Invalid email or password"));
    }

    #[tokio::test]
    async fn test_report_form_submission_shows_confirmation() {
        let server = server();
        sign_in(&server, "student").await;

        let response = server
            .post("/report")
            .form(&[
                ("location", "Room 12"),
                ("building", "Library"),
                ("severity", "medium"),
                ("description", "Ethernet ports are dead in the lab"),
                ("affectedAreas", "Ethernet Connection"),
                ("contactEmail", "tester@campus.edu"),
            ])
            .await;
        response.assert_status(StatusCode::CREATED);
        assert!(response.text().contains("Report Submitted"));

        let list: Value = server.get("/api/reports").await.json();
        assert_eq!(list["meta"]["total"], 1);
    }

    fn report_form<'a>(location: &'a str, description: &'a str) -> Vec<(&'a str, &'a str)> {
        vec![
            ("location", location),
            ("building", "Library"),
            ("severity", "medium"),
            ("description", description),
            ("affectedAreas", "Ethernet Connection"),
            ("contactEmail", "tester@campus.edu"),
        ]
    }

    #[tokio::test]
    async fn test_invalid_report_form_keeps_input_and_lists_similar() {
        let server = TestServer::new(app_with_seed().router).unwrap();
        sign_in(&server, "student").await;

        let response = server
            .post("/report")
            .form(&report_form("Room 12", "short"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let html = response.text();
        assert!(html.contains("value=\"Room 12\""));
        assert!(html.contains("Description must be at least 10 characters"));
        assert!(html.contains("Similar open reports"));
        assert!(!html.contains("Report Submitted"));

        let list: Value = server.get("/api/reports").await.json();
        assert_eq!(list["meta"]["total"], 5);
    }

    #[tokio::test]
    async fn test_report_form_success_lists_similar() {
        let server = TestServer::new(app_with_seed().router).unwrap();
        sign_in(&server, "student").await;

        let response = server
            .post("/report")
            .form(&report_form("Room 12", "Ethernet ports are dead in the lab"))
            .await;
        response.assert_status(StatusCode::CREATED);
        let html = response.text();
        assert!(html.contains("Report Submitted"));
        assert!(html.contains("Similar open reports"));
        // Only the confirmation links to the new report
        assert_eq!(html.matches("href=\"/report/6\"").count(), 1);
        assert!(html.contains("href=\"/report/2\""));
    }

    #[tokio::test]
    async fn test_report_form_rejects_unknown_severity() {
        let server = server();
        sign_in(&server, "student").await;

        let mut form = report_form("Room 12", "Ethernet ports are dead in the lab");
        form[2] = ("severity", "critical");
        let response = server.post("/report").form(&form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("Unknown severity: critical"));

        let list: Value = server.get("/api/reports").await.json();
        assert_eq!(list["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_toast_dismiss_form_returns_to_page() {
        let server = server();
        let created: Value = server
            .post("/api/notifications")
            .json(&json!({ "type": "info", "title": "Heads up", "message": "Maintenance tonight" }))
            .await
            .json();
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert!(server.get("/").await.text().contains("Maintenance tonight"));

        let response = server
            .post(&format!("/notifications/{}/dismiss", id))
            .add_header(header::REFERER, "http://localhost:3000/status")
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/status");

        let toasts: Value = server.get("/api/notifications").await.json();
        assert_eq!(toasts["data"].as_array().map(Vec::len), Some(0));

        // Dismissing again (or after expiry) still returns to the page
        server
            .post(&format!("/notifications/{}/dismiss", id))
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_toast_duration_is_capped() {
        let response = server()
            .post("/api/notifications")
            .json(&json!({ "type": "info", "title": "Long", "message": "Too long", "duration": 600000 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["fieldErrors"]["duration"]["kind"], "invalid_format");
    }

    #[tokio::test]
    async fn test_contact_support_form() {
        let server = TestServer::new(app_with_seed().router).unwrap();

        // Only signed-in users see and can post the form
        assert!(!server.get("/report/2").await.text().contains("Contact Support"));
        server
            .post("/report/2/contact")
            .form(&[("message", "Any update?")])
            .await
            .assert_status(StatusCode::SEE_OTHER);

        sign_in(&server, "student").await;
        assert!(server.get("/report/2").await.text().contains("Contact Support"));

        let response = server
            .post("/report/2/contact")
            .form(&[("message", "  ")])
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("Message is required"));

        let response = server
            .post("/report/2/contact")
            .form(&[("message", "Is there an estimate for the fix?")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/report/2");

        let toasts: Value = server.get("/api/notifications").await.json();
        let titles: Vec<&str> = toasts["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|t| t["title"].as_str())
            .collect();
        assert!(titles.contains(&"Message Sent"));

        server
            .post("/report/999/contact")
            .form(&[("message", "Hello")])
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_session_is_shared_by_all_clients() {
        let router = test_app().router;
        let first = TestServer::new(router.clone()).unwrap();
        let second = TestServer::new(router).unwrap();

        sign_in(&first, "student").await;
        let me: Value = second.get("/api/auth/me").await.json();
        assert_eq!(me["data"]["email"], "tester@campus.edu");

        second.post("/api/auth/logout").await.assert_status_ok();
        first
            .get("/api/auth/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
