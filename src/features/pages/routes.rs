use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, MethodRouter},
    Router,
};

use crate::core::middleware::{load_session_middleware, require_page_session};
use crate::features::pages::handlers::{self, PageState};
use crate::features::pages::navigation::Page;

fn page_route(page: Page) -> MethodRouter<PageState> {
    match page {
        Page::Home => get(handlers::home),
        Page::Login => get(handlers::login_page).post(handlers::login_submit),
        Page::Register => get(handlers::register_page).post(handlers::register_submit),
        Page::Dashboard => get(handlers::dashboard),
        Page::Report => get(handlers::report_form).post(handlers::submit_report),
        Page::ReportDetail => get(handlers::report_detail),
        Page::History => get(handlers::history),
        Page::Status => get(handlers::status_page),
        Page::Faq => get(handlers::faq),
    }
}

/// Server-rendered pages
///
/// Every page sees the session user when there is one. Pages that need a
/// session redirect to the login page instead of rendering.
pub fn routes(state: PageState) -> Router {
    let (protected, public) = Page::ALL.into_iter().fold(
        (Router::new(), Router::new()),
        |(protected, public), page| {
            if page.requires_session() {
                (protected.route(page.path(), page_route(page)), public)
            } else {
                (protected, public.route(page.path(), page_route(page)))
            }
        },
    );

    protected
        .route("/report/{id}/contact", post(handlers::contact_support))
        .route_layer(from_fn(require_page_session))
        .merge(
            public
                .route("/logout", post(handlers::logout))
                .route("/notifications/{id}/dismiss", post(handlers::dismiss_toast)),
        )
        .layer(from_fn_with_state(
            Arc::clone(&state.auth),
            load_session_middleware,
        ))
        .with_state(state)
}
