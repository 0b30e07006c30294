//! Template engine for the server-rendered pages using Jinja2 syntax.
//!
//! Templates live in `templates/pages/` and are compiled into the binary,
//! so rendering does not depend on the working directory.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// (name, source) of every page template
const PAGE_TEMPLATES: &[(&str, &str)] = &[
    (
        "layout.jinja",
        include_str!("../../../templates/pages/layout.jinja"),
    ),
    ("home.jinja", include_str!("../../../templates/pages/home.jinja")),
    (
        "login.jinja",
        include_str!("../../../templates/pages/login.jinja"),
    ),
    (
        "register.jinja",
        include_str!("../../../templates/pages/register.jinja"),
    ),
    (
        "dashboard.jinja",
        include_str!("../../../templates/pages/dashboard.jinja"),
    ),
    (
        "report_form.jinja",
        include_str!("../../../templates/pages/report_form.jinja"),
    ),
    (
        "report_detail.jinja",
        include_str!("../../../templates/pages/report_detail.jinja"),
    ),
    (
        "report_not_found.jinja",
        include_str!("../../../templates/pages/report_not_found.jinja"),
    ),
    (
        "history.jinja",
        include_str!("../../../templates/pages/history.jinja"),
    ),
    (
        "status.jinja",
        include_str!("../../../templates/pages/status.jinja"),
    ),
    ("faq.jinja", include_str!("../../../templates/pages/faq.jinja")),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);

    for (name, source) in PAGE_TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

/// Get the global template environment
fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a page template with a serializable context.
///
/// # Example
/// ```ignore
/// let html = render_template("faq.jinja", minijinja::context! { title => "FAQ" })?;
/// ```
pub fn render_template<S: Serialize>(template_name: &str, ctx: S) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Check if a template exists
#[cfg(test)]
fn template_exists(template_name: &str) -> bool {
    get_environment().get_template(template_name).is_ok()
}
