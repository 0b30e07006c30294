use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use minijinja::{context, Value};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{LoginRequestDto, RegisterRequestDto};
use crate::features::auth::model::{AuthenticatedUser, UserRole};
use crate::features::auth::AuthService;
use crate::features::notifications::NotificationService;
use crate::features::pages::navigation::{nav_links, Page};
use crate::features::reports::dtos::{
    ContactSupportDto, CreateReportDto, ReportDetailResponseDto, ReportQuery, ReportResponseDto,
    SimilarReportsRequestDto,
};
use crate::features::reports::models::{Report, ReportSeverity, ReportStatus};
use crate::features::reports::ReportService;
use crate::features::status::StatusService;
use crate::shared::constants::{AFFECTED_AREAS, BUILDINGS};
use crate::shared::templates::render_template;
use crate::shared::types::FieldErrorDto;
use crate::shared::validation::{FieldErrors, ValidationKind};

/// State for page handlers
#[derive(Clone)]
pub struct PageState {
    pub auth: Arc<AuthService>,
    pub reports: Arc<ReportService>,
    pub status: Arc<StatusService>,
    pub notifications: Arc<NotificationService>,
}

/// Number of reports listed on the dashboard
const DASHBOARD_RECENT_REPORTS: usize = 3;

/// A failed form submission, rendered back onto the form
struct FormFailure {
    status: StatusCode,
    error: Option<String>,
    field_errors: BTreeMap<String, FieldErrorDto>,
}

impl FormFailure {
    /// Errors a form can show; anything else propagates
    fn from_error(err: AppError) -> Result<Self> {
        let (status, error, field_errors) = match err {
            AppError::FieldValidation(errors) => {
                (StatusCode::BAD_REQUEST, None, errors.to_dto())
            }
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Some("Invalid email or password".to_string()),
                BTreeMap::new(),
            ),
            AppError::DuplicateAccount(msg) | AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, Some(msg), BTreeMap::new())
            }
            other => return Err(other),
        };
        Ok(Self {
            status,
            error,
            field_errors,
        })
    }
}

async fn render(
    state: &PageState,
    title: &str,
    user: Option<&AuthenticatedUser>,
    template: &str,
    extra: Value,
    status: StatusCode,
) -> Result<Response> {
    let toasts = state.notifications.list().await;
    let ctx = context! {
        title => title,
        user => user,
        nav => nav_links(user.is_some()),
        toasts => toasts,
        ..extra
    };
    let html = render_template(template, ctx)?;
    Ok((status, Html(html)).into_response())
}

fn severities() -> Vec<&'static str> {
    ReportSeverity::ALL.iter().map(|s| s.as_str()).collect()
}

pub async fn home(
    State(state): State<PageState>,
    user: Option<AuthenticatedUser>,
) -> Result<Response> {
    let status = state.status.network_status().await?;
    render(
        &state,
        Page::Home.title(),
        user.as_ref(),
        "home.jinja",
        context! { state_label => status.state.label() },
        StatusCode::OK,
    )
    .await
}

pub async fn login_page(
    State(state): State<PageState>,
    user: Option<AuthenticatedUser>,
) -> Result<Response> {
    render_login(&state, user.as_ref(), LoginRequestDto::default(), None).await
}

async fn render_login(
    state: &PageState,
    user: Option<&AuthenticatedUser>,
    mut form: LoginRequestDto,
    failure: Option<FormFailure>,
) -> Result<Response> {
    form.password.clear();
    let (status, error, field_errors) = match failure {
        Some(f) => (f.status, f.error, f.field_errors),
        None => (StatusCode::OK, None, BTreeMap::new()),
    };
    render(
        state,
        Page::Login.title(),
        user,
        "login.jinja",
        context! { form => form, error => error, field_errors => field_errors },
        status,
    )
    .await
}

pub async fn login_submit(
    State(state): State<PageState>,
    Form(form): Form<LoginRequestDto>,
) -> Result<Response> {
    match state.auth.login(form.clone()).await {
        Ok(_) => Ok(Redirect::to(Page::Dashboard.path()).into_response()),
        Err(e) => {
            let failure = FormFailure::from_error(e)?;
            render_login(&state, None, form, Some(failure)).await
        }
    }
}

pub async fn register_page(
    State(state): State<PageState>,
    user: Option<AuthenticatedUser>,
) -> Result<Response> {
    render_register(&state, user.as_ref(), RegisterRequestDto::default(), None).await
}

async fn render_register(
    state: &PageState,
    user: Option<&AuthenticatedUser>,
    mut form: RegisterRequestDto,
    failure: Option<FormFailure>,
) -> Result<Response> {
    form.password.clear();
    form.confirm_password.clear();
    let (status, error, field_errors) = match failure {
        Some(f) => (f.status, f.error, f.field_errors),
        None => (StatusCode::OK, None, BTreeMap::new()),
    };
    let roles: Vec<&str> = [UserRole::Student, UserRole::Staff, UserRole::Faculty]
        .iter()
        .map(|r| r.as_str())
        .collect();
    render(
        state,
        Page::Register.title(),
        user,
        "register.jinja",
        context! {
            form => form,
            roles => roles,
            error => error,
            field_errors => field_errors,
        },
        status,
    )
    .await
}

pub async fn register_submit(
    State(state): State<PageState>,
    Form(form): Form<RegisterRequestDto>,
) -> Result<Response> {
    match state.auth.register(form.clone()).await {
        Ok(_) => Ok(Redirect::to(Page::Dashboard.path()).into_response()),
        Err(e) => {
            let failure = FormFailure::from_error(e)?;
            render_register(&state, None, form, Some(failure)).await
        }
    }
}

pub async fn logout(State(state): State<PageState>) -> Result<Response> {
    state.auth.logout().await?;
    Ok(Redirect::to(Page::Home.path()).into_response())
}

pub async fn dashboard(
    State(state): State<PageState>,
    user: AuthenticatedUser,
) -> Result<Response> {
    let (reports, total) = state.reports.list(&ReportQuery::default()).await?;
    let pending = reports
        .iter()
        .filter(|r| r.status() == ReportStatus::Pending)
        .count();
    let resolved = reports
        .iter()
        .filter(|r| r.status() == ReportStatus::Resolved)
        .count();
    let recent: Vec<ReportResponseDto> = reports
        .iter()
        .take(DASHBOARD_RECENT_REPORTS)
        .map(Into::into)
        .collect();

    render(
        &state,
        Page::Dashboard.title(),
        Some(&user),
        "dashboard.jinja",
        context! {
            total => total,
            pending => pending,
            resolved => resolved,
            recent => recent,
        },
        StatusCode::OK,
    )
    .await
}

pub async fn report_form(
    State(state): State<PageState>,
    user: AuthenticatedUser,
) -> Result<Response> {
    render_report_form(&state, &user, ReportFormView::default()).await
}

#[derive(Default)]
struct ReportFormView {
    form: Option<CreateReportDto>,
    submitted: Option<ReportResponseDto>,
    similar: Vec<ReportResponseDto>,
    failure: Option<FormFailure>,
}

async fn render_report_form(
    state: &PageState,
    user: &AuthenticatedUser,
    view: ReportFormView,
) -> Result<Response> {
    let form = view.form.unwrap_or_else(|| CreateReportDto {
        severity: Some(ReportSeverity::Medium),
        ..Default::default()
    });
    let (status, error, field_errors) = match view.failure {
        Some(f) => (f.status, f.error, f.field_errors),
        None if view.submitted.is_some() => (StatusCode::CREATED, None, BTreeMap::new()),
        None => (StatusCode::OK, None, BTreeMap::new()),
    };

    render(
        state,
        Page::Report.title(),
        Some(user),
        "report_form.jinja",
        context! {
            form => form,
            submitted => view.submitted,
            similar => view.similar,
            error => error,
            field_errors => field_errors,
            buildings => BUILDINGS,
            areas => AFFECTED_AREAS,
            severities => severities(),
        },
        status,
    )
    .await
}

/// Build the report payload from urlencoded form pairs.
/// `affectedAreas` repeats once per checked box. Values the payload cannot
/// hold, such as an unknown severity, come back as field errors.
fn report_dto_from_form(fields: Vec<(String, String)>) -> (CreateReportDto, FieldErrors) {
    let mut dto = CreateReportDto::default();
    let mut errors = FieldErrors::new();
    for (key, value) in fields {
        match key.as_str() {
            "location" => dto.location = value,
            "building" => dto.building = value,
            "severity" if value.is_empty() => dto.severity = None,
            "severity" => match value.parse::<ReportSeverity>() {
                Ok(severity) => dto.severity = Some(severity),
                Err(msg) => errors.add("severity", ValidationKind::InvalidFormat, msg),
            },
            "description" => dto.description = value,
            "affectedAreas" => dto.affected_areas.push(value),
            "contactEmail" => dto.contact_email = value,
            "contactPhone" => dto.contact_phone = Some(value),
            _ => {}
        }
    }
    (dto, errors)
}

pub async fn submit_report(
    State(state): State<PageState>,
    user: AuthenticatedUser,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let (dto, mut form_errors) = report_dto_from_form(fields);

    // Looked up before submitting so the new report is not its own match
    let similar: Vec<ReportResponseDto> = state
        .reports
        .find_similar(&SimilarReportsRequestDto {
            building: dto.building.clone(),
            affected_areas: dto.affected_areas.clone(),
        })
        .await?
        .iter()
        .map(Into::into)
        .collect();

    let result = if form_errors.is_empty() {
        state.reports.submit(&user, dto.clone()).await
    } else {
        if let Err(e) = dto.validate() {
            form_errors.merge(FieldErrors::from(e));
        }
        Err(AppError::FieldValidation(form_errors))
    };

    match result {
        // Success resets the form
        Ok(report) => {
            let view = ReportFormView {
                submitted: Some(ReportResponseDto::from(&report)),
                similar,
                ..Default::default()
            };
            render_report_form(&state, &user, view).await
        }
        Err(e) => {
            let failure = FormFailure::from_error(e)?;
            let view = ReportFormView {
                form: Some(dto),
                similar,
                failure: Some(failure),
                ..Default::default()
            };
            render_report_form(&state, &user, view).await
        }
    }
}

async fn render_report_detail(
    state: &PageState,
    user: Option<&AuthenticatedUser>,
    report: &Report,
    contact: ContactSupportDto,
    failure: Option<FormFailure>,
) -> Result<Response> {
    let (status, error, field_errors) = match failure {
        Some(f) => (f.status, f.error, f.field_errors),
        None => (StatusCode::OK, None, BTreeMap::new()),
    };
    render(
        state,
        &format!("Report #{}", report.id),
        user,
        "report_detail.jinja",
        context! {
            report => ReportDetailResponseDto::from(report),
            status_label => report.status().label(),
            contact => context! { message => contact.message },
            error => error,
            field_errors => field_errors,
        },
        status,
    )
    .await
}

async fn render_report_not_found(
    state: &PageState,
    user: Option<&AuthenticatedUser>,
) -> Result<Response> {
    render(
        state,
        "Report Not Found",
        user,
        "report_not_found.jinja",
        context! {},
        StatusCode::NOT_FOUND,
    )
    .await
}

pub async fn report_detail(
    State(state): State<PageState>,
    user: Option<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Response> {
    match state.reports.open(&id).await {
        Ok(report) => {
            render_report_detail(
                &state,
                user.as_ref(),
                &report,
                ContactSupportDto::default(),
                None,
            )
            .await
        }
        Err(AppError::NotFound(_)) => render_report_not_found(&state, user.as_ref()).await,
        Err(e) => Err(e),
    }
}

/// Contact form on the report page; success returns to the report
pub async fn contact_support(
    State(state): State<PageState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Form(form): Form<ContactSupportDto>,
) -> Result<Response> {
    match state.reports.contact_support(&id, form.clone(), &user).await {
        Ok(()) => Ok(Redirect::to(&format!("/report/{}", id)).into_response()),
        Err(AppError::NotFound(_)) => render_report_not_found(&state, Some(&user)).await,
        Err(e) => {
            let failure = FormFailure::from_error(e)?;
            match state.reports.get_by_id(&id).await {
                Ok(report) => {
                    render_report_detail(&state, Some(&user), &report, form, Some(failure)).await
                }
                Err(AppError::NotFound(_)) => render_report_not_found(&state, Some(&user)).await,
                Err(e) => Err(e),
            }
        }
    }
}

/// Path of the page the request came from, `/` when unknown
fn referring_path(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|p| p.as_str().to_string()))
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| Page::Home.path().to_string())
}

/// Close button on a toast; an already expired toast is not an error
pub async fn dismiss_toast(
    State(state): State<PageState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    match state.notifications.dismiss(&id).await {
        Ok(_) | Err(AppError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }
    Ok(Redirect::to(&referring_path(&headers)).into_response())
}

pub async fn history(
    State(state): State<PageState>,
    user: AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> Result<Response> {
    let (reports, total) = state.reports.list(&query).await?;
    let buildings = state.reports.buildings().await?;
    let reports: Vec<ReportResponseDto> = reports.iter().map(Into::into).collect();
    let statuses: Vec<Value> = ReportStatus::ALL
        .iter()
        .map(|s| context! { value => s.as_str(), label => s.label() })
        .collect();

    render(
        &state,
        Page::History.title(),
        Some(&user),
        "history.jinja",
        context! {
            reports => reports,
            total => total,
            buildings => buildings,
            severities => severities(),
            statuses => statuses,
            filters => context! {
                search => query.search,
                severity => query.severity.to_query_value(),
                status => query.status.to_query_value(),
                building => query.building.to_query_value(),
                sort => query.sort.as_str(),
            },
        },
        StatusCode::OK,
    )
    .await
}

pub async fn status_page(
    State(state): State<PageState>,
    user: Option<AuthenticatedUser>,
) -> Result<Response> {
    let status = state.status.network_status().await?;
    let state_label = status.state.label();
    render(
        &state,
        Page::Status.title(),
        user.as_ref(),
        "status.jinja",
        context! { status => status, state_label => state_label },
        StatusCode::OK,
    )
    .await
}

pub async fn faq(
    State(state): State<PageState>,
    user: Option<AuthenticatedUser>,
) -> Result<Response> {
    render(
        &state,
        Page::Faq.title(),
        user.as_ref(),
        "faq.jinja",
        context! {},
        StatusCode::OK,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_report_form_collects_repeated_areas() {
        let (dto, errors) = report_dto_from_form(vec![
            pair("location", "Room 4"),
            pair("building", "Library"),
            pair("severity", "high"),
            pair("affectedAreas", "WiFi Network"),
            pair("affectedAreas", "VPN Access"),
            pair("contactEmail", "a@campus.edu"),
            pair("unknown", "ignored"),
        ]);
        assert!(errors.is_empty());
        assert_eq!(dto.location, "Room 4");
        assert_eq!(dto.severity, Some(ReportSeverity::High));
        assert_eq!(dto.affected_areas, vec!["WiFi Network", "VPN Access"]);
        assert!(dto.contact_phone.is_none());
    }

    #[test]
    fn test_unknown_severity_is_a_field_error() {
        let (dto, errors) = report_dto_from_form(vec![pair("severity", "critical")]);
        assert!(dto.severity.is_none());
        assert_eq!(errors.kind_of("severity"), Some(ValidationKind::InvalidFormat));
    }

    #[test]
    fn test_blank_severity_uses_default() {
        let (dto, errors) = report_dto_from_form(vec![pair("severity", "")]);
        assert!(dto.severity.is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_referring_path_stays_on_site() {
        let mut headers = HeaderMap::new();
        assert_eq!(referring_path(&headers), "/");

        headers.insert(
            header::REFERER,
            "http://localhost:3000/history?sort=oldest".parse().unwrap(),
        );
        assert_eq!(referring_path(&headers), "/history?sort=oldest");

        headers.insert(header::REFERER, "http://evil.example//evil.example/x".parse().unwrap());
        assert_eq!(referring_path(&headers), "/");
    }
}
