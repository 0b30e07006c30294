use chrono::{DateTime, Utc};
use serde::de::value::StringDeserializer;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::features::reports::models::{
    CreateReport, Report, ReportSeverity, ReportStatus, ReportUpdate,
};
use crate::shared::validation::{
    validate_affected_areas, validate_building, validate_contact_email, validate_description,
    validate_location, ValidationKind,
};

/// Request DTO for submitting a report
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateReportDto {
    #[validate(custom(function = "validate_location"))]
    pub location: String,

    #[validate(custom(function = "validate_building"))]
    pub building: String,

    /// Defaults to `medium`
    pub severity: Option<ReportSeverity>,

    #[validate(custom(function = "validate_description"))]
    pub description: String,

    #[validate(custom(function = "validate_affected_areas"))]
    pub affected_areas: Vec<String>,

    #[validate(custom(function = "validate_contact_email"))]
    pub contact_email: String,

    pub contact_phone: Option<String>,
}

impl From<CreateReportDto> for CreateReport {
    fn from(dto: CreateReportDto) -> Self {
        Self {
            location: dto.location.trim().to_string(),
            building: dto.building,
            severity: dto.severity.unwrap_or_default(),
            description: dto.description.trim().to_string(),
            affected_areas: dto.affected_areas,
            contact_email: dto.contact_email.trim().to_string(),
            contact_phone: dto
                .contact_phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        }
    }
}

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: String,
    pub location: String,
    pub building: String,
    pub severity: ReportSeverity,
    pub status: ReportStatus,
    pub description: String,
    pub affected_areas: Vec<String>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<&Report> for ReportResponseDto {
    fn from(r: &Report) -> Self {
        Self {
            id: r.id.clone(),
            location: r.location.clone(),
            building: r.building.clone(),
            severity: r.severity,
            status: r.status(),
            description: r.description.clone(),
            affected_areas: r.affected_areas.clone(),
            contact_email: r.contact_email.clone(),
            contact_phone: r.contact_phone.clone(),
            submitted_at: r.submitted_at,
            resolved_at: r.resolved_at(),
        }
    }
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self::from(&r)
    }
}

/// Response DTO for a timeline entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportUpdateResponseDto {
    pub timestamp: DateTime<Utc>,
    pub status: ReportStatus,
    pub message: String,
}

impl From<&ReportUpdate> for ReportUpdateResponseDto {
    fn from(u: &ReportUpdate) -> Self {
        Self {
            timestamp: u.timestamp,
            status: u.status,
            message: u.message.clone(),
        }
    }
}

/// Response DTO for report with its timeline, newest update first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDetailResponseDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    pub updates: Vec<ReportUpdateResponseDto>,
}

impl From<&Report> for ReportDetailResponseDto {
    fn from(r: &Report) -> Self {
        Self {
            report: r.into(),
            updates: r
                .updates_newest_first()
                .into_iter()
                .map(ReportUpdateResponseDto::from)
                .collect(),
        }
    }
}

/// Categorical filter: either everything or one concrete value
///
/// Parsed from a query value where `all` (or an empty value) means no
/// filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterValue<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> FilterValue<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            FilterValue::All => true,
            FilterValue::Only(expected) => expected == value,
        }
    }
}

impl<T: std::fmt::Display> FilterValue<T> {
    /// Query string form, `all` when unfiltered
    pub fn to_query_value(&self) -> String {
        match self {
            FilterValue::All => "all".to_string(),
            FilterValue::Only(value) => value.to_string(),
        }
    }
}

impl<'de, T> Deserialize<'de> for FilterValue<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            return Ok(FilterValue::All);
        }
        T::deserialize(StringDeserializer::<D::Error>::new(raw)).map(FilterValue::Only)
    }
}

/// Sort key for the report list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportSort {
    /// Newest submission first
    #[default]
    Recent,
    Oldest,
    /// High before medium before low
    Severity,
}

impl ReportSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSort::Recent => "recent",
            ReportSort::Oldest => "oldest",
            ReportSort::Severity => "severity",
        }
    }
}

/// Query parameters for listing reports
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Case-insensitive match against location, building and description
    pub search: String,
    /// `all`, `low`, `medium` or `high`
    #[param(value_type = Option<String>)]
    pub severity: FilterValue<ReportSeverity>,
    /// `all`, `pending`, `in-progress` or `resolved`
    #[param(value_type = Option<String>)]
    pub status: FilterValue<ReportStatus>,
    /// `all` or an exact building name
    #[param(value_type = Option<String>)]
    pub building: FilterValue<String>,
    #[param(value_type = Option<ReportSort>)]
    pub sort: ReportSort,
}

/// Request DTO for posting a status update (staff and faculty)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,

    #[validate(custom(function = "validate_update_message"))]
    pub message: String,
}

/// Request DTO for messaging IT support about a report
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct ContactSupportDto {
    #[validate(custom(function = "validate_update_message"))]
    pub message: String,
}

/// Request DTO for the duplicate advisory
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SimilarReportsRequestDto {
    pub building: String,
    pub affected_areas: Vec<String>,
}

/// Kind of issue for the one-click quick report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuickIssue {
    Slow,
    Down,
    Intermittent,
}

impl QuickIssue {
    pub fn label(&self) -> &'static str {
        match self {
            QuickIssue::Slow => "Slow Connection",
            QuickIssue::Down => "No Internet",
            QuickIssue::Intermittent => "Intermittent Connection",
        }
    }
}

/// Request DTO for a quick report
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct QuickReportDto {
    pub issue: QuickIssue,

    #[validate(custom(function = "validate_location"))]
    pub location: String,
}

/// Acknowledgement for a quick report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickReportAckDto {
    pub issue: QuickIssue,
    pub location: String,
    pub received_at: DateTime<Utc>,
}

fn validate_update_message(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(ValidationKind::MissingField.code())
            .with_message("Message is required".into()));
    }
    Ok(())
}
