use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reports::dtos::ReportResponseDto;

/// Campus-wide network state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OverallState {
    /// No open reports
    Operational,
    /// Open reports, none of them high severity
    Degraded,
    /// At least one open high severity report
    Outage,
}

impl OverallState {
    pub fn label(&self) -> &'static str {
        match self {
            OverallState::Operational => "All Systems Operational",
            OverallState::Degraded => "Degraded Performance",
            OverallState::Outage => "Service Outage",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCountsDto {
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

/// Severity counts over open reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeverityCountsDto {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Response DTO for the network status page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatusDto {
    pub state: OverallState,
    /// Open reports, most severe first, then most recent
    pub active_issues: Vec<ReportResponseDto>,
    /// Latest resolutions first
    pub resolved_issues: Vec<ReportResponseDto>,
    pub by_status: StatusCountsDto,
    pub by_severity: SeverityCountsDto,
    /// Buildings with open reports
    pub affected_buildings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
