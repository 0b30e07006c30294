use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Report severity, ordered high to low by `rank`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportSeverity {
    Low,
    #[default]
    Medium,
    High,
}

impl ReportSeverity {
    pub const ALL: [ReportSeverity; 3] = [
        ReportSeverity::High,
        ReportSeverity::Medium,
        ReportSeverity::Low,
    ];

    /// Sort rank: high = 0, medium = 1, low = 2
    pub fn rank(&self) -> u8 {
        match self {
            ReportSeverity::High => 0,
            ReportSeverity::Medium => 1,
            ReportSeverity::Low => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSeverity::Low => "low",
            ReportSeverity::Medium => "medium",
            ReportSeverity::High => "high",
        }
    }
}

impl std::fmt::Display for ReportSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReportSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("Unknown severity: {}", s))
    }
}

/// Report status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 3] = [
        ReportStatus::Pending,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::InProgress => "in-progress",
            ReportStatus::Resolved => "resolved",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Resolved => "Resolved",
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, ReportStatus::Resolved)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}

/// One entry of a report's timeline. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportUpdate {
    pub timestamp: DateTime<Utc>,
    pub status: ReportStatus,
    pub message: String,
}

/// Outage report
///
/// `status`, `resolved_at` and `updates` only change through
/// [`Report::apply_update`], which keeps `resolved_at` set exactly when the
/// report is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: String,
    pub location: String,
    pub building: String,
    pub severity: ReportSeverity,
    pub description: String,
    pub affected_areas: Vec<String>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub submitted_at: DateTime<Utc>,
    status: ReportStatus,
    resolved_at: Option<DateTime<Utc>>,
    updates: Vec<ReportUpdate>,
}

/// Validated data for creating a new report
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub location: String,
    pub building: String,
    pub severity: ReportSeverity,
    pub description: String,
    pub affected_areas: Vec<String>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
}

impl Report {
    /// New pending report with its first timeline entry
    pub fn new(
        id: String,
        data: CreateReport,
        submitted_at: DateTime<Utc>,
        received_message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            location: data.location,
            building: data.building,
            severity: data.severity,
            description: data.description,
            affected_areas: data.affected_areas,
            contact_email: data.contact_email,
            contact_phone: data.contact_phone,
            submitted_at,
            status: ReportStatus::Pending,
            resolved_at: None,
            updates: vec![ReportUpdate {
                timestamp: submitted_at,
                status: ReportStatus::Pending,
                message: received_message.into(),
            }],
        }
    }

    pub fn status(&self) -> ReportStatus {
        self.status
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Timeline in insertion order
    pub fn updates(&self) -> &[ReportUpdate] {
        &self.updates
    }

    /// Timeline newest first; entries with equal timestamps keep insertion order
    pub fn updates_newest_first(&self) -> Vec<&ReportUpdate> {
        let mut updates: Vec<&ReportUpdate> = self.updates.iter().collect();
        updates.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        updates
    }

    /// Move the report to `status` and record it on the timeline
    pub fn apply_update(
        &mut self,
        status: ReportStatus,
        message: impl Into<String>,
        at: DateTime<Utc>,
    ) -> &ReportUpdate {
        self.status = status;
        self.resolved_at = match status {
            ReportStatus::Resolved => Some(at),
            _ => None,
        };
        self.updates.push(ReportUpdate {
            timestamp: at,
            status,
            message: message.into(),
        });
        &self.updates[self.updates.len() - 1]
    }
}
