use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::error::Result;
use crate::features::reports::models::{Report, ReportSeverity, ReportStatus};
use crate::features::reports::repositories::ReportRepository;
use crate::features::reports::services::distinct_buildings;
use crate::features::status::dtos::{
    NetworkStatusDto, OverallState, SeverityCountsDto, StatusCountsDto,
};

/// Number of resolved reports shown on the status page
const RECENTLY_RESOLVED_LIMIT: usize = 5;

/// Service for the aggregate network status view
pub struct StatusService {
    repository: Arc<dyn ReportRepository>,
}

impl StatusService {
    pub fn new(repository: Arc<dyn ReportRepository>) -> Self {
        Self { repository }
    }

    pub async fn network_status(&self) -> Result<NetworkStatusDto> {
        let reports = self.repository.list().await?;
        Ok(summarize(&reports, Utc::now()))
    }
}

/// Build the status view from the full report set
pub fn summarize(reports: &[Report], generated_at: DateTime<Utc>) -> NetworkStatusDto {
    let mut active: Vec<&Report> = reports.iter().filter(|r| r.status().is_open()).collect();
    active.sort_by_key(|r| (r.severity.rank(), Reverse(r.submitted_at)));

    let mut resolved: Vec<&Report> = reports
        .iter()
        .filter(|r| r.status() == ReportStatus::Resolved)
        .collect();
    resolved.sort_by_key(|r| Reverse(r.resolved_at()));
    resolved.truncate(RECENTLY_RESOLVED_LIMIT);

    let mut by_status = StatusCountsDto::default();
    for report in reports {
        match report.status() {
            ReportStatus::Pending => by_status.pending += 1,
            ReportStatus::InProgress => by_status.in_progress += 1,
            ReportStatus::Resolved => by_status.resolved += 1,
        }
    }

    let mut by_severity = SeverityCountsDto::default();
    for report in &active {
        match report.severity {
            ReportSeverity::High => by_severity.high += 1,
            ReportSeverity::Medium => by_severity.medium += 1,
            ReportSeverity::Low => by_severity.low += 1,
        }
    }

    let state = if by_severity.high > 0 {
        OverallState::Outage
    } else if !active.is_empty() {
        OverallState::Degraded
    } else {
        OverallState::Operational
    };

    let active_owned: Vec<Report> = active.iter().map(|r| (*r).clone()).collect();

    NetworkStatusDto {
        state,
        affected_buildings: distinct_buildings(&active_owned),
        active_issues: active_owned.iter().map(Into::into).collect(),
        resolved_issues: resolved.into_iter().map(Into::into).collect(),
        by_status,
        by_severity,
        generated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::CreateReport;
    use crate::features::reports::repositories::mock_reports;
    use chrono::Duration;

    fn report(id: &str, severity: ReportSeverity, building: &str, age_hours: i64) -> Report {
        let data = CreateReport {
            location: "Hall".to_string(),
            building: building.to_string(),
            severity,
            description: "Network is unreliable".to_string(),
            affected_areas: vec!["WiFi Network".to_string()],
            contact_email: "a@campus.edu".to_string(),
            contact_phone: None,
        };
        Report::new(
            id.to_string(),
            data,
            Utc::now() - Duration::hours(age_hours),
            "received",
        )
    }

    #[test]
    fn test_seed_status() {
        let status = summarize(&mock_reports(Utc::now()), Utc::now());

        // Report 5 is medium, so the low severity report 3 comes last
        let active: Vec<&str> = status.active_issues.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(active, vec!["2", "5", "3"]);

        let resolved: Vec<&str> = status.resolved_issues.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(resolved, vec!["1", "4"]);

        assert_eq!(
            status.by_status,
            StatusCountsDto {
                pending: 1,
                in_progress: 2,
                resolved: 2
            }
        );
        assert_eq!(status.by_severity.high, 0);
        assert_eq!(status.state, OverallState::Degraded);
        assert_eq!(
            status.affected_buildings,
            vec!["Library", "Administration Building", "Engineering Hall"]
        );
    }

    #[test]
    fn test_overall_state() {
        assert_eq!(summarize(&[], Utc::now()).state, OverallState::Operational);

        let reports = vec![
            report("1", ReportSeverity::Low, "Library", 1),
            report("2", ReportSeverity::High, "Dormitory A", 3),
        ];
        let status = summarize(&reports, Utc::now());
        assert_eq!(status.state, OverallState::Outage);
        assert_eq!(status.active_issues[0].id, "2");

        let mut fixed = reports[1].clone();
        fixed.apply_update(ReportStatus::Resolved, "Fixed", Utc::now());
        let status = summarize(&[reports[0].clone(), fixed], Utc::now());
        assert_eq!(status.state, OverallState::Degraded);
    }

    #[test]
    fn test_active_ties_broken_by_recency() {
        let reports = vec![
            report("old", ReportSeverity::Medium, "Library", 5),
            report("new", ReportSeverity::Medium, "Library", 1),
        ];
        let status = summarize(&reports, Utc::now());
        let ids: Vec<&str> = status.active_issues.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert_eq!(status.affected_buildings, vec!["Library"]);
    }
}
