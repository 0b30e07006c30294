use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::core::error::Result;
use crate::features::reports::models::{CreateReport, Report, ReportStatus};

/// First timeline entry of every new report
const REPORT_RECEIVED_MESSAGE: &str = "Report received and queued for review.";

/// Storage seam for reports
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Append a new pending report and return it with its assigned id
    async fn create(&self, data: CreateReport, submitted_at: DateTime<Utc>) -> Result<Report>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Report>>;

    /// Every report in insertion order
    async fn list(&self) -> Result<Vec<Report>>;

    /// Record a status change; `None` when the report does not exist
    async fn update_status(
        &self,
        id: &str,
        status: ReportStatus,
        message: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Report>>;
}

struct ReportTable {
    reports: Vec<Report>,
    next_id: u64,
}

/// Process-local report repository
///
/// Ids are sequential decimal strings continuing after the highest numeric
/// id already present.
pub struct InMemoryReportRepository {
    table: RwLock<ReportTable>,
}

impl InMemoryReportRepository {
    pub fn new(reports: Vec<Report>) -> Self {
        let next_id = reports
            .iter()
            .filter_map(|r| r.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            table: RwLock::new(ReportTable { reports, next_id }),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn create(&self, data: CreateReport, submitted_at: DateTime<Utc>) -> Result<Report> {
        let mut table = self.table.write().await;
        let id = table.next_id.to_string();
        table.next_id += 1;

        let report = Report::new(id, data, submitted_at, REPORT_RECEIVED_MESSAGE);
        table.reports.push(report.clone());
        Ok(report)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Report>> {
        let table = self.table.read().await;
        Ok(table.reports.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Report>> {
        Ok(self.table.read().await.reports.clone())
    }

    async fn update_status(
        &self,
        id: &str,
        status: ReportStatus,
        message: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Report>> {
        let mut table = self.table.write().await;
        let Some(report) = table.reports.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        report.apply_update(status, message, at);
        Ok(Some(report.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::ReportSeverity;
    use crate::features::reports::repositories::mock_reports;

    fn data(building: &str) -> CreateReport {
        CreateReport {
            location: "Lobby".to_string(),
            building: building.to_string(),
            severity: ReportSeverity::Low,
            description: "Slow network in the lobby".to_string(),
            affected_areas: vec!["WiFi Network".to_string()],
            contact_email: "a@campus.edu".to_string(),
            contact_phone: None,
        }
    }

    #[tokio::test]
    async fn test_create_appends_after_seed() {
        let repo = InMemoryReportRepository::new(mock_reports(Utc::now()));
        let report = repo.create(data("Library"), Utc::now()).await.unwrap();

        assert_eq!(report.id, "6");
        assert_eq!(report.status(), ReportStatus::Pending);
        assert_eq!(report.updates().len(), 1);

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(all.last().map(|r| r.id.as_str()), Some("6"));
    }

    #[tokio::test]
    async fn test_get_and_update() {
        let repo = InMemoryReportRepository::empty();
        let created = repo.create(data("Library"), Utc::now()).await.unwrap();
        assert_eq!(created.id, "1");

        let updated = repo
            .update_status("1", ReportStatus::Resolved, "Fixed", Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert!(updated.resolved_at().is_some());

        let stored = repo.get_by_id("1").await.unwrap().unwrap();
        assert_eq!(stored, updated);

        assert!(repo.get_by_id("99").await.unwrap().is_none());
        assert!(repo
            .update_status("99", ReportStatus::Resolved, "Fixed", Utc::now())
            .await
            .unwrap()
            .is_none());
    }
}
