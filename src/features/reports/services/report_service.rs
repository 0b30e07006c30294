use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use validator::Validate;

use crate::core::config::{NotificationConfig, ReportsConfig};
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::notifications::{NewToast, NotificationService, ToastType};
use crate::features::reports::dtos::{
    ContactSupportDto, CreateReportDto, QuickReportAckDto, QuickReportDto, ReportQuery,
    SimilarReportsRequestDto, UpdateReportStatusDto,
};
use crate::features::reports::models::{CreateReport, Report, ReportStatus};
use crate::features::reports::repositories::ReportRepository;
use crate::features::reports::services::{distinct_buildings, filter_reports, find_similar};
use crate::shared::validation::FieldErrors;

const SUBMITTED_TITLE: &str = "Report Submitted Successfully";
const SUBMITTED_MESSAGE: &str =
    "Thank you for reporting this issue. Our IT team has been notified and will investigate shortly.";

/// Toast message shown when a report is opened
pub fn status_message(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Pending => "Your report is pending review",
        ReportStatus::InProgress => "Your issue is being investigated",
        ReportStatus::Resolved => "Your issue has been resolved",
    }
}

/// Service for report operations
pub struct ReportService {
    repository: Arc<dyn ReportRepository>,
    notifications: Arc<NotificationService>,
    submission_delay: Duration,
    status_toast_duration: Duration,
    in_flight: Mutex<HashSet<String>>,
}

/// Holds a user's submission slot until dropped
struct SubmissionSlot<'a> {
    in_flight: &'a Mutex<HashSet<String>>,
    user_id: String,
}

impl Drop for SubmissionSlot<'_> {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(&self.user_id);
        }
    }
}

impl ReportService {
    pub fn new(
        repository: Arc<dyn ReportRepository>,
        notifications: Arc<NotificationService>,
        reports: &ReportsConfig,
        notification_config: &NotificationConfig,
    ) -> Self {
        Self {
            repository,
            notifications,
            submission_delay: reports.submission_delay,
            status_toast_duration: notification_config.status_toast_duration,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    fn claim_slot(&self, user_id: &str) -> Result<SubmissionSlot<'_>> {
        let mut in_flight = self
            .in_flight
            .lock()
            .map_err(|_| AppError::Internal("Submission tracker poisoned".to_string()))?;

        if !in_flight.insert(user_id.to_string()) {
            return Err(AppError::Conflict(
                "A report submission is already in progress".to_string(),
            ));
        }

        Ok(SubmissionSlot {
            in_flight: &self.in_flight,
            user_id: user_id.to_string(),
        })
    }

    /// Validate and store a new report
    ///
    /// Fails with `Conflict` while the same user already has a submission
    /// in flight.
    pub async fn submit(&self, user: &AuthenticatedUser, dto: CreateReportDto) -> Result<Report> {
        dto.validate().map_err(FieldErrors::from)?;

        let _slot = self.claim_slot(&user.id)?;
        tokio::time::sleep(self.submission_delay).await;

        let report = self
            .repository
            .create(CreateReport::from(dto), Utc::now())
            .await?;

        tracing::info!(
            "Report {} submitted by {} for {} ({}, {})",
            report.id,
            user.email,
            report.building,
            report.severity,
            report.affected_areas.join(", ")
        );

        self.notifications
            .show(NewToast::success(SUBMITTED_TITLE, SUBMITTED_MESSAGE))
            .await;

        Ok(report)
    }

    /// Filtered list plus the size of the full set
    pub async fn list(&self, query: &ReportQuery) -> Result<(Vec<Report>, usize)> {
        let all = self.repository.list().await?;
        let total = all.len();
        Ok((filter_reports(&all, query), total))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Report> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Load a report for display and raise its status toast
    pub async fn open(&self, id: &str) -> Result<Report> {
        let report = self.get_by_id(id).await?;
        let status = report.status();

        let kind = match status {
            ReportStatus::Resolved => ToastType::Success,
            _ => ToastType::Info,
        };
        let toast = NewToast::new(
            kind,
            format!("Report Status: {}", status.label()),
            status_message(status),
        )
        .with_duration(self.status_toast_duration.as_millis() as u64);
        self.notifications.show(toast).await;

        Ok(report)
    }

    /// Distinct buildings across all reports, for the filter drop-down
    pub async fn buildings(&self) -> Result<Vec<String>> {
        let all = self.repository.list().await?;
        Ok(distinct_buildings(&all))
    }

    /// Open reports resembling a draft, advisory only
    pub async fn find_similar(&self, dto: &SimilarReportsRequestDto) -> Result<Vec<Report>> {
        let all = self.repository.list().await?;
        Ok(find_similar(&all, &dto.building, &dto.affected_areas))
    }

    /// Post a status change on a report's timeline
    pub async fn update_status(
        &self,
        id: &str,
        dto: UpdateReportStatusDto,
        user: &AuthenticatedUser,
    ) -> Result<Report> {
        dto.validate().map_err(FieldErrors::from)?;

        let report = self
            .repository
            .update_status(id, dto.status, dto.message.trim(), Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        tracing::info!(
            "Report {} moved to {} by {} ({})",
            report.id,
            report.status(),
            user.email,
            user.role
        );

        Ok(report)
    }

    /// Message the IT team about a report
    pub async fn contact_support(
        &self,
        id: &str,
        dto: ContactSupportDto,
        user: &AuthenticatedUser,
    ) -> Result<()> {
        dto.validate().map_err(FieldErrors::from)?;
        let report = self.get_by_id(id).await?;
        tracing::info!(
            "Support message from {} about report {}: {}",
            user.email,
            report.id,
            dto.message.trim()
        );

        self.notifications
            .show(NewToast::success(
                "Message Sent",
                "Your message has been sent to IT support. We'll get back to you soon.",
            ))
            .await;
        Ok(())
    }

    /// Quick reports are logged, not stored
    pub fn quick_report(&self, dto: QuickReportDto) -> Result<QuickReportAckDto> {
        dto.validate().map_err(FieldErrors::from)?;

        let location = dto.location.trim().to_string();
        tracing::info!("Quick report: {} at {}", dto.issue.label(), location);

        Ok(QuickReportAckDto {
            issue: dto.issue,
            location,
            received_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::UserRole;
    use crate::features::reports::dtos::{FilterValue, QuickIssue};
    use crate::features::reports::models::ReportSeverity;
    use crate::features::reports::repositories::{mock_reports, InMemoryReportRepository};
    use crate::shared::validation::ValidationKind;

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            id: "user-1".to_string(),
            name: "Ada".to_string(),
            email: "ada@campus.edu".to_string(),
            role,
        }
    }

    fn service() -> (ReportService, Arc<NotificationService>) {
        let notifications = Arc::new(NotificationService::new(&NotificationConfig::default()));
        let repository = Arc::new(InMemoryReportRepository::new(mock_reports(Utc::now())));
        let reports = ReportsConfig {
            seed_mock_reports: true,
            submission_delay: Duration::from_millis(500),
        };
        let service = ReportService::new(
            repository,
            Arc::clone(&notifications),
            &reports,
            &NotificationConfig::default(),
        );
        (service, notifications)
    }

    fn valid_dto() -> CreateReportDto {
        CreateReportDto {
            location: "Room 12".to_string(),
            building: "Dormitory A".to_string(),
            severity: None,
            description: "No connection since this morning".to_string(),
            affected_areas: vec!["WiFi Network".to_string()],
            contact_email: "ada@campus.edu".to_string(),
            contact_phone: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_appends_pending_report_and_toasts() {
        let (service, notifications) = service();
        let report = service
            .submit(&user(UserRole::Student), valid_dto())
            .await
            .unwrap();

        assert_eq!(report.id, "6");
        assert_eq!(report.status(), ReportStatus::Pending);
        assert_eq!(report.severity, ReportSeverity::Medium);
        assert_eq!(report.updates().len(), 1);

        let (all, total) = service.list(&ReportQuery::default()).await.unwrap();
        assert_eq!(total, 6);
        assert_eq!(all[0].id, "6");

        let toasts = notifications.list().await;
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastType::Success);
        assert_eq!(toasts[0].title, SUBMITTED_TITLE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_submission_is_not_stored() {
        let (service, notifications) = service();
        let mut dto = valid_dto();
        dto.description = "too short".to_string();
        dto.contact_email = "ada@campus".to_string();

        let AppError::FieldValidation(errors) = service
            .submit(&user(UserRole::Student), dto)
            .await
            .unwrap_err()
        else {
            panic!("expected field validation error");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.kind_of("description"), Some(ValidationKind::TooShort));
        assert_eq!(
            errors.kind_of("contactEmail"),
            Some(ValidationKind::InvalidFormat)
        );

        let (_, total) = service.list(&ReportQuery::default()).await.unwrap();
        assert_eq!(total, 5);
        assert!(notifications.list().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submission_in_flight_conflicts() {
        let (service, _) = service();
        let student = user(UserRole::Student);

        let (first, second) = tokio::join!(
            service.submit(&student, valid_dto()),
            service.submit(&student, valid_dto())
        );
        assert!(first.is_ok());
        assert!(matches!(second, Err(AppError::Conflict(_))));

        // The slot is released once the first submission completes
        assert!(service.submit(&student, valid_dto()).await.is_ok());
        let (_, total) = service.list(&ReportQuery::default()).await.unwrap();
        assert_eq!(total, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_raises_status_toast() {
        let (service, notifications) = service();

        service.open("1").await.unwrap();
        service.open("3").await.unwrap();

        let toasts = notifications.list().await;
        assert_eq!(toasts[0].kind, ToastType::Success);
        assert_eq!(toasts[0].title, "Report Status: Resolved");
        assert_eq!(toasts[0].message, "Your issue has been resolved");
        assert_eq!(toasts[0].duration, 6000);
        assert_eq!(toasts[1].kind, ToastType::Info);
        assert_eq!(toasts[1].title, "Report Status: Pending");

        assert!(matches!(
            service.open("42").await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(notifications.list().await.len(), 2);
    }

    #[tokio::test]
    async fn test_list_reports_total_of_full_set() {
        let (service, _) = service();
        let query = ReportQuery {
            status: FilterValue::Only(ReportStatus::Pending),
            ..Default::default()
        };
        let (reports, total) = service.list(&query).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn test_update_status_maintains_resolved_at() {
        let (service, _) = service();
        let staff = user(UserRole::Staff);

        let report = service
            .update_status(
                "3",
                UpdateReportStatusDto {
                    status: ReportStatus::Resolved,
                    message: "VPN concentrator restarted".to_string(),
                },
                &staff,
            )
            .await
            .unwrap();
        assert!(report.resolved_at().is_some());

        let report = service
            .update_status(
                "3",
                UpdateReportStatusDto {
                    status: ReportStatus::InProgress,
                    message: "Slowness is back".to_string(),
                },
                &staff,
            )
            .await
            .unwrap();
        assert!(report.resolved_at().is_none());
        assert_eq!(report.updates().len(), 3);

        let err = service
            .update_status(
                "3",
                UpdateReportStatusDto {
                    status: ReportStatus::Resolved,
                    message: "  ".to_string(),
                },
                &staff,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::FieldValidation(_)));
    }

    #[tokio::test]
    async fn test_similar_and_buildings() {
        let (service, _) = service();
        let similar = service
            .find_similar(&SimilarReportsRequestDto {
                building: "Administration Building".to_string(),
                affected_areas: vec!["Video Conferencing".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].id, "5");

        assert_eq!(service.buildings().await.unwrap().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_contact_support() {
        let (service, notifications) = service();
        let student = user(UserRole::Student);

        service
            .contact_support(
                "2",
                ContactSupportDto {
                    message: "Still dropping every few minutes".to_string(),
                },
                &student,
            )
            .await
            .unwrap();
        assert_eq!(notifications.list().await[0].title, "Message Sent");

        let err = service
            .contact_support(
                "2",
                ContactSupportDto {
                    message: String::new(),
                },
                &student,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::FieldValidation(_)));
    }

    #[tokio::test]
    async fn test_quick_report() {
        let (service, _) = service();
        let ack = service
            .quick_report(QuickReportDto {
                issue: QuickIssue::Down,
                location: " Library 2F ".to_string(),
            })
            .unwrap();
        assert_eq!(ack.location, "Library 2F");

        let err = service
            .quick_report(QuickReportDto {
                issue: QuickIssue::Slow,
                location: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::FieldValidation(_)));
        let (_, total) = service.list(&ReportQuery::default()).await.unwrap();
        assert_eq!(total, 5);
    }
}
