use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::core::config::NotificationConfig;
use crate::core::error::{AppError, Result};
use crate::features::notifications::models::{NewToast, Toast};

struct ActiveToast {
    toast: Toast,
    timer: AbortHandle,
}

/// Shared toast queue
///
/// Every toast gets its own expiry task. Dismissing a toast aborts that
/// task, so a toast is removed exactly once.
pub struct NotificationService {
    toasts: Arc<Mutex<Vec<ActiveToast>>>,
    default_duration: Duration,
}

impl NotificationService {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            toasts: Arc::new(Mutex::new(Vec::new())),
            default_duration: config.default_duration,
        }
    }

    /// Append a toast and schedule its dismissal
    pub async fn show(&self, new: NewToast) -> Toast {
        let duration = match new.duration {
            Some(ms) if ms > 0 => Duration::from_millis(ms),
            _ => self.default_duration,
        };

        let toast = Toast {
            id: Uuid::new_v4().simple().to_string(),
            kind: new.kind,
            title: new.title,
            message: new.message,
            duration: duration.as_millis() as u64,
            created_at: Utc::now(),
        };

        let mut toasts = self.toasts.lock().await;
        let timer = self.schedule_expiry(toast.id.clone(), duration);
        toasts.push(ActiveToast {
            toast: toast.clone(),
            timer,
        });

        tracing::debug!(
            "Toast {} shown for {}ms: {}",
            toast.id,
            toast.duration,
            toast.title
        );
        toast
    }

    fn schedule_expiry(&self, id: String, after: Duration) -> AbortHandle {
        let toasts = Arc::clone(&self.toasts);
        let deadline = Instant::now() + after;

        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let mut toasts = toasts.lock().await;
            if let Some(pos) = toasts.iter().position(|t| t.toast.id == id) {
                toasts.remove(pos);
                tracing::debug!("Toast {} expired", id);
            }
        })
        .abort_handle()
    }

    /// Remove a toast before its timer fires
    pub async fn dismiss(&self, id: &str) -> Result<Toast> {
        let mut toasts = self.toasts.lock().await;
        let pos = toasts
            .iter()
            .position(|t| t.toast.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Notification {} not found", id)))?;

        let entry = toasts.remove(pos);
        entry.timer.abort();
        Ok(entry.toast)
    }

    /// Active toasts, oldest first
    pub async fn list(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .await
            .iter()
            .map(|t| t.toast.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::models::ToastType;

    fn service() -> NotificationService {
        NotificationService::new(&NotificationConfig::default())
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_duration_expiry() {
        let service = service();
        let toast = service
            .show(NewToast::success("Saved", "All good").with_duration(0))
            .await;
        assert_eq!(toast.duration, 5000);

        tokio::time::advance(Duration::from_millis(4999)).await;
        settle().await;
        assert_eq!(service.list().await.len(), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
        assert!(service.list().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_duration() {
        let service = service();
        let toast = NewToast::info("Report Status: Pending", "Your report is pending review")
            .with_duration(6000);
        service.show(toast).await;

        tokio::time::advance(Duration::from_millis(5500)).await;
        settle().await;
        assert_eq!(service.list().await.len(), 1);

        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;
        assert!(service.list().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_insertion_order_and_dismiss() {
        let service = service();
        let first = service.show(NewToast::info("one", "first")).await;
        let second = service
            .show(NewToast::new(ToastType::Warning, "two", "second"))
            .await;
        assert_ne!(first.id, second.id);

        let titles: Vec<String> = service.list().await.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["one", "two"]);

        let removed = service.dismiss(&first.id).await.unwrap();
        assert_eq!(removed.id, first.id);
        assert!(matches!(
            service.dismiss(&first.id).await,
            Err(AppError::NotFound(_))
        ));

        // The aborted timer must not disturb the remaining toast
        tokio::time::advance(Duration::from_millis(4999)).await;
        settle().await;
        let remaining = service.list().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_unknown_id() {
        let service = service();
        assert!(matches!(
            service.dismiss("missing").await,
            Err(AppError::NotFound(_))
        ));
    }
}
