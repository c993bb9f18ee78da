//! Notification sink for the agent runtime.
//!
//! Rendering belongs to the platform shell; the agent side writes the
//! decided notification to a spool directory the shell watches, one
//! JSON file per notification, and logs it.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use domain::services::{LocalNotification, NotificationResult, NotificationSink};

pub struct SpoolNotificationSink {
    dir: PathBuf,
}

impl SpoolNotificationSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait::async_trait]
impl NotificationSink for SpoolNotificationSink {
    async fn send(&self, notification: LocalNotification) -> NotificationResult {
        info!(
            title = %notification.title,
            priority = ?notification.priority,
            "Dispatching notification"
        );

        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            return NotificationResult::Failed(e.to_string());
        }

        let name = format!("{}-{}.json", Utc::now().format("%Y%m%dT%H%M%S"), Uuid::new_v4());
        let payload = match serde_json::to_string_pretty(&notification) {
            Ok(payload) => payload,
            Err(e) => return NotificationResult::Failed(e.to_string()),
        };

        match tokio::fs::write(self.dir.join(name), payload).await {
            Ok(()) => NotificationResult::Sent,
            Err(e) => {
                warn!(error = %e, "Failed to spool notification");
                NotificationResult::Failed(e.to_string())
            }
        }
    }
}
