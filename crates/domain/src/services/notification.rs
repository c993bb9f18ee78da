//! Local notification dispatch abstraction.
//!
//! Core logic only decides whether and what to send; rendering and
//! delivery belong to the platform notification collaborator behind
//! the `NotificationSink` trait.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Delivery priority hint for the platform renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Normal,
    High,
}

/// A notification the core logic has decided to send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalNotification {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, String>>,
    pub priority: NotificationPriority,
}

impl LocalNotification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: None,
            priority: NotificationPriority::Normal,
        }
    }

    pub fn high_priority(mut self) -> Self {
        self.priority = NotificationPriority::High;
        self
    }

    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.data
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }
}

/// Result of a notification send attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationResult {
    /// Notification was handed to the platform successfully.
    Sent,
    /// Sending failed (non-blocking for the caller).
    Failed(String),
    /// Notification was skipped (e.g., notifications disabled).
    Skipped,
}

/// Sink trait for dispatching local notifications.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    /// Send a notification immediately. Must not panic; failures are
    /// reported through the result.
    async fn send(&self, notification: LocalNotification) -> NotificationResult;
}

/// Mock sink that records everything it is asked to send.
pub struct MockNotificationSink {
    sent: tokio::sync::Mutex<Vec<LocalNotification>>,
}

impl MockNotificationSink {
    pub fn new() -> Self {
        Self {
            sent: tokio::sync::Mutex::new(Vec::new()),
        }
    }

    /// Notifications recorded so far.
    pub async fn sent(&self) -> Vec<LocalNotification> {
        self.sent.lock().await.clone()
    }
}

impl Default for MockNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NotificationSink for MockNotificationSink {
    async fn send(&self, notification: LocalNotification) -> NotificationResult {
        self.sent.lock().await.push(notification);
        NotificationResult::Sent
    }
}
