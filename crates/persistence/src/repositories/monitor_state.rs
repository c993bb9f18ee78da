//! Watchtime monitor state repository.
//!
//! Persists the last known status bucket and the last notification
//! time so a restarted monitor resumes its transition detection
//! instead of re-notifying immediately.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use domain::models::status::WatchtimeStatus;

use crate::store::{KeyValueStore, StorageError};

const MONITOR_KEY: &str = "monitor:watchtime";

/// Snapshot of the monitor's transition-detection state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorState {
    /// Last recorded status bucket, if any poll has recorded one today
    pub last_status: Option<WatchtimeStatus>,
    /// When the monitor last fired a notification
    pub last_notified_at: Option<DateTime<Utc>>,
}

/// Repository for the watchtime monitor state.
#[derive(Clone)]
pub struct MonitorStateRepository {
    store: Arc<dyn KeyValueStore>,
}

impl MonitorStateRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the persisted state, empty when absent or unreadable.
    pub async fn load(&self) -> MonitorState {
        match self.store.get(MONITOR_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Stored monitor state unreadable, starting fresh");
                MonitorState::default()
            }),
            Ok(None) => MonitorState::default(),
            Err(e) => {
                warn!(error = %e, "Monitor state read failed");
                MonitorState::default()
            }
        }
    }

    pub async fn save(&self, state: &MonitorState) -> Result<(), StorageError> {
        let raw = serde_json::to_string(state)?;
        self.store.set(MONITOR_KEY, &raw).await
    }

    /// Clears the state at the midnight reset.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(MONITOR_KEY).await
    }
}
