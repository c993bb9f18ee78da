//! Watchtime monitor job.
//!
//! Polls today's screen time, buckets it against the configured goal,
//! and notifies on bucket transitions. An unchanged bucket re-notifies
//! only after the cooldown window.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use domain::models::status::WatchtimeStatus;
use domain::services::{LocalNotification, NotificationSink};
use persistence::repositories::{MonitorState, MonitorStateRepository};
use shared::time::{format_duration_ms, percentage_of, MINUTE_MS};

use crate::config::MonitorConfig;
use crate::services::{UsageDataSource, UsageStatsService};

use super::scheduler::{Job, JobFrequency};

/// Polling monitor over today's total screen time.
pub struct WatchtimeMonitorJob<S> {
    usage: Arc<UsageStatsService<S>>,
    state: MonitorStateRepository,
    sink: Arc<dyn NotificationSink>,
    config: MonitorConfig,
}

impl<S: UsageDataSource> WatchtimeMonitorJob<S> {
    pub fn new(
        usage: Arc<UsageStatsService<S>>,
        state: MonitorStateRepository,
        sink: Arc<dyn NotificationSink>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            usage,
            state,
            sink,
            config,
        }
    }

    /// One poll pass. Split from `execute` so tests can drive it
    /// without the scheduler.
    async fn tick(&self) -> Result<(), String> {
        let minutes = match self.usage.today_minutes().await {
            Some(minutes) => minutes,
            // No permission or no data: usage is unknown, not zero
            None => {
                debug!("Watchtime poll skipped, usage unknown");
                return Ok(());
            }
        };

        // Near-zero usage would make every first poll of the day look
        // like a transition; below the floor the stored status is left
        // untouched.
        if minutes < self.config.min_usage_minutes {
            debug!(minutes, "Watchtime poll below minimum usage");
            return Ok(());
        }

        let percentage = percentage_of(minutes, self.config.goal_minutes);
        let status = WatchtimeStatus::for_percentage(percentage);

        let state = self.state.load().await;
        let changed = state.last_status != Some(status);
        let cooldown = chrono::Duration::minutes(self.config.notification_cooldown_minutes);
        let now = Utc::now();
        let cooled_down = state
            .last_notified_at
            .map(|at| now - at > cooldown)
            .unwrap_or(true);

        if !changed && !cooled_down {
            debug!(%status, "Watchtime unchanged within cooldown");
            return Ok(());
        }

        let result = self.sink.send(self.notification(status, minutes)).await;
        debug!(%status, percentage, ?result, "Watchtime notification dispatched");

        self.state
            .save(&MonitorState {
                last_status: Some(status),
                last_notified_at: Some(now),
            })
            .await
            .map_err(|e| format!("Failed to persist monitor state: {}", e))
    }

    fn notification(&self, status: WatchtimeStatus, minutes: i64) -> LocalNotification {
        let used = format_duration_ms(minutes * MINUTE_MS);
        let goal = format_duration_ms(self.config.goal_minutes * MINUTE_MS);
        let (title, body) = match status {
            WatchtimeStatus::Excellent => (
                "Great pacing",
                format!("Only {} of your {} goal used so far.", used, goal),
            ),
            WatchtimeStatus::Good => (
                "On track",
                format!("{} of your {} goal used.", used, goal),
            ),
            WatchtimeStatus::Moderate => (
                "Approaching your limit",
                format!("{} used, your goal is {}.", used, goal),
            ),
            WatchtimeStatus::High => (
                "Over your limit",
                format!("{} used, past your goal of {}.", used, goal),
            ),
            WatchtimeStatus::Critical => (
                "Well over your limit",
                format!("{} used, far past your goal of {}.", used, goal),
            ),
        };

        let notification =
            LocalNotification::new(title, body).with_data("status", &status.to_string());
        if status >= WatchtimeStatus::High {
            notification.high_priority()
        } else {
            notification
        }
    }
}

#[async_trait::async_trait]
impl<S: UsageDataSource + 'static> Job for WatchtimeMonitorJob<S> {
    fn name(&self) -> &'static str {
        "watchtime_monitor"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.config.poll_interval_secs)
    }

    fn initial_delay(&self) -> Duration {
        // First poll soon after startup, then the regular cadence
        Duration::from_secs(5)
    }

    async fn execute(&self) -> Result<(), String> {
        self.tick().await
    }
}
