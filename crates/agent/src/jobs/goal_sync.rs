//! Goal sync job.
//!
//! Periodically feeds fresh usage numbers into the goal service, which
//! recomputes progress and dispatches crossing notifications.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use domain::models::usage::UsageQueryResult;
use shared::time::MINUTE_MS;

use crate::services::{GoalService, UsageDataSource, UsageStatsService};

use super::scheduler::{Job, JobFrequency};

pub struct GoalSyncJob<S> {
    usage: Arc<UsageStatsService<S>>,
    goals: Arc<GoalService>,
    interval_secs: u64,
}

impl<S: UsageDataSource> GoalSyncJob<S> {
    pub fn new(
        usage: Arc<UsageStatsService<S>>,
        goals: Arc<GoalService>,
        interval_secs: u64,
    ) -> Self {
        Self {
            usage,
            goals,
            interval_secs,
        }
    }

    async fn tick(&self) -> Result<(), String> {
        let daily = match self.usage.daily_usage(None).await {
            UsageQueryResult::Data(daily) => daily,
            // Unknown usage must not look like zero progress
            UsageQueryResult::NoPermission | UsageQueryResult::NoData => {
                debug!("Goal sync skipped, usage unknown");
                return Ok(());
            }
            UsageQueryResult::Error { message } => {
                return Err(format!("Usage query failed: {}", message));
            }
        };

        let total_minutes = daily.total_time_ms / MINUTE_MS;
        let per_app_minutes: HashMap<String, i64> = daily
            .top_apps
            .iter()
            .map(|app| (app.package_name.clone(), app.foreground_time_ms / MINUTE_MS))
            .collect();

        self.goals
            .sync_with_usage(total_minutes, per_app_minutes)
            .await;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S: UsageDataSource + 'static> Job for GoalSyncJob<S> {
    fn name(&self) -> &'static str {
        "goal_sync"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.interval_secs)
    }

    async fn execute(&self) -> Result<(), String> {
        self.tick().await
    }
}
