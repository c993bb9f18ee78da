//! Midnight reset job.
//!
//! Fires once at the next local midnight, then every 24 hours. If the
//! process is down when midnight passes, that day's reset is simply
//! missed; there is no catch-up on restart.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tracing::warn;

use persistence::repositories::MonitorStateRepository;
use shared::time::until_next_local_midnight;

use crate::services::GoalService;

use super::scheduler::{Job, JobFrequency};

pub struct MidnightResetJob {
    goals: Arc<GoalService>,
    monitor_state: MonitorStateRepository,
}

impl MidnightResetJob {
    pub fn new(goals: Arc<GoalService>, monitor_state: MonitorStateRepository) -> Self {
        Self {
            goals,
            monitor_state,
        }
    }

    async fn tick(&self) -> Result<(), String> {
        self.goals.reset_daily().await;

        // A stale status bucket from yesterday must not suppress the
        // first transition of the new day
        if let Err(e) = self.monitor_state.clear().await {
            warn!(error = %e, "Failed to clear monitor state");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Job for MidnightResetJob {
    fn name(&self) -> &'static str {
        "midnight_reset"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Daily
    }

    fn initial_delay(&self) -> Duration {
        until_next_local_midnight(Local::now())
            .to_std()
            .unwrap_or_else(|_| JobFrequency::Daily.period())
    }

    async fn execute(&self) -> Result<(), String> {
        self.tick().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::services::MockNotificationSink;
    use persistence::repositories::{GoalRepository, MonitorState, StreakRepository};
    use persistence::MemoryStore;
    use std::collections::HashMap;

    fn job() -> (MidnightResetJob, Arc<GoalService>, MonitorStateRepository) {
        let store = Arc::new(MemoryStore::new());
        let goals = Arc::new(GoalService::new(
            GoalRepository::new(store.clone()),
            StreakRepository::new(store.clone()),
            Arc::new(MockNotificationSink::new()),
        ));
        let monitor_state = MonitorStateRepository::new(store);
        let job = MidnightResetJob::new(goals.clone(), monitor_state.clone());
        (job, goals, monitor_state)
    }

    #[tokio::test]
    async fn test_tick_zeroes_progress_and_clears_monitor_state() {
        let (job, goals, monitor_state) = job();
        goals.get_goals().await;
        goals.sync_with_usage(95, HashMap::new()).await;
        monitor_state
            .save(&MonitorState {
                last_status: Some(domain::models::status::WatchtimeStatus::Moderate),
                last_notified_at: Some(chrono::Utc::now()),
            })
            .await
            .unwrap();

        job.tick().await.unwrap();

        assert!(goals
            .get_goals()
            .await
            .iter()
            .all(|g| g.current_value == 0));
        assert!(monitor_state.load().await.last_status.is_none());
    }

    #[test]
    fn test_initial_delay_is_within_one_day() {
        let (job, _, _) = job();
        let delay = job.initial_delay();
        assert!(delay > Duration::ZERO);
        assert!(delay <= Duration::from_secs(86400 + 3600));
    }
}
