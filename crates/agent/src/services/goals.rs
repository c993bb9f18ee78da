//! Daily goals service.
//!
//! Orchestrates the goal repository, the pure sync logic, and the
//! notification sink. Within one sync pass the sequence is fixed:
//! progress is recomputed and persisted first, then notification
//! decisions are made from the emitted events.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use validator::Validate;

use domain::models::goal::{CreateGoalRequest, Goal, GoalKind, Streak, UpdateGoalRequest};
use domain::services::{
    reset_daily, sync_goals, GoalEvent, GoalSyncInput, LocalNotification, NotificationSink,
};
use persistence::repositories::{GoalRepository, StreakRepository};
use shared::time::format_duration_ms;

/// Error type for goal operations.
#[derive(Debug, thiserror::Error)]
pub enum GoalError {
    #[error("Goal not found: {0}")]
    NotFound(String),

    #[error("Invalid goal: {0}")]
    Invalid(String),
}

/// Service owning the daily goal list.
///
/// Holds the working copy behind a mutex so concurrent syncs cannot
/// interleave their read-modify-write against the store.
pub struct GoalService {
    goals: GoalRepository,
    streaks: StreakRepository,
    sink: Arc<dyn NotificationSink>,
    /// Break counter for the current day; feeds the break_time kind
    state: Mutex<DayState>,
}

#[derive(Debug, Default)]
struct DayState {
    breaks_taken: i64,
    productive_minutes: i64,
    last_input: GoalSyncInput,
}

impl GoalService {
    pub fn new(
        goals: GoalRepository,
        streaks: StreakRepository,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            goals,
            streaks,
            sink,
            state: Mutex::new(DayState::default()),
        }
    }

    /// Returns the goal list, seeding defaults on first run.
    pub async fn get_goals(&self) -> Vec<Goal> {
        self.goals.load_or_seed().await
    }

    /// Adds a goal from a validated request.
    pub async fn add_goal(&self, request: CreateGoalRequest) -> Result<Goal, GoalError> {
        request
            .validate()
            .map_err(|e| GoalError::Invalid(e.to_string()))?;

        let mut goals = self.goals.load_or_seed().await;
        let mut goal = Goal::new(request.kind, request.target_value);
        goal.notify_on_complete = request.notify_on_complete;
        goal.notify_on_exceed = request.notify_on_exceed;
        goals.push(goal.clone());
        self.persist(&goals).await;
        info!(goal_id = %goal.id, kind = %goal.kind, "Goal added");
        Ok(goal)
    }

    /// Applies a partial update; always refreshes `updated_at`.
    pub async fn update_goal(
        &self,
        goal_id: &str,
        request: UpdateGoalRequest,
    ) -> Result<Goal, GoalError> {
        request
            .validate()
            .map_err(|e| GoalError::Invalid(e.to_string()))?;

        let mut goals = self.goals.load_or_seed().await;
        let goal = goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| GoalError::NotFound(goal_id.to_string()))?;

        if let Some(target) = request.target_value {
            goal.target_value = target;
        }
        if let Some(active) = request.is_active {
            goal.is_active = active;
        }
        if let Some(notify) = request.notify_on_complete {
            goal.notify_on_complete = notify;
        }
        if let Some(notify) = request.notify_on_exceed {
            goal.notify_on_exceed = notify;
        }
        goal.updated_at = Utc::now();
        let updated = goal.clone();

        self.persist(&goals).await;
        Ok(updated)
    }

    /// Removes a goal.
    pub async fn delete_goal(&self, goal_id: &str) -> Result<(), GoalError> {
        let mut goals = self.goals.load_or_seed().await;
        let before = goals.len();
        goals.retain(|g| g.id != goal_id);
        if goals.len() == before {
            return Err(GoalError::NotFound(goal_id.to_string()));
        }
        self.persist(&goals).await;
        info!(goal_id, "Goal deleted");
        Ok(())
    }

    /// Flips a goal's active flag.
    pub async fn toggle_goal(&self, goal_id: &str) -> Result<Goal, GoalError> {
        let mut goals = self.goals.load_or_seed().await;
        let goal = goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| GoalError::NotFound(goal_id.to_string()))?;
        goal.is_active = !goal.is_active;
        goal.updated_at = Utc::now();
        let updated = goal.clone();
        self.persist(&goals).await;
        Ok(updated)
    }

    /// Recomputes progress from fresh usage numbers and dispatches any
    /// crossing notifications.
    pub async fn sync_with_usage(
        &self,
        total_screen_minutes: i64,
        per_app_minutes: std::collections::HashMap<String, i64>,
    ) {
        let input = {
            let mut state = self.state.lock().await;
            let input = GoalSyncInput {
                total_screen_minutes,
                per_app_minutes,
                breaks_taken: state.breaks_taken,
                productive_minutes: state.productive_minutes,
            };
            state.last_input = input.clone();
            input
        };
        self.sync_and_notify(&input).await;
    }

    /// Records one break and re-syncs with the last known usage.
    pub async fn record_break(&self) {
        let input = {
            let mut state = self.state.lock().await;
            state.breaks_taken += 1;
            state.last_input.breaks_taken = state.breaks_taken;
            state.last_input.clone()
        };
        debug!(breaks = input.breaks_taken, "Break recorded");
        self.sync_and_notify(&input).await;
    }

    /// Records completed productive minutes and re-syncs.
    pub async fn record_productive_minutes(&self, minutes: i64) {
        let input = {
            let mut state = self.state.lock().await;
            state.productive_minutes += minutes.max(0);
            state.last_input.productive_minutes = state.productive_minutes;
            state.last_input.clone()
        };
        self.sync_and_notify(&input).await;
    }

    /// Midnight reset: settles the streak, zeroes progress and the
    /// day counters.
    pub async fn reset_daily(&self) {
        let mut goals = self.goals.load_or_seed().await;
        let streak = self.streaks.load().await;
        let next = reset_daily(&mut goals, &streak);

        if next.days > streak.days {
            info!(days = next.days, "Streak extended");
        } else if streak.days > 0 {
            info!(lost = streak.days, "Streak reset");
        }

        self.persist(&goals).await;
        if let Err(e) = self.streaks.save(&next).await {
            warn!(error = %e, "Failed to persist streak");
        }

        let mut state = self.state.lock().await;
        *state = DayState::default();
    }

    /// Current streak in days.
    pub async fn streak(&self) -> Streak {
        self.streaks.load().await
    }

    async fn sync_and_notify(&self, input: &GoalSyncInput) {
        let mut goals = self.goals.load_or_seed().await;
        let events = sync_goals(&mut goals, input);
        self.persist(&goals).await;

        for event in events {
            let notification = Self::notification_for(&goals, &event);
            let result = self.sink.send(notification).await;
            debug!(?event, ?result, "Goal notification dispatched");
        }
    }

    fn notification_for(goals: &[Goal], event: &GoalEvent) -> LocalNotification {
        match event {
            GoalEvent::Completed { goal_id, target } => {
                let label = Self::goal_label(goals, goal_id);
                LocalNotification::new(
                    "Goal achieved",
                    format!(
                        "{} reached its target of {}.",
                        label,
                        Self::amount(goals, goal_id, *target)
                    ),
                )
                .with_data("goalId", goal_id)
            }
            GoalEvent::Exceeded { goal_id, value } => {
                let label = Self::goal_label(goals, goal_id);
                LocalNotification::new(
                    "Limit exceeded",
                    format!(
                        "{} is now at {}, well past your limit.",
                        label,
                        Self::amount(goals, goal_id, *value)
                    ),
                )
                .high_priority()
                .with_data("goalId", goal_id)
            }
        }
    }

    /// Break goals count events; every other kind measures minutes.
    fn amount(goals: &[Goal], goal_id: &str, value: i64) -> String {
        let is_count = goals
            .iter()
            .find(|g| g.id == goal_id)
            .map(|g| matches!(g.kind, GoalKind::BreakTime))
            .unwrap_or(false);
        if is_count {
            format!("{} breaks", value)
        } else {
            format_duration_ms(value * 60_000)
        }
    }

    fn goal_label(goals: &[Goal], goal_id: &str) -> String {
        goals
            .iter()
            .find(|g| g.id == goal_id)
            .map(|g| g.kind.to_string().replace('_', " "))
            .unwrap_or_else(|| goal_id.to_string())
    }

    async fn persist(&self, goals: &[Goal]) {
        if let Err(e) = self.goals.save(goals).await {
            warn!(error = %e, "Failed to persist goals");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::goal::GoalKind;
    use domain::services::MockNotificationSink;
    use persistence::MemoryStore;
    use std::collections::HashMap;

    fn service_with_sink() -> (GoalService, Arc<MockNotificationSink>) {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(MockNotificationSink::new());
        let service = GoalService::new(
            GoalRepository::new(store.clone()),
            StreakRepository::new(store),
            sink.clone(),
        );
        (service, sink)
    }

    #[tokio::test]
    async fn test_get_goals_seeds_once() {
        let (service, _) = service_with_sink();
        assert_eq!(service.get_goals().await.len(), 4);

        let all = service.get_goals().await;
        for goal in &all {
            service.delete_goal(&goal.id).await.unwrap();
        }
        // Deleting everything must not trigger a re-seed
        assert!(service.get_goals().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_goal_rejects_invalid_target() {
        let (service, _) = service_with_sink();
        let request = CreateGoalRequest {
            kind: GoalKind::ScreenTime,
            target_value: 0,
            notify_on_complete: true,
            notify_on_exceed: true,
        };
        assert!(matches!(
            service.add_goal(request).await,
            Err(GoalError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at() {
        let (service, _) = service_with_sink();
        let before = service.get_goals().await[0].clone();

        let updated = service
            .update_goal(
                &before.id,
                UpdateGoalRequest {
                    target_value: Some(240),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.target_value, 240);
        assert!(updated.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_goal() {
        let (service, _) = service_with_sink();
        assert!(matches!(
            service
                .update_goal("nope", UpdateGoalRequest::default())
                .await,
            Err(GoalError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_flips_active() {
        let (service, _) = service_with_sink();
        let id = service.get_goals().await[0].id.clone();
        let toggled = service.toggle_goal(&id).await.unwrap();
        assert!(!toggled.is_active);
        let again = service.toggle_goal(&id).await.unwrap();
        assert!(again.is_active);
    }

    #[tokio::test]
    async fn test_sync_dispatches_completion_notification() {
        let (service, sink) = service_with_sink();
        service.get_goals().await;

        // screen_time_limit target is 180
        service.sync_with_usage(200, HashMap::new()).await;

        let sent = sink.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Goal achieved");
        assert_eq!(
            sent[0].data.as_ref().unwrap().get("goalId").unwrap(),
            "screen_time_limit"
        );
    }

    #[tokio::test]
    async fn test_sync_dispatches_both_crossings_in_one_step() {
        let (service, sink) = service_with_sink();
        service.get_goals().await;

        // 230 crosses 180 and 216 at once
        service.sync_with_usage(230, HashMap::new()).await;

        let titles: Vec<String> = sink.sent().await.into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Goal achieved", "Limit exceeded"]);
    }

    #[tokio::test]
    async fn test_record_break_increments_and_notifies_on_target() {
        let (service, sink) = service_with_sink();
        service.get_goals().await;

        // break_reminder target is 5
        for _ in 0..5 {
            service.record_break().await;
        }

        let goals = service.get_goals().await;
        let breaks = goals.iter().find(|g| g.id == "break_reminder").unwrap();
        assert_eq!(breaks.current_value, 5);

        let sent = sink.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Goal achieved");
    }

    #[tokio::test]
    async fn test_reset_daily_updates_streak_and_zeroes() {
        let (service, _) = service_with_sink();
        service.get_goals().await;

        // Meet every active seeded goal
        let mut per_app = HashMap::new();
        per_app.insert("com.instagram.android".to_string(), 60);
        for _ in 0..5 {
            service.record_break().await;
        }
        service.record_productive_minutes(120).await;
        service.sync_with_usage(180, per_app).await;

        service.reset_daily().await;

        assert_eq!(service.streak().await.days, 1);
        assert!(service
            .get_goals()
            .await
            .iter()
            .all(|g| g.current_value == 0));

        // An unmet day breaks the streak
        service.sync_with_usage(30, HashMap::new()).await;
        service.reset_daily().await;
        assert_eq!(service.streak().await.days, 0);
    }
}
