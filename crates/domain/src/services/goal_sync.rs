//! Goal synchronization and daily reset logic.
//!
//! `current_value` is always overwritten from the latest usage data,
//! never incremented independently, so syncing twice with the same
//! input is idempotent.

use chrono::Utc;

use crate::models::goal::{Goal, GoalKind, Streak};

/// Multiplier over the target at which the "exceeded" event fires.
const EXCEED_FACTOR: f64 = 1.2;

/// Usage fields a sync draws from, one value per goal kind.
#[derive(Debug, Clone, Default)]
pub struct GoalSyncInput {
    /// Total screen time today, in minutes
    pub total_screen_minutes: i64,
    /// Per-app screen time today, in minutes, keyed by package name
    pub per_app_minutes: std::collections::HashMap<String, i64>,
    /// Breaks taken today
    pub breaks_taken: i64,
    /// Productive (study-session) minutes today
    pub productive_minutes: i64,
}

/// Event emitted by a sync pass for the notification layer.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalEvent {
    /// The goal's target was crossed upward this sync
    Completed { goal_id: String, target: i64 },
    /// 1.2x the target was crossed upward this sync
    Exceeded { goal_id: String, value: i64 },
}

fn input_value_for(kind: &GoalKind, input: &GoalSyncInput) -> i64 {
    match kind {
        GoalKind::ScreenTime => input.total_screen_minutes,
        GoalKind::AppUsage { app_id } => input.per_app_minutes.get(app_id).copied().unwrap_or(0),
        GoalKind::BreakTime => input.breaks_taken,
        GoalKind::ProductiveTime => input.productive_minutes,
    }
}

/// Recomputes every active goal's progress from `input`.
///
/// Emits a `Completed` event when the old value was below the target
/// and the new value reaches it, and an `Exceeded` event when 1.2x the
/// target is crossed the same way. Both can fire in a single step.
/// There is no latch beyond the old-vs-new comparison: if a corrected
/// read drops the value below a threshold and a later read crosses it
/// again, the event repeats.
pub fn sync_goals(goals: &mut [Goal], input: &GoalSyncInput) -> Vec<GoalEvent> {
    let mut events = Vec::new();
    let now = Utc::now();

    for goal in goals.iter_mut().filter(|g| g.is_active) {
        let old = goal.current_value;
        let new = input_value_for(&goal.kind, input).max(0);
        if old == new {
            continue;
        }

        goal.current_value = new;
        goal.updated_at = now;

        if goal.notify_on_complete && old < goal.target_value && new >= goal.target_value {
            events.push(GoalEvent::Completed {
                goal_id: goal.id.clone(),
                target: goal.target_value,
            });
        }

        let exceed_at = (goal.target_value as f64 * EXCEED_FACTOR).ceil() as i64;
        if goal.notify_on_exceed && old < exceed_at && new >= exceed_at {
            events.push(GoalEvent::Exceeded {
                goal_id: goal.id.clone(),
                value: new,
            });
        }
    }

    events
}

/// Applies the midnight reset.
///
/// The streak increments when every active goal had reached its target
/// at reset time, and drops to zero otherwise. All progress is then
/// zeroed for the new day. Inactive goals neither gate the streak nor
/// keep their progress.
pub fn reset_daily(goals: &mut [Goal], streak: &Streak) -> Streak {
    let now = Utc::now();
    let all_met = goals
        .iter()
        .filter(|g| g.is_active)
        .all(|g| g.current_value >= g.target_value);
    let has_active = goals.iter().any(|g| g.is_active);

    let days = if has_active && all_met { streak.days + 1 } else { 0 };

    for goal in goals.iter_mut() {
        goal.current_value = 0;
        goal.updated_at = now;
    }

    Streak {
        days,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn goal(id: &str, kind: GoalKind, target: i64, current: i64) -> Goal {
        let mut g = Goal::new(kind, target);
        g.id = id.to_string();
        g.current_value = current;
        g
    }

    fn input(total: i64) -> GoalSyncInput {
        GoalSyncInput {
            total_screen_minutes: total,
            ..Default::default()
        }
    }

    #[test]
    fn test_sync_overwrites_current_value() {
        let mut goals = vec![goal("g", GoalKind::ScreenTime, 180, 42)];
        sync_goals(&mut goals, &input(150));
        assert_eq!(goals[0].current_value, 150);
    }

    #[test]
    fn test_sync_is_idempotent() {
        let mut goals = vec![goal("g", GoalKind::ScreenTime, 180, 0)];
        sync_goals(&mut goals, &input(150));
        let first = goals[0].current_value;
        let events = sync_goals(&mut goals, &input(150));
        assert_eq!(goals[0].current_value, first);
        assert!(events.is_empty());
    }

    #[test]
    fn test_complete_fires_without_exceed() {
        // {target: 180, current: 150} -> 200 crosses 180 but not 216
        let mut goals = vec![goal("g", GoalKind::ScreenTime, 180, 150)];
        let events = sync_goals(&mut goals, &input(200));
        assert_eq!(
            events,
            vec![GoalEvent::Completed {
                goal_id: "g".to_string(),
                target: 180
            }]
        );
    }

    #[test]
    fn test_complete_and_exceed_fire_in_one_step() {
        // {target: 180, current: 170} -> 230 crosses both 180 and 216
        let mut goals = vec![goal("g", GoalKind::ScreenTime, 180, 170)];
        let events = sync_goals(&mut goals, &input(230));
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GoalEvent::Completed { .. }));
        assert!(matches!(events[1], GoalEvent::Exceeded { value: 230, .. }));
    }

    #[test]
    fn test_no_event_when_already_past_target() {
        let mut goals = vec![goal("g", GoalKind::ScreenTime, 180, 190)];
        let events = sync_goals(&mut goals, &input(200));
        assert!(events.is_empty());
    }

    #[test]
    fn test_notify_flags_suppress_events() {
        let mut g = goal("g", GoalKind::ScreenTime, 180, 150);
        g.notify_on_complete = false;
        let mut goals = vec![g];
        let events = sync_goals(&mut goals, &input(200));
        assert!(events.is_empty());
        // Progress still updates even when notifications are off
        assert_eq!(goals[0].current_value, 200);
    }

    #[test]
    fn test_inactive_goals_are_skipped() {
        let mut g = goal("g", GoalKind::ScreenTime, 180, 10);
        g.is_active = false;
        let mut goals = vec![g];
        let events = sync_goals(&mut goals, &input(500));
        assert!(events.is_empty());
        assert_eq!(goals[0].current_value, 10);
    }

    #[test]
    fn test_app_usage_reads_per_app_map() {
        let mut per_app = HashMap::new();
        per_app.insert("com.example.social".to_string(), 45);
        let input = GoalSyncInput {
            per_app_minutes: per_app,
            ..Default::default()
        };

        let mut goals = vec![
            goal(
                "social",
                GoalKind::AppUsage {
                    app_id: "com.example.social".to_string(),
                },
                60,
                0,
            ),
            goal(
                "other",
                GoalKind::AppUsage {
                    app_id: "com.example.missing".to_string(),
                },
                60,
                30,
            ),
        ];
        sync_goals(&mut goals, &input);
        assert_eq!(goals[0].current_value, 45);
        // Missing app falls back to 0
        assert_eq!(goals[1].current_value, 0);
    }

    #[test]
    fn test_break_and_productive_kinds() {
        let input = GoalSyncInput {
            breaks_taken: 3,
            productive_minutes: 90,
            ..Default::default()
        };
        let mut goals = vec![
            goal("b", GoalKind::BreakTime, 5, 0),
            goal("p", GoalKind::ProductiveTime, 120, 0),
        ];
        sync_goals(&mut goals, &input);
        assert_eq!(goals[0].current_value, 3);
        assert_eq!(goals[1].current_value, 90);
    }

    #[test]
    fn test_reset_increments_streak_when_all_active_met() {
        let mut goals = vec![
            goal("a", GoalKind::ScreenTime, 180, 180),
            goal("b", GoalKind::BreakTime, 5, 7),
        ];
        let streak = Streak {
            days: 2,
            updated_at: Utc::now(),
        };
        let next = reset_daily(&mut goals, &streak);
        assert_eq!(next.days, 3);
        assert!(goals.iter().all(|g| g.current_value == 0));
    }

    #[test]
    fn test_reset_breaks_streak_when_any_active_unmet() {
        let mut goals = vec![
            goal("a", GoalKind::ScreenTime, 180, 180),
            goal("b", GoalKind::BreakTime, 5, 2),
        ];
        let streak = Streak {
            days: 9,
            updated_at: Utc::now(),
        };
        let next = reset_daily(&mut goals, &streak);
        assert_eq!(next.days, 0);
    }

    #[test]
    fn test_reset_ignores_inactive_goals_for_streak() {
        let mut unmet = goal("b", GoalKind::BreakTime, 5, 0);
        unmet.is_active = false;
        let mut goals = vec![goal("a", GoalKind::ScreenTime, 180, 200), unmet];
        let streak = Streak::default();
        let next = reset_daily(&mut goals, &streak);
        assert_eq!(next.days, 1);
        // Inactive goals still lose their progress
        assert_eq!(goals[1].current_value, 0);
    }

    #[test]
    fn test_refire_after_drop_is_preserved_behavior() {
        // A corrected read below target followed by a new crossing
        // notifies again; the crossing check keeps no latch.
        let mut goals = vec![goal("g", GoalKind::ScreenTime, 180, 0)];
        assert_eq!(sync_goals(&mut goals, &input(185)).len(), 1);
        assert!(sync_goals(&mut goals, &input(100)).is_empty());
        assert_eq!(sync_goals(&mut goals, &input(185)).len(), 1);
    }
}
