//! Daily goal domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// What a goal measures.
///
/// `AppUsage` is the only variant that carries an app identifier, so
/// the compiler enforces that an app id exists exactly when it is
/// meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoalKind {
    /// Limit on total daily screen time, in minutes
    ScreenTime,
    /// Limit on one app's daily foreground time, in minutes
    #[serde(rename_all = "camelCase")]
    AppUsage { app_id: String },
    /// Target number of breaks taken per day
    BreakTime,
    /// Target productive (study-session) minutes per day
    ProductiveTime,
}

impl std::fmt::Display for GoalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalKind::ScreenTime => write!(f, "screen_time"),
            GoalKind::AppUsage { .. } => write!(f, "app_usage"),
            GoalKind::BreakTime => write!(f, "break_time"),
            GoalKind::ProductiveTime => write!(f, "productive_time"),
        }
    }
}

/// A user-configured (or seeded) daily goal with live progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    #[serde(flatten)]
    pub kind: GoalKind,
    /// Target in minutes or count, depending on kind; always > 0
    pub target_value: i64,
    /// Progress for the current day; overwritten on every sync
    pub current_value: i64,
    pub is_active: bool,
    /// Notify when the target is first crossed upward
    pub notify_on_complete: bool,
    /// Notify when 1.2x the target is first crossed upward
    pub notify_on_exceed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Creates a goal with a random id and zeroed progress.
    pub fn new(kind: GoalKind, target_value: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            target_value,
            current_value: 0,
            is_active: true,
            notify_on_complete: true,
            notify_on_exceed: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn seeded(id: &str, kind: GoalKind, target_value: i64) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            kind,
            target_value,
            current_value: 0,
            is_active: true,
            notify_on_complete: true,
            notify_on_exceed: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the target has been reached.
    pub fn is_met(&self) -> bool {
        self.current_value >= self.target_value
    }
}

/// The four goals seeded on first run.
pub fn default_goals() -> Vec<Goal> {
    vec![
        Goal::seeded("screen_time_limit", GoalKind::ScreenTime, 180),
        Goal::seeded(
            "social_media_limit",
            GoalKind::AppUsage {
                app_id: "com.instagram.android".to_string(),
            },
            60,
        ),
        Goal::seeded("break_reminder", GoalKind::BreakTime, 5),
        Goal::seeded("productive_hours", GoalKind::ProductiveTime, 120),
    ]
}

/// Request to create a new goal.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    #[serde(flatten)]
    pub kind: GoalKind,
    #[validate(range(min = 1, message = "Target must be positive"))]
    pub target_value: i64,
    #[serde(default = "default_true")]
    pub notify_on_complete: bool,
    #[serde(default = "default_true")]
    pub notify_on_exceed: bool,
}

/// Request to update an existing goal. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    #[validate(range(min = 1, message = "Target must be positive"))]
    pub target_value: Option<i64>,
    pub is_active: Option<bool>,
    pub notify_on_complete: Option<bool>,
    pub notify_on_exceed: Option<bool>,
}

fn default_true() -> bool {
    true
}

/// Consecutive days on which every active goal was met at reset time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub days: i32,
    pub updated_at: DateTime<Utc>,
}

impl Default for Streak {
    fn default() -> Self {
        Self {
            days: 0,
            updated_at: Utc::now(),
        }
    }
}
