//! Domain services for Wellbeing Monitor.
//!
//! Services contain pure business logic that operates on domain models.

pub mod classifier;
pub mod goal_sync;
pub mod insights;
pub mod notification;

pub use classifier::fallback_classification;
pub use goal_sync::{reset_daily, sync_goals, GoalEvent, GoalSyncInput};
pub use insights::{realtime_insights, CurrentUsage};
pub use notification::{
    LocalNotification, MockNotificationSink, NotificationPriority, NotificationResult,
    NotificationSink,
};
