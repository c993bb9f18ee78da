//! Domain models for Wellbeing Monitor.

pub mod analysis;
pub mod goal;
pub mod status;
pub mod usage;

pub use analysis::{Insight, InsightSeverity, MlAnalysisResult};
pub use goal::{Goal, GoalKind, Streak};
pub use status::WatchtimeStatus;
pub use usage::{DailyUsage, UsageQueryResult, UsageSnapshot, WeeklyUsage};
