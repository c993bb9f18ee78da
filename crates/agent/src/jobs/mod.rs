//! Background jobs.
//!
//! Four periodic tasks run on the scheduler: the watchtime monitor
//! poll, the goal sync pass, the hourly analysis refresh, and the
//! midnight reset.

pub mod analysis_refresh;
pub mod goal_sync;
pub mod midnight_reset;
pub mod scheduler;
pub mod watchtime;

pub use analysis_refresh::AnalysisRefreshJob;
pub use goal_sync::GoalSyncJob;
pub use midnight_reset::MidnightResetJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
pub use watchtime::WatchtimeMonitorJob;
