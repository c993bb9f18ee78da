//! Agent services.
//!
//! These orchestrate the domain logic against the platform
//! collaborators: the usage-access API, the key-value store, the
//! notification renderer, and the remote analysis endpoint.

pub mod analysis;
pub mod goals;
pub mod notify;
pub mod platform;
pub mod usage_stats;

pub use analysis::MlAnalysisService;
pub use goals::GoalService;
pub use notify::SpoolNotificationSink;
pub use platform::BridgeUsageSource;
pub use usage_stats::{UsageDataSource, UsageSourceError, UsageStatsService};
