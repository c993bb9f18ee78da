//! Typed repositories over the key-value store.
//!
//! Each repository owns one key (disjoint prefixes across
//! repositories) and serializes its aggregate as JSON.

mod analysis_cache;
mod goals;
mod monitor_state;
mod streak;

pub use analysis_cache::{AnalysisCacheRepository, ANALYSIS_CACHE_TTL_MS};
pub use goals::GoalRepository;
pub use monitor_state::{MonitorState, MonitorStateRepository};
pub use streak::StreakRepository;
