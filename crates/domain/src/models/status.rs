//! Watchtime status buckets.

use serde::{Deserialize, Serialize};

/// Qualitative usage level derived from percentage-of-goal.
///
/// Ordered: `Excellent < Good < Moderate < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchtimeStatus {
    Excellent,
    Good,
    Moderate,
    High,
    Critical,
}

impl WatchtimeStatus {
    /// Buckets a percentage-of-goal value.
    ///
    /// Thresholds: <=50 Excellent, <=80 Good, <=100 Moderate,
    /// <=120 High, above that Critical.
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage <= 50.0 {
            WatchtimeStatus::Excellent
        } else if percentage <= 80.0 {
            WatchtimeStatus::Good
        } else if percentage <= 100.0 {
            WatchtimeStatus::Moderate
        } else if percentage <= 120.0 {
            WatchtimeStatus::High
        } else {
            WatchtimeStatus::Critical
        }
    }

    /// Position in the bucket ordering, 0 for Excellent.
    pub fn rank(&self) -> u8 {
        match self {
            WatchtimeStatus::Excellent => 0,
            WatchtimeStatus::Good => 1,
            WatchtimeStatus::Moderate => 2,
            WatchtimeStatus::High => 3,
            WatchtimeStatus::Critical => 4,
        }
    }
}

impl std::fmt::Display for WatchtimeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchtimeStatus::Excellent => write!(f, "excellent"),
            WatchtimeStatus::Good => write!(f, "good"),
            WatchtimeStatus::Moderate => write!(f, "moderate"),
            WatchtimeStatus::High => write!(f, "high"),
            WatchtimeStatus::Critical => write!(f, "critical"),
        }
    }
}
