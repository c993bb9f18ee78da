//! Device usage domain models.
//!
//! One `UsageSnapshot` is produced per query of the platform usage
//! API. Snapshots are immutable: a later query supersedes the previous
//! snapshot rather than updating it.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Raw usage data for one observation window, as reported by the
/// platform usage-access API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    /// Total foreground screen time in milliseconds
    pub total_screen_time_ms: i64,
    /// Foreground time per app, keyed by package name
    pub per_app_ms: HashMap<String, i64>,
    /// Device unlock / pickup count
    pub pickups: i32,
    /// Notifications received
    pub notifications: i32,
    /// Window start
    pub window_start: DateTime<Utc>,
    /// Window end
    pub window_end: DateTime<Utc>,
}

/// Per-app usage entry in a daily aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUsageItem {
    /// Package name (e.g., com.example.app)
    pub package_name: String,
    /// Display name of the app
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// Foreground time in milliseconds
    pub foreground_time_ms: i64,
}

/// Aggregated usage for one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUsage {
    /// Usage date (local day the window covers)
    pub date: NaiveDate,
    /// Total foreground time in milliseconds
    pub total_time_ms: i64,
    /// Number of distinct apps used
    pub app_count: usize,
    /// Apps sorted descending by foreground time; ties keep first-seen order
    pub top_apps: Vec<AppUsageItem>,
    /// Device unlock count
    pub unlocks: i32,
    /// Notifications received
    pub notifications: i32,
}

/// Outcome of a daily usage query.
///
/// `NoPermission` and `NoData` mean "unknown", not "zero usage";
/// callers must not treat them as an empty day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UsageQueryResult {
    Data(DailyUsage),
    NoPermission,
    NoData,
    Error { message: String },
}

impl UsageQueryResult {
    /// Returns the daily aggregate if this result carries data.
    pub fn data(&self) -> Option<&DailyUsage> {
        match self {
            UsageQueryResult::Data(d) => Some(d),
            _ => None,
        }
    }
}

/// Aggregate over the last seven daily snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyUsage {
    /// Daily aggregates, oldest first; days without data are absent
    pub days: Vec<DailyUsage>,
    /// Sum of total time over days with data, in milliseconds
    pub total_time_ms: i64,
    /// `total_time_ms / days_with_data`, or 0 when no day has data
    pub average_time_ms: i64,
    /// Number of days that returned data
    pub days_with_data: usize,
}

impl WeeklyUsage {
    /// Builds the weekly aggregate from the available daily results.
    pub fn from_days(days: Vec<DailyUsage>) -> Self {
        let days_with_data = days.len();
        let total_time_ms: i64 = days.iter().map(|d| d.total_time_ms).sum();
        let average_time_ms = if days_with_data == 0 {
            0
        } else {
            total_time_ms / days_with_data as i64
        };
        Self {
            days,
            total_time_ms,
            average_time_ms,
            days_with_data,
        }
    }
}

/// One historical day in the form the ML endpoint consumes.
///
/// Serializes to the CSV row schema
/// `date,hour,totalScreenTime,topAppPackage,topAppTime,appCount,dayOfWeek,isWeekend`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageDayRecord {
    pub date: NaiveDate,
    pub hour: u32,
    #[serde(rename = "totalScreenTime")]
    pub total_screen_time_ms: i64,
    #[serde(rename = "topAppPackage")]
    pub top_app_package: String,
    #[serde(rename = "topAppTime")]
    pub top_app_time_ms: i64,
    #[serde(rename = "appCount")]
    pub app_count: usize,
    #[serde(rename = "dayOfWeek")]
    pub day_of_week: u32,
    #[serde(rename = "isWeekend")]
    pub is_weekend: bool,
}

impl UsageDayRecord {
    /// Builds a record from a daily aggregate, filling in the
    /// day-of-week fields.
    pub fn from_daily(daily: &DailyUsage) -> Self {
        let weekday = daily.date.weekday();
        let top = daily.top_apps.first();
        Self {
            date: daily.date,
            hour: 0,
            total_screen_time_ms: daily.total_time_ms,
            top_app_package: top.map(|a| a.package_name.clone()).unwrap_or_default(),
            top_app_time_ms: top.map(|a| a.foreground_time_ms).unwrap_or(0),
            app_count: daily.app_count,
            day_of_week: weekday.num_days_from_sunday(),
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
        }
    }
}

/// Sorts per-app entries descending by foreground time.
///
/// The sort is stable so ties keep their first-seen order.
pub fn sort_top_apps(mut apps: Vec<AppUsageItem>) -> Vec<AppUsageItem> {
    apps.sort_by(|a, b| b.foreground_time_ms.cmp(&a.foreground_time_ms));
    apps
}
