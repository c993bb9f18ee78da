//! Usage statistics service.
//!
//! Thin adapter over the platform usage-access API. Read-only: it
//! aggregates what the platform reports and never touches storage.

use chrono::{Local, NaiveDate};
use tracing::warn;

use domain::models::usage::{
    sort_top_apps, AppUsageItem, DailyUsage, UsageQueryResult, UsageSnapshot, WeeklyUsage,
};

/// Failure modes of the platform usage-access API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UsageSourceError {
    #[error("Usage access permission not granted")]
    NoPermission,

    #[error("No usage data recorded for the requested day")]
    NoData,

    #[error("Platform query failed: {0}")]
    Platform(String),
}

/// The platform usage-access API, treated as a black box.
///
/// Implementations bridge to the OS (on Android, `UsageStatsManager`);
/// tests substitute a scripted source.
#[async_trait::async_trait]
pub trait UsageDataSource: Send + Sync {
    /// Whether usage access is granted. Never errors: platforms
    /// without a usage-stats API report `false`.
    async fn check_permission(&self) -> bool;

    /// Raw usage for one local day.
    async fn query_day(&self, date: NaiveDate) -> Result<UsageSnapshot, UsageSourceError>;
}

#[async_trait::async_trait]
impl<S: UsageDataSource + ?Sized> UsageDataSource for std::sync::Arc<S> {
    async fn check_permission(&self) -> bool {
        (**self).check_permission().await
    }

    async fn query_day(&self, date: NaiveDate) -> Result<UsageSnapshot, UsageSourceError> {
        (**self).query_day(date).await
    }
}

/// Aggregating service over a [`UsageDataSource`].
pub struct UsageStatsService<S> {
    source: S,
}

impl<S: UsageDataSource> UsageStatsService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Aggregated usage for `date` (today when `None`).
    ///
    /// Permission problems and platform failures come back as tagged
    /// results, never as errors: callers must treat `NoPermission` as
    /// "unknown", not as an empty day.
    pub async fn daily_usage(&self, date: Option<NaiveDate>) -> UsageQueryResult {
        if !self.source.check_permission().await {
            return UsageQueryResult::NoPermission;
        }

        let date = date.unwrap_or_else(|| Local::now().date_naive());
        match self.source.query_day(date).await {
            Ok(snapshot) => UsageQueryResult::Data(Self::aggregate(date, snapshot)),
            Err(UsageSourceError::NoPermission) => UsageQueryResult::NoPermission,
            Err(UsageSourceError::NoData) => UsageQueryResult::NoData,
            Err(UsageSourceError::Platform(message)) => {
                warn!(%date, error = %message, "Usage query failed");
                UsageQueryResult::Error { message }
            }
        }
    }

    /// Aggregate over the last seven days (today included).
    ///
    /// Days that report no data are simply absent; the average divides
    /// by the number of days with data and is zero when none have any.
    pub async fn weekly_usage(&self) -> WeeklyUsage {
        let today = Local::now().date_naive();
        let mut days = Vec::new();
        for offset in (0..7).rev() {
            let date = today - chrono::Duration::days(offset);
            if let UsageQueryResult::Data(daily) = self.daily_usage(Some(date)).await {
                days.push(daily);
            }
        }
        WeeklyUsage::from_days(days)
    }

    /// Today's total screen time in minutes, when known.
    pub async fn today_minutes(&self) -> Option<i64> {
        self.daily_usage(None)
            .await
            .data()
            .map(|d| d.total_time_ms / 60_000)
    }

    fn aggregate(date: NaiveDate, snapshot: UsageSnapshot) -> DailyUsage {
        let apps: Vec<AppUsageItem> = snapshot
            .per_app_ms
            .iter()
            .map(|(package, &ms)| AppUsageItem {
                package_name: package.clone(),
                app_name: None,
                foreground_time_ms: ms,
            })
            .collect();
        let top_apps = sort_top_apps(apps);

        DailyUsage {
            date,
            total_time_ms: snapshot.total_screen_time_ms,
            app_count: top_apps.len(),
            top_apps,
            unlocks: snapshot.pickups,
            notifications: snapshot.notifications,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::{Duration, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted usage source for tests.
    pub struct ScriptedSource {
        pub permission: bool,
        pub days: Mutex<HashMap<NaiveDate, Result<UsageSnapshot, UsageSourceError>>>,
    }

    impl ScriptedSource {
        pub fn with_permission() -> Self {
            Self {
                permission: true,
                days: Mutex::new(HashMap::new()),
            }
        }

        pub fn denied() -> Self {
            Self {
                permission: false,
                days: Mutex::new(HashMap::new()),
            }
        }

        pub fn put_day(&self, date: NaiveDate, total_ms: i64, per_app: &[(&str, i64)]) {
            let snapshot = UsageSnapshot {
                total_screen_time_ms: total_ms,
                per_app_ms: per_app
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect(),
                pickups: 20,
                notifications: 40,
                window_start: Utc::now() - Duration::hours(12),
                window_end: Utc::now(),
            };
            self.days.lock().unwrap().insert(date, Ok(snapshot));
        }

        pub fn put_failure(&self, date: NaiveDate, error: UsageSourceError) {
            self.days.lock().unwrap().insert(date, Err(error));
        }
    }

    #[async_trait::async_trait]
    impl UsageDataSource for ScriptedSource {
        async fn check_permission(&self) -> bool {
            self.permission
        }

        async fn query_day(&self, date: NaiveDate) -> Result<UsageSnapshot, UsageSourceError> {
            let entry = self.days.lock().unwrap().get(&date).cloned();
            entry.unwrap_or(Err(UsageSourceError::NoData))
        }
    }
}
