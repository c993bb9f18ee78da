//! Platform bridge usage source.
//!
//! The agent has no direct access to the OS usage-stats API; a
//! platform-side bridge exports one JSON snapshot per day into a
//! directory, named `YYYY-MM-DD.json`. This source reads those files.
//! A missing directory is reported as missing permission, since it
//! means the bridge was never granted access or never ran.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::debug;

use domain::models::usage::UsageSnapshot;

use super::usage_stats::{UsageDataSource, UsageSourceError};

pub struct BridgeUsageSource {
    dir: PathBuf,
}

impl BridgeUsageSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn day_file(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.json", date.format("%Y-%m-%d")))
    }
}

#[async_trait::async_trait]
impl UsageDataSource for BridgeUsageSource {
    async fn check_permission(&self) -> bool {
        tokio::fs::metadata(&self.dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    async fn query_day(&self, date: NaiveDate) -> Result<UsageSnapshot, UsageSourceError> {
        let path = self.day_file(date);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(?path, "No usage snapshot for day");
                return Err(UsageSourceError::NoData);
            }
            Err(e) => return Err(UsageSourceError::Platform(e.to_string())),
        };

        serde_json::from_str(&raw)
            .map_err(|e| UsageSourceError::Platform(format!("Snapshot unreadable: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    fn snapshot_json() -> String {
        let snapshot = UsageSnapshot {
            total_screen_time_ms: 3_600_000,
            per_app_ms: HashMap::from([("com.example.app".to_string(), 3_600_000)]),
            pickups: 12,
            notifications: 30,
            window_start: Utc::now() - chrono::Duration::hours(6),
            window_end: Utc::now(),
        };
        serde_json::to_string(&snapshot).unwrap()
    }

    #[tokio::test]
    async fn test_missing_directory_means_no_permission() {
        let dir = tempfile::tempdir().unwrap();
        let source = BridgeUsageSource::new(dir.path().join("nope"));
        assert!(!source.check_permission().await);
    }

    #[tokio::test]
    async fn test_reads_day_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        std::fs::write(dir.path().join("2025-06-02.json"), snapshot_json()).unwrap();

        let source = BridgeUsageSource::new(dir.path());
        assert!(source.check_permission().await);
        let snapshot = source.query_day(date).await.unwrap();
        assert_eq!(snapshot.total_screen_time_ms, 3_600_000);
        assert_eq!(snapshot.pickups, 12);
    }

    #[tokio::test]
    async fn test_missing_day_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let source = BridgeUsageSource::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        assert!(matches!(
            source.query_day(date).await,
            Err(UsageSourceError::NoData)
        ));
    }

    #[tokio::test]
    async fn test_corrupt_day_is_platform_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("2025-06-04.json"), "{ nope").unwrap();

        let source = BridgeUsageSource::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
        assert!(matches!(
            source.query_day(date).await,
            Err(UsageSourceError::Platform(_))
        ));
    }
}
