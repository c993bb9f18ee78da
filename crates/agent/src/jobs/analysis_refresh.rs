//! Analysis refresh job.
//!
//! Hourly pass that collects the recent usage history and runs it
//! through the analysis service. The one-hour cache slot means a
//! refresh right after a successful remote call is effectively free.

use std::sync::Arc;

use chrono::Local;
use tracing::info;

use domain::models::analysis::MlAnalysisResult;
use domain::models::usage::UsageDayRecord;

use crate::services::{MlAnalysisService, UsageDataSource, UsageStatsService};

use super::scheduler::{Job, JobFrequency};

pub struct AnalysisRefreshJob<S> {
    usage: Arc<UsageStatsService<S>>,
    analysis: Arc<MlAnalysisService>,
    history_days: u32,
}

impl<S: UsageDataSource> AnalysisRefreshJob<S> {
    pub fn new(
        usage: Arc<UsageStatsService<S>>,
        analysis: Arc<MlAnalysisService>,
        history_days: u32,
    ) -> Self {
        Self {
            usage,
            analysis,
            history_days,
        }
    }

    /// Collects history and refreshes the classification. Days without
    /// data are simply absent from the submitted history.
    async fn refresh(&self) -> MlAnalysisResult {
        let today = Local::now().date_naive();
        let mut records = Vec::new();
        for offset in (0..i64::from(self.history_days)).rev() {
            let date = today - chrono::Duration::days(offset);
            if let Some(daily) = self.usage.daily_usage(Some(date)).await.data() {
                records.push(UsageDayRecord::from_daily(daily));
            }
        }

        let result = self.analysis.analyze(&records).await;
        info!(
            days = records.len(),
            category = ?result.pattern.category,
            trend = ?result.pattern.trend,
            "Usage analysis refreshed"
        );
        result
    }
}

#[async_trait::async_trait]
impl<S: UsageDataSource + 'static> Job for AnalysisRefreshJob<S> {
    fn name(&self) -> &'static str {
        "analysis_refresh"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        self.refresh().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domain::models::analysis::BehaviorCategory;
    use persistence::repositories::AnalysisCacheRepository;
    use persistence::MemoryStore;

    use crate::config::MlConfig;
    use crate::services::usage_stats::test_support::ScriptedSource;

    fn job(source: ScriptedSource) -> AnalysisRefreshJob<ScriptedSource> {
        let config = MlConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_ms: 1_000,
            enabled: false,
            history_days: 7,
        };
        let analysis = MlAnalysisService::new(
            config,
            AnalysisCacheRepository::new(Arc::new(MemoryStore::new())),
        )
        .unwrap();
        AnalysisRefreshJob::new(Arc::new(UsageStatsService::new(source)), Arc::new(analysis), 7)
    }

    #[tokio::test]
    async fn test_refresh_classifies_collected_history() {
        let source = ScriptedSource::with_permission();
        let today = Local::now().date_naive();
        for offset in 0..7 {
            source.put_day(
                today - Duration::days(offset),
                5 * 3_600_000,
                &[("com.example.video", 5 * 3_600_000)],
            );
        }

        let result = job(source).refresh().await;
        assert_eq!(result.summary.total_days, 7);
        assert_eq!(result.pattern.category, BehaviorCategory::HeavyUser);
    }

    #[tokio::test]
    async fn test_refresh_with_no_history_yields_empty_analysis() {
        let result = job(ScriptedSource::with_permission()).refresh().await;
        assert_eq!(result.summary.total_days, 0);
        assert_eq!(result.pattern.category, BehaviorCategory::LightUser);
    }

    #[tokio::test]
    async fn test_refresh_without_permission_yields_empty_analysis() {
        let result = job(ScriptedSource::denied()).refresh().await;
        assert_eq!(result.summary.total_days, 0);
    }
}
