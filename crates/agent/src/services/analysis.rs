//! Remote ML analysis client with local fallback.
//!
//! Usage history goes out as CSV to `POST {base}/ml/analyze`; the JSON
//! response is cached for one hour in a single slot. Any failure along
//! the way (network, status, parse) degrades to the local fallback
//! classifier instead of surfacing an error: a best-effort
//! classification is considered more useful than none.

use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use domain::models::analysis::{Insight, MlAnalysisResult};
use domain::models::usage::UsageDayRecord;
use domain::services::{fallback_classification, realtime_insights, CurrentUsage};
use persistence::repositories::AnalysisCacheRepository;

use crate::config::MlConfig;

/// Error type for analysis requests. Internal to the service; callers
/// always receive a result via the fallback path.
#[derive(Debug, thiserror::Error)]
enum AnalysisError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analysis endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    csv_data: String,
}

/// Client for the remote analysis endpoint.
pub struct MlAnalysisService {
    client: Client,
    config: MlConfig,
    cache: AnalysisCacheRepository,
}

impl MlAnalysisService {
    /// Creates the service. Fails only when the HTTP client cannot be
    /// built from the configured timeout.
    pub fn new(config: MlConfig, cache: AnalysisCacheRepository) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            config,
            cache,
        })
    }

    /// Analyzes usage history.
    ///
    /// Order of resolution: fresh cache entry; remote call; local
    /// fallback. Empty input short-circuits straight to the fallback's
    /// empty analysis without touching the network, and empty results
    /// are not cached.
    pub async fn analyze(&self, records: &[UsageDayRecord]) -> MlAnalysisResult {
        let now = Utc::now();
        if let Some(cached) = self.cache.get(now).await {
            debug!("Analysis served from cache");
            return cached;
        }

        if records.is_empty() {
            return fallback_classification(records);
        }

        if !self.config.enabled {
            return fallback_classification(records);
        }

        match self.fetch_remote(records).await {
            Ok(result) => {
                info!(days = records.len(), "Remote analysis succeeded");
                if let Err(e) = self.cache.put(&result, now).await {
                    warn!(error = %e, "Failed to cache analysis result");
                }
                result
            }
            Err(e) => {
                warn!(error = %e, "Remote analysis failed, using local classifier");
                fallback_classification(records)
            }
        }
    }

    /// Derives realtime insights from today's usage and an analysis
    /// result (typically the latest `analyze` output).
    pub fn insights(
        &self,
        today_total_ms: i64,
        analysis: Option<&MlAnalysisResult>,
    ) -> Vec<Insight> {
        realtime_insights(
            CurrentUsage {
                total_time_ms: today_total_ms,
            },
            analysis,
        )
    }

    async fn fetch_remote(
        &self,
        records: &[UsageDayRecord],
    ) -> Result<MlAnalysisResult, AnalysisError> {
        let csv_data = encode_csv(records)?;
        let url = format!("{}/ml/analyze", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest { csv_data })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnalysisError::Status(response.status()));
        }

        Ok(response.json::<MlAnalysisResult>().await?)
    }
}

/// Encodes history in the endpoint's CSV schema:
/// `date,hour,totalScreenTime,topAppPackage,topAppTime,appCount,dayOfWeek,isWeekend`.
fn encode_csv(records: &[UsageDayRecord]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
