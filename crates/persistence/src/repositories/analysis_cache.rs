//! ML analysis cache repository.
//!
//! A single cache slot: exactly one result is stored at a time and a
//! refresh replaces it wholesale. A stored entry always carries its
//! timestamp.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use domain::models::analysis::MlAnalysisResult;

use crate::store::{KeyValueStore, StorageError};

const CACHE_KEY: &str = "analysis:cache";

/// Cache TTL in milliseconds (one hour).
pub const ANALYSIS_CACHE_TTL_MS: i64 = 3_600_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedAnalysis {
    result: MlAnalysisResult,
    cached_at: DateTime<Utc>,
}

/// Repository for the single-slot analysis cache.
#[derive(Clone)]
pub struct AnalysisCacheRepository {
    store: Arc<dyn KeyValueStore>,
}

impl AnalysisCacheRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the cached result if it is still fresh at `now`.
    ///
    /// The expiry check is `now - cached_at > TTL`, strictly greater,
    /// so a read at exactly the TTL boundary is still a hit.
    pub async fn get(&self, now: DateTime<Utc>) -> Option<MlAnalysisResult> {
        let raw = match self.store.get(CACHE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Analysis cache read failed");
                return None;
            }
        };

        let cached: CachedAnalysis = match serde_json::from_str(&raw) {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "Analysis cache unreadable, discarding");
                return None;
            }
        };

        let age_ms = (now - cached.cached_at).num_milliseconds();
        if age_ms > ANALYSIS_CACHE_TTL_MS {
            return None;
        }
        Some(cached.result)
    }

    /// Replaces the cache slot with a new result stamped at `now`.
    pub async fn put(
        &self,
        result: &MlAnalysisResult,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let cached = CachedAnalysis {
            result: result.clone(),
            cached_at: now,
        };
        let raw = serde_json::to_string(&cached)?;
        self.store.set(CACHE_KEY, &raw).await
    }
}
