//! Streak repository.

use std::sync::Arc;

use tracing::warn;

use domain::models::goal::Streak;

use crate::store::{KeyValueStore, StorageError};

const STREAK_KEY: &str = "streak:days";

/// Repository for the goal streak counter.
#[derive(Clone)]
pub struct StreakRepository {
    store: Arc<dyn KeyValueStore>,
}

impl StreakRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the streak, defaulting to zero days when absent or unreadable.
    pub async fn load(&self) -> Streak {
        match self.store.get(STREAK_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Stored streak unreadable, resetting");
                Streak::default()
            }),
            Ok(None) => Streak::default(),
            Err(e) => {
                warn!(error = %e, "Streak storage read failed");
                Streak::default()
            }
        }
    }

    pub async fn save(&self, streak: &Streak) -> Result<(), StorageError> {
        let raw = serde_json::to_string(streak)?;
        self.store.set(STREAK_KEY, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Utc;

    #[tokio::test]
    async fn test_load_defaults_to_zero() {
        let repo = StreakRepository::new(Arc::new(MemoryStore::new()));
        assert_eq!(repo.load().await.days, 0);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let repo = StreakRepository::new(Arc::new(MemoryStore::new()));
        repo.save(&Streak {
            days: 12,
            updated_at: Utc::now(),
        })
        .await
        .unwrap();
        assert_eq!(repo.load().await.days, 12);
    }
}
