//! Goal list repository.

use std::sync::Arc;

use tracing::warn;

use domain::models::goal::{default_goals, Goal};

use crate::store::{KeyValueStore, StorageError};

const GOALS_KEY: &str = "goals:daily";

/// Repository for the daily goal list.
#[derive(Clone)]
pub struct GoalRepository {
    store: Arc<dyn KeyValueStore>,
}

impl GoalRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the goal list, seeding the four defaults on first run.
    ///
    /// Seeding happens only when no list has ever been stored; an
    /// existing list, even one emptied by user deletions, suppresses
    /// it. Storage or parse failures degrade to the in-memory default
    /// list without persisting, so callers never hard-fail on
    /// corruption.
    pub async fn load_or_seed(&self) -> Vec<Goal> {
        match self.store.get(GOALS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(goals) => goals,
                Err(e) => {
                    warn!(error = %e, "Stored goals unreadable, using defaults");
                    default_goals()
                }
            },
            Ok(None) => {
                let goals = default_goals();
                if let Err(e) = self.save(&goals).await {
                    warn!(error = %e, "Failed to persist seeded goals");
                }
                goals
            }
            Err(e) => {
                warn!(error = %e, "Goal storage read failed, using defaults");
                default_goals()
            }
        }
    }

    /// Persists the full goal list.
    pub async fn save(&self, goals: &[Goal]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(goals)?;
        self.store.set(GOALS_KEY, &raw).await
    }
}
