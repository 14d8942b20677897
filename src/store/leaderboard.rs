//! In-process leaderboard

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::StoreError;

/// Entries returned by a leaderboard listing
pub const LEADERBOARD_PAGE_SIZE: usize = 20;

/// One saved score
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub name: String,
    pub score: u64,
    pub created_at: DateTime<Utc>,
}

/// Saved scores
#[derive(Clone, Default)]
pub struct LeaderboardStore {
    entries: Arc<RwLock<Vec<LeaderboardEntry>>>,
}

impl LeaderboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a score and return its rank: one more than the number of
    /// previously saved scores strictly above it
    pub fn submit(&self, name: &str, score: u64) -> Result<usize, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::MissingName);
        }

        let mut entries = self.entries.write();
        let rank = entries.iter().filter(|e| e.score > score).count() + 1;
        entries.push(LeaderboardEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            score,
            created_at: Utc::now(),
        });

        Ok(rank)
    }

    /// Highest scores first, at most `limit`
    pub fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut entries = self.entries.read().clone();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        entries
    }
}
