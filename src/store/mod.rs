//! Score persistence

pub mod leaderboard;

pub use leaderboard::{LeaderboardEntry, LeaderboardStore, LEADERBOARD_PAGE_SIZE};

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Name is required")]
    MissingName,
}
