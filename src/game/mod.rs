//! Game simulation modules

pub mod combat;
pub mod entity;
pub mod geometry;
pub mod r#match;
pub mod player;
pub mod snapshot;
pub mod spawner;

pub use r#match::{GameMode, MatchState};
pub use snapshot::SnapshotBuilder;
