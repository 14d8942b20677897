//! Meteor spawning - probabilistic per-tick hazard introduction

use rand::Rng;

use super::entity::PassiveEntity;
use super::geometry::{Position, Size};

/// A uniform draw above this spawns a meteor (4% per tick)
pub const SPAWN_THRESHOLD: f64 = 0.96;
/// How far outside the window right/bottom-edge meteors appear
const EDGE_OFFSET: f64 = 20.0;
/// Points per difficulty step
const SCORE_PER_SPEED_STEP: u64 = 1000;

/// Edge a meteor enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEdge {
    Top,
    Right,
    Bottom,
    Left,
}

impl SpawnEdge {
    fn from_seed(seed: f64) -> Self {
        if seed <= 0.25 {
            Self::Top
        } else if seed <= 0.5 {
            Self::Right
        } else if seed <= 0.75 {
            Self::Bottom
        } else {
            Self::Left
        }
    }
}

pub struct MeteorSpawner;

impl MeteorSpawner {
    /// Meteor speed for the current score, +1 every 1000 points
    pub fn speed_for_score(score: u64) -> f64 {
        (score / SCORE_PER_SPEED_STEP + 1) as f64
    }

    /// Roll once for a new meteor. The spawn point is on a window edge and
    /// the target on the opposite edge.
    pub fn maybe_spawn<R: Rng + ?Sized>(
        score: u64,
        window: Size,
        rng: &mut R,
    ) -> Option<PassiveEntity> {
        if rng.gen::<f64>() <= SPAWN_THRESHOLD {
            return None;
        }

        let edge = SpawnEdge::from_seed(rng.gen());
        let (from, to) = match edge {
            SpawnEdge::Top => (
                Position::new(rng.gen::<f64>() * window.width, 0.0),
                Position::new(rng.gen::<f64>() * window.width, window.height),
            ),
            SpawnEdge::Right => (
                Position::new(window.width + EDGE_OFFSET, rng.gen::<f64>() * window.height),
                Position::new(0.0, rng.gen::<f64>() * window.height),
            ),
            SpawnEdge::Bottom => (
                Position::new(rng.gen::<f64>() * window.width, window.height + EDGE_OFFSET),
                Position::new(rng.gen::<f64>() * window.width, 0.0),
            ),
            SpawnEdge::Left => (
                Position::new(0.0, rng.gen::<f64>() * window.height),
                Position::new(window.width, rng.gen::<f64>() * window.height),
            ),
        };

        Some(PassiveEntity::meteor(from, to, Self::speed_for_score(score)))
    }
}
