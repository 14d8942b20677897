//! Collision resolution - projectile hits, player strikes, scoring

use super::entity::PassiveEntity;
use super::geometry::Body;

/// Score awarded per meteor destroyed by a projectile
pub const METEOR_HIT_SCORE: u64 = 100;

/// Result of resolving one tick of collisions
#[derive(Debug, Clone)]
pub struct CollisionOutcome {
    pub meteors: Vec<PassiveEntity>,
    pub projectiles: Vec<PassiveEntity>,
    pub score_delta: u64,
    pub game_over: bool,
}

/// Collision system for meteors, projectiles and players
pub struct CombatSystem;

impl CombatSystem {
    /// Resolve collisions for the current entity sets.
    ///
    /// Each meteor (in order) is destroyed by at most one projectile, the
    /// earliest colliding one. Independently, a meteor touching any player
    /// ends the game. Survivors keep their relative order.
    pub fn resolve(
        meteors: Vec<PassiveEntity>,
        projectiles: Vec<PassiveEntity>,
        players: &[&Body],
    ) -> CollisionOutcome {
        let mut meteor_hit = vec![false; meteors.len()];
        let mut projectile_hit = vec![false; projectiles.len()];
        let mut score_delta = 0;
        let mut game_over = false;

        for (i, meteor) in meteors.iter().enumerate() {
            if let Some(j) = projectiles
                .iter()
                .position(|projectile| meteor.body().collides_with(projectile.body()))
            {
                meteor_hit[i] = true;
                projectile_hit[j] = true;
                score_delta += METEOR_HIT_SCORE;
            }

            if players.iter().any(|player| meteor.body().collides_with(player)) {
                game_over = true;
            }
        }

        CollisionOutcome {
            meteors: retain_unhit(meteors, &meteor_hit),
            projectiles: retain_unhit(projectiles, &projectile_hit),
            score_delta,
            game_over,
        }
    }
}

fn retain_unhit(entities: Vec<PassiveEntity>, hit: &[bool]) -> Vec<PassiveEntity> {
    entities
        .into_iter()
        .zip(hit)
        .filter(|(_, hit)| !**hit)
        .map(|(entity, _)| entity)
        .collect()
}
