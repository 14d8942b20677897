//! Match state and the per-tick simulation step

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::combat::CombatSystem;
use super::entity::PassiveEntity;
use super::geometry::{Body, Position, Size};
use super::player::{MoveIntent, Player};
use super::spawner::MeteorSpawner;

/// Logical play area the client renders
pub const WINDOW_SIZE: Size = Size::new(1400.0, 900.0);
/// Spawn point of the player who opens the match
pub const FIRST_PLAYER_SPAWN: Position = Position { x: 450.0, y: 450.0 };
/// Spawn point of any player admitted later
pub const SECOND_PLAYER_SPAWN: Position = Position { x: 850.0, y: 450.0 };

/// Match mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Single,
    Double,
}

/// Match phase, derived from the active/over flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Double mode, waiting for the second player
    Waiting,
    /// Ticking
    Active,
    /// Terminal until the slot restarts the match
    Over,
}

/// A seated player plus the last aim target they reported
#[derive(Debug, Clone)]
pub struct PlayerSeat {
    pub id: Uuid,
    pub player: Player,
    pub aim_target: Option<Position>,
}

/// Authoritative state of one match
pub struct MatchState {
    mode: GameMode,
    /// Admission order is kept for snapshots
    players: Vec<PlayerSeat>,
    projectiles: Vec<PassiveEntity>,
    meteors: Vec<PassiveEntity>,
    score: u64,
    is_game_active: bool,
    is_game_over: bool,
    window_size: Size,
    rng: ChaCha8Rng,
}

impl MatchState {
    pub fn new(player_id: Uuid, mode: GameMode) -> Self {
        Self::with_seed(player_id, mode, rand::thread_rng().gen())
    }

    pub fn with_seed(player_id: Uuid, mode: GameMode, seed: u64) -> Self {
        Self {
            mode,
            players: vec![PlayerSeat {
                id: player_id,
                player: Player::new(FIRST_PLAYER_SPAWN),
                aim_target: None,
            }],
            projectiles: Vec::new(),
            meteors: Vec::new(),
            score: 0,
            is_game_active: mode == GameMode::Single,
            is_game_over: false,
            window_size: WINDOW_SIZE,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seat another player. A waiting match becomes active.
    pub fn add_player(&mut self, player_id: Uuid) {
        if self.seat(player_id).is_some() {
            return;
        }

        self.players.push(PlayerSeat {
            id: player_id,
            player: Player::new(SECOND_PLAYER_SPAWN),
            aim_target: None,
        });

        if self.phase() == MatchPhase::Waiting {
            self.is_game_active = true;
        }
    }

    pub fn move_player(&mut self, player_id: Uuid, intent: MoveIntent, delta_ms: f64) {
        if !self.is_game_active {
            return;
        }
        if let Some(seat) = self.seat_mut(player_id) {
            seat.player.move_by(intent, delta_ms);
        }
    }

    /// Record where the player aims. Used by the next shot, not re-read live.
    pub fn set_aim_target(&mut self, player_id: Uuid, target: Position) {
        if let Some(seat) = self.seat_mut(player_id) {
            seat.aim_target = Some(target);
        }
    }

    /// Held trigger counts the fire gate down; released resets it.
    pub fn set_shooting(&mut self, player_id: Uuid, held: bool, delta_ms: f64) {
        if let Some(seat) = self.seat_mut(player_id) {
            if held {
                seat.player.shoot_countdown(delta_ms);
            } else {
                seat.player.reset_shoot_countdown();
            }
        }
    }

    /// Advance the simulation by `delta_ms` of measured wall time
    pub fn tick(&mut self, delta_ms: f64) {
        if !self.is_game_active {
            return;
        }

        for projectile in &mut self.projectiles {
            projectile.passive_movement(delta_ms);
        }
        for meteor in &mut self.meteors {
            meteor.passive_movement(delta_ms);
        }

        let bodies: Vec<&Body> = self.players.iter().map(|s| s.player.body()).collect();
        let outcome = CombatSystem::resolve(
            std::mem::take(&mut self.meteors),
            std::mem::take(&mut self.projectiles),
            &bodies,
        );
        self.meteors = outcome.meteors;
        self.projectiles = outcome.projectiles;
        self.score += outcome.score_delta;
        if outcome.game_over {
            self.is_game_active = false;
            self.is_game_over = true;
        }

        if let Some(meteor) = MeteorSpawner::maybe_spawn(self.score, self.window_size, &mut self.rng)
        {
            self.meteors.push(meteor);
        }

        for seat in &mut self.players {
            let Some(target) = seat.aim_target else {
                continue;
            };
            if seat.player.can_shoot() {
                seat.player.reset_shoot_countdown();
                self.projectiles
                    .push(PassiveEntity::projectile(seat.id, seat.player.position(), target));
            }
        }
    }

    /// Drop meteors and projectiles that left the world
    pub fn clear_out_of_bounds(&mut self) {
        self.projectiles.retain(|p| !p.is_out_of_bound());
        self.meteors.retain(|m| !m.is_out_of_bound());
    }

    pub fn phase(&self) -> MatchPhase {
        if self.is_game_over {
            MatchPhase::Over
        } else if self.is_game_active {
            MatchPhase::Active
        } else {
            MatchPhase::Waiting
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_game_active(&self) -> bool {
        self.is_game_active
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn players(&self) -> &[PlayerSeat] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn projectiles(&self) -> &[PassiveEntity] {
        &self.projectiles
    }

    pub fn meteors(&self) -> &[PassiveEntity] {
        &self.meteors
    }

    pub fn seat(&self, player_id: Uuid) -> Option<&PlayerSeat> {
        self.players.iter().find(|s| s.id == player_id)
    }

    fn seat_mut(&mut self, player_id: Uuid) -> Option<&mut PlayerSeat> {
        self.players.iter_mut().find(|s| s.id == player_id)
    }

    #[cfg(test)]
    pub(crate) fn push_meteor(&mut self, meteor: PassiveEntity) {
        self.meteors.push(meteor);
    }

    #[cfg(test)]
    pub(crate) fn push_projectile(&mut self, projectile: PassiveEntity) {
        self.projectiles.push(projectile);
    }
}
