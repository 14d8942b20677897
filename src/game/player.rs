//! Player-controlled entity: movement, facing and fire-rate gate

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use super::entity::REFERENCE_FRAME_MS;
use super::geometry::{Body, Position, Size};

/// Player hitbox/display size
pub const PLAYER_SIZE: Size = Size::new(40.0, 100.0);
/// Units per reference frame
pub const PLAYER_SPEED: f64 = 2.0;
/// Seconds between shots while the trigger is held
pub const FIRE_RATE_BASELINE: f64 = 0.5;
/// Facing a fresh player starts with
const INITIAL_FACING: f64 = FRAC_PI_2;

/// Discretised movement input, each axis in {-1, 0, 1}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveIntent {
    pub horizontal: i8,
    pub vertical: i8,
}

impl MoveIntent {
    pub fn new(horizontal: i8, vertical: i8) -> Self {
        Self {
            horizontal: horizontal.signum(),
            vertical: vertical.signum(),
        }
    }

    /// Collapse raw client axes onto {-1, 0, 1}
    pub fn from_axes(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal: axis_sign(horizontal),
            vertical: axis_sign(vertical),
        }
    }
}

fn axis_sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Authoritative player entity
#[derive(Debug, Clone)]
pub struct Player {
    body: Body,
    speed: f64,
    facing: f64,
    /// Seconds left before the next shot is allowed
    fire_cooldown: f64,
}

impl Player {
    pub fn new(spawn: Position) -> Self {
        Self {
            body: Body::new(spawn, PLAYER_SIZE),
            speed: PLAYER_SPEED,
            facing: INITIAL_FACING,
            fire_cooldown: FIRE_RATE_BASELINE,
        }
    }

    /// Move by the intent scaled to the elapsed time, then update facing.
    pub fn move_by(&mut self, intent: MoveIntent, delta_ms: f64) {
        let step = self.speed * (delta_ms / REFERENCE_FRAME_MS);
        let position = self.body.position_mut();
        position.x += step * f64::from(intent.horizontal);
        position.y += step * f64::from(intent.vertical);

        if let Some(facing) = facing_for(intent) {
            self.facing = facing;
        }
    }

    /// Count the fire gate down while the trigger is held
    pub fn shoot_countdown(&mut self, delta_ms: f64) {
        self.fire_cooldown -= delta_ms / 1000.0;
    }

    pub fn can_shoot(&self) -> bool {
        self.fire_cooldown <= 0.0
    }

    pub fn reset_shoot_countdown(&mut self) {
        self.fire_cooldown = FIRE_RATE_BASELINE;
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn position(&self) -> Position {
        self.body.position()
    }

    pub fn facing(&self) -> f64 {
        self.facing
    }
}

/// 8-way facing from the last movement input. `None` keeps the current facing.
fn facing_for(intent: MoveIntent) -> Option<f64> {
    let h = f64::from(intent.horizontal);
    match (intent.horizontal, intent.vertical) {
        (0, -1) => Some(0.0),
        (0, 1) => Some(PI),
        (0, _) => None,
        (_, 0) => Some(FRAC_PI_2 * h),
        (_, -1) => Some(FRAC_PI_4 * h),
        _ => Some(3.0 * FRAC_PI_4 * h),
    }
}
