//! Linear-trajectory entities (meteors and projectiles)

use uuid::Uuid;

use super::geometry::{Body, Position, Size};

/// Meteor hitbox/display size
pub const METEOR_SIZE: Size = Size::new(100.0, 100.0);
/// Projectile hitbox/display size
pub const PROJECTILE_SIZE: Size = Size::new(50.0, 20.0);
/// Projectile speed in units per 16ms
pub const PROJECTILE_SPEED: f64 = 4.0;
/// Display rotation a meteor spawns with
const METEOR_INITIAL_SPIN: f64 = 45.0;
/// Reference frame length the speeds are expressed in
pub const REFERENCE_FRAME_MS: f64 = 16.0;

/// Which kind of passive object an entity record represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Meteor,
    Projectile,
}

/// Straight line from a spawn point through an original target, frozen at creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory {
    /// Slope `a` of `y = a * x + b`
    pub slope: f64,
    /// Intercept `b` of `y = a * x + b`
    pub intercept: f64,
    /// +1 when heading right, -1 otherwise
    pub direction: f64,
    /// `atan(slope)`
    pub angle: f64,
    /// Units per reference frame
    pub speed: f64,
}

impl Trajectory {
    pub fn toward(from: Position, to: Position, speed: f64) -> Self {
        let slope = (to.y - from.y) / (to.x - from.x);
        let intercept = to.y - slope * to.x;
        let direction = if to.x > from.x { 1.0 } else { -1.0 };

        Self {
            slope,
            intercept,
            direction,
            angle: slope.atan(),
            speed,
        }
    }

    /// Step along the line. Y is recomputed from X, never re-aimed.
    pub fn advance(&self, position: &mut Position, delta_ms: f64) {
        position.x +=
            self.speed * (delta_ms / REFERENCE_FRAME_MS) * self.angle.cos() * self.direction;
        position.y = self.slope * position.x + self.intercept;
    }
}

/// A meteor or projectile: a body travelling along a fixed trajectory
#[derive(Debug, Clone)]
pub struct PassiveEntity {
    kind: EntityKind,
    body: Body,
    trajectory: Trajectory,
    /// Meteor display rotation, +1 per movement step
    spin: f64,
    /// Player that fired a projectile
    source: Option<Uuid>,
}

impl PassiveEntity {
    pub fn meteor(from: Position, to: Position, speed: f64) -> Self {
        Self {
            kind: EntityKind::Meteor,
            body: Body::new(from, METEOR_SIZE),
            trajectory: Trajectory::toward(from, to, speed),
            spin: METEOR_INITIAL_SPIN,
            source: None,
        }
    }

    pub fn projectile(source: Uuid, from: Position, to: Position) -> Self {
        Self {
            kind: EntityKind::Projectile,
            body: Body::new(from, PROJECTILE_SIZE),
            trajectory: Trajectory::toward(from, to, PROJECTILE_SPEED),
            spin: 0.0,
            source: Some(source),
        }
    }

    /// Unconditional movement along the trajectory
    pub fn passive_movement(&mut self, delta_ms: f64) {
        self.trajectory.advance(self.body.position_mut(), delta_ms);
        if self.kind == EntityKind::Meteor {
            self.spin += 1.0;
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn position(&self) -> Position {
        self.body.position()
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn spin(&self) -> f64 {
        self.spin
    }

    pub fn source(&self) -> Option<Uuid> {
        self.source
    }

    pub fn is_out_of_bound(&self) -> bool {
        self.body.is_out_of_bound()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn projectile(from: (f64, f64), to: (f64, f64)) -> PassiveEntity {
        PassiveEntity::projectile(
            Uuid::new_v4(),
            Position::new(from.0, from.1),
            Position::new(to.0, to.1),
        )
    }

    #[test]
    fn test_horizontal_trajectory_one_frame() {
        let mut p = projectile((0.0, 100.0), (100.0, 100.0));
        p.passive_movement(16.0);
        assert!((p.position().x - 4.0).abs() < EPSILON);
        assert!((p.position().y - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_diagonal_trajectory_one_frame() {
        let mut p = projectile((0.0, 0.0), (100.0, 100.0));
        p.passive_movement(16.0);
        let expected = 4.0 * std::f64::consts::FRAC_PI_4.cos();
        assert!((p.position().x - expected).abs() < 1e-6);
        assert!((p.position().y - expected).abs() < 1e-6);
        assert!((p.position().x - 2.828).abs() < 1e-3);
    }

    #[test]
    fn test_leftward_trajectory_one_frame() {
        let mut p = projectile((100.0, 50.0), (0.0, 50.0));
        assert_eq!(p.trajectory().direction, -1.0);
        p.passive_movement(16.0);
        assert!((p.position().x - 96.0).abs() < EPSILON);
        assert!((p.position().y - 50.0).abs() < EPSILON);
    }

    #[test]
    fn test_equal_x_resolves_direction_to_negative() {
        let t = Trajectory::toward(Position::new(10.0, 0.0), Position::new(10.0, 50.0), 1.0);
        assert_eq!(t.direction, -1.0);
    }

    #[test]
    fn test_delta_scales_distance() {
        let mut slow = projectile((0.0, 100.0), (100.0, 100.0));
        let mut fast = slow.clone();
        slow.passive_movement(8.0);
        fast.passive_movement(32.0);
        assert!((slow.position().x - 2.0).abs() < EPSILON);
        assert!((fast.position().x - 8.0).abs() < EPSILON);
    }

    #[test]
    fn test_line_is_frozen_at_creation() {
        let mut p = projectile((0.0, 0.0), (100.0, 50.0));
        for _ in 0..10 {
            p.passive_movement(16.0);
            let pos = p.position();
            assert!((pos.y - 0.5 * pos.x).abs() < 1e-9);
        }
    }

    #[test]
    fn test_meteor_spins_each_step() {
        let mut m = PassiveEntity::meteor(Position::new(0.0, 0.0), Position::new(100.0, 0.0), 2.0);
        assert_eq!(m.kind(), EntityKind::Meteor);
        assert_eq!(m.body().size(), METEOR_SIZE);
        let before = m.spin();
        m.passive_movement(16.0);
        m.passive_movement(16.0);
        assert_eq!(m.spin(), before + 2.0);
        assert!((m.position().x - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_projectile_keeps_source_and_size() {
        let shooter = Uuid::new_v4();
        let p = PassiveEntity::projectile(shooter, Position::new(1.0, 1.0), Position::new(2.0, 2.0));
        assert_eq!(p.source(), Some(shooter));
        assert_eq!(p.kind(), EntityKind::Projectile);
        assert_eq!(p.body().size(), PROJECTILE_SIZE);
    }
}
