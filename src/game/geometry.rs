//! Geometry primitives and the shared positioned-body capability

use serde::{Deserialize, Serialize};

/// Right edge past which an entity is considered gone
pub const BOUND_MAX_X: f64 = 2500.0;
/// Bottom edge past which an entity is considered gone
pub const BOUND_MAX_Y: f64 = 2500.0;
/// Left/top edge (inclusive) at which an entity is considered gone
pub const BOUND_MIN: f64 = -10.0;
/// Per-axis distance within which two bodies collide
pub const COLLISION_REACH: f64 = 40.0;

/// World-space position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width/height of an entity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A positioned, sized game object.
///
/// The position is private: only the movement code in this crate
/// (`Trajectory::advance`, `Player::move_by`) shifts it.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    position: Position,
    size: Size,
}

impl Body {
    pub fn new(position: Position, size: Size) -> Self {
        Self { position, size }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub(crate) fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }

    /// True once the body has left the generous world margin. A position
    /// that is no longer finite (vertical trajectories) counts as gone.
    pub fn is_out_of_bound(&self) -> bool {
        let Position { x, y } = self.position;
        if !x.is_finite() || !y.is_finite() {
            return true;
        }
        x >= BOUND_MAX_X || x <= BOUND_MIN || y > BOUND_MAX_Y || y <= BOUND_MIN
    }

    /// Coarse box test on centre points. Sizes are ignored on purpose.
    pub fn collides_with(&self, other: &Body) -> bool {
        let dx = (self.position.x - other.position.x).abs();
        let dy = (self.position.y - other.position.y).abs();
        dx <= COLLISION_REACH && dy <= COLLISION_REACH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f64, y: f64) -> Body {
        Body::new(Position::new(x, y), Size::new(10.0, 10.0))
    }

    #[test]
    fn test_in_bounds_interior() {
        for (x, y) in [(0.0, 0.0), (2499.0, 2500.0), (1400.0, -9.0), (-9.5, 450.0)] {
            assert!(!body_at(x, y).is_out_of_bound(), "({x}, {y}) should be in bounds");
        }
    }

    #[test]
    fn test_out_of_bounds_edges() {
        assert!(body_at(2500.0, 100.0).is_out_of_bound());
        assert!(body_at(-10.0, 100.0).is_out_of_bound());
        assert!(body_at(100.0, 2500.1).is_out_of_bound());
        assert!(body_at(100.0, -10.0).is_out_of_bound());
    }

    #[test]
    fn test_non_finite_position_is_out_of_bounds() {
        assert!(body_at(450.0, f64::NAN).is_out_of_bound());
        assert!(body_at(f64::NAN, 450.0).is_out_of_bound());
        assert!(body_at(450.0, f64::INFINITY).is_out_of_bound());
        assert!(body_at(f64::NEG_INFINITY, 450.0).is_out_of_bound());
    }

    #[test]
    fn test_collision_within_reach() {
        let a = body_at(100.0, 100.0);
        assert!(a.collides_with(&body_at(140.0, 60.0)));
        assert!(a.collides_with(&body_at(100.0, 100.0)));
    }

    #[test]
    fn test_collision_just_outside_reach() {
        let a = body_at(100.0, 100.0);
        assert!(!a.collides_with(&body_at(141.0, 100.0)));
        assert!(!a.collides_with(&body_at(100.0, 59.0)));
    }

    #[test]
    fn test_collision_is_symmetric_and_ignores_size() {
        let big = Body::new(Position::new(0.0, 0.0), Size::new(500.0, 500.0));
        let small = body_at(45.0, 0.0);
        assert!(!big.collides_with(&small));
        assert!(!small.collides_with(&big));
    }
}
