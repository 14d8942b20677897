//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::geometry::{Position, Size};
use crate::game::player::MoveIntent;

/// Value of `type` that asks for a fresh match
pub const RESTART_MSG_TYPE: &str = "restart";

/// Message sent from client to server.
///
/// Every field is optional and several may arrive together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMsg {
    /// Only `"restart"` is meaningful
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub msg_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_movement: Option<PlayerMovement>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<TargetPosition>,

    /// Absent means the trigger is not held
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouse_is_being_pressed: Option<bool>,
}

impl ClientMsg {
    pub fn is_restart(&self) -> bool {
        self.msg_type.as_deref() == Some(RESTART_MSG_TYPE)
    }

    pub fn trigger_held(&self) -> bool {
        self.mouse_is_being_pressed.unwrap_or(false)
    }
}

/// Raw movement axes, each expected in {-1, 0, 1}
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerMovement {
    #[serde(default)]
    pub horizontal: f64,
    #[serde(default)]
    pub vertical: f64,
}

impl From<PlayerMovement> for MoveIntent {
    fn from(movement: PlayerMovement) -> Self {
        MoveIntent::from_axes(movement.horizontal, movement.vertical)
    }
}

/// Cursor position the player aims at
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPosition {
    pub target_position_x: f64,
    pub target_position_y: f64,
}

impl From<TargetPosition> for Position {
    fn from(target: TargetPosition) -> Self {
        Position::new(target.target_position_x, target.target_position_y)
    }
}

/// Full match state pushed every tick
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub projectiles: Vec<EntitySnapshot>,
    pub meteors: Vec<EntitySnapshot>,
    /// Players in admission order
    pub player: Vec<PlayerSnapshot>,
    pub is_game_active: bool,
    pub is_game_over: bool,
    pub score: u64,
}

/// Meteor or projectile state in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySnapshot {
    pub current_position: Position,
    pub size: Size,
    /// Trajectory angle in radians
    pub angle: f64,
    /// +1 heading right, -1 heading left
    pub direction: f64,
    pub speed: f64,
    /// Meteor display rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_angle: Option<f64>,
    /// Player that fired a projectile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<Uuid>,
}

/// Player state in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub position: Position,
    /// Facing in radians
    pub angle: f64,
    pub id: Uuid,
}
