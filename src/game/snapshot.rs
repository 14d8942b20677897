//! Snapshot building for network transmission

use crate::ws::protocol::{EntitySnapshot, GameSnapshot, PlayerSnapshot};

use super::entity::{EntityKind, PassiveEntity};
use super::r#match::{MatchState, PlayerSeat};

/// Builds wire snapshots from match state
pub struct SnapshotBuilder;

impl SnapshotBuilder {
    pub fn build(state: &MatchState) -> GameSnapshot {
        GameSnapshot {
            projectiles: state.projectiles().iter().map(Self::entity).collect(),
            meteors: state.meteors().iter().map(Self::entity).collect(),
            player: state.players().iter().map(Self::player).collect(),
            is_game_active: state.is_game_active(),
            is_game_over: state.is_game_over(),
            score: state.score(),
        }
    }

    fn entity(entity: &PassiveEntity) -> EntitySnapshot {
        let trajectory = entity.trajectory();
        let (object_angle, source_id) = match entity.kind() {
            EntityKind::Meteor => (Some(entity.spin()), None),
            EntityKind::Projectile => (None, entity.source()),
        };

        EntitySnapshot {
            current_position: entity.position(),
            size: entity.body().size(),
            angle: trajectory.angle,
            direction: trajectory.direction,
            speed: trajectory.speed,
            object_angle,
            source_id,
        }
    }

    fn player(seat: &PlayerSeat) -> PlayerSnapshot {
        PlayerSnapshot {
            position: seat.player.position(),
            angle: seat.player.facing(),
            id: seat.id,
        }
    }
}
