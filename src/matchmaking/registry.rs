//! Session registry: every live match slot, keyed by session id

use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::game::GameMode;

use super::slot::{GameSlot, MAX_PLAYERS_PER_SLOT};

/// Entry of the joinable-sessions list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinableGame {
    pub name: String,
    pub id: Uuid,
}

/// Registry of live sessions. Each slot synchronizes itself, so operations
/// on different sessions never contend.
#[derive(Default)]
pub struct SessionRegistry {
    slots: DashMap<Uuid, Arc<GameSlot>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an active single-player session
    pub fn create_single(&self, player_id: Uuid) -> Uuid {
        let session_id = Uuid::new_v4();
        let slot = GameSlot::new(
            session_id,
            GameMode::Single,
            session_id.to_string(),
            player_id,
        );
        self.slots.insert(session_id, Arc::new(slot));

        info!(session_id = %session_id, player_id = %player_id, "Single session created");
        session_id
    }

    /// Create a two-player session that waits for a second player
    pub fn create_double(&self, player_id: Uuid, name: impl Into<String>) -> Uuid {
        let session_id = Uuid::new_v4();
        let name = name.into();
        let slot = GameSlot::new(session_id, GameMode::Double, name.clone(), player_id);
        self.slots.insert(session_id, Arc::new(slot));

        info!(session_id = %session_id, player_id = %player_id, name = %name, "Double session created");
        session_id
    }

    /// Admit `player_id` into an existing session. False if the session is
    /// missing, already holds two players, or already holds this player.
    pub fn join(&self, player_id: Uuid, session_id: Uuid) -> bool {
        let Some(slot) = self.get_slot(session_id) else {
            debug!(session_id = %session_id, "Join for unknown session");
            return false;
        };

        let joined = slot.admit(player_id);
        if joined {
            info!(session_id = %session_id, player_id = %player_id, "Player joined session");
        } else {
            debug!(session_id = %session_id, player_id = %player_id, "Join refused");
        }
        joined
    }

    /// Double-mode sessions with room left, optionally filtered by a
    /// substring of their name
    pub fn list_joinable(&self, filter: Option<&str>) -> Vec<JoinableGame> {
        let slots: Vec<Arc<GameSlot>> = self.slots.iter().map(|e| e.value().clone()).collect();

        slots
            .into_iter()
            .filter(|slot| slot.mode == GameMode::Double)
            .filter(|slot| filter.map_or(true, |f| slot.name.contains(f)))
            .filter(|slot| slot.player_count() < MAX_PLAYERS_PER_SLOT)
            .map(|slot| JoinableGame {
                name: slot.name.clone(),
                id: slot.id,
            })
            .collect()
    }

    /// Start the session's tick loop if none runs. False for an unknown session.
    pub fn start_loop(&self, session_id: Uuid) -> bool {
        match self.get_slot(session_id) {
            Some(slot) => {
                slot.start_loop();
                true
            }
            None => false,
        }
    }

    /// Reset the session to a fresh match and restart its loop
    pub fn restart(&self, player_id: Uuid, session_id: Uuid) -> bool {
        self.get_slot(session_id)
            .is_some_and(|slot| slot.restart(player_id))
    }

    /// Stop the session's loop and forget it. Unknown ids are a no-op.
    pub fn clear(&self, session_id: Uuid) {
        if let Some((_, slot)) = self.slots.remove(&session_id) {
            slot.close();
            info!(session_id = %session_id, "Session cleared");
        }
    }

    pub fn get_slot(&self, session_id: Uuid) -> Option<Arc<GameSlot>> {
        self.slots.get(&session_id).map(|e| e.value().clone())
    }

    pub fn active_sessions(&self) -> usize {
        self.slots.len()
    }

    pub fn is_loop_running(&self, session_id: Uuid) -> bool {
        self.get_slot(session_id)
            .is_some_and(|slot| slot.is_loop_running())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_single_is_active() {
        let registry = SessionRegistry::new();
        let player = Uuid::new_v4();
        let session = registry.create_single(player);

        let slot = registry.get_slot(session).expect("slot exists");
        assert_eq!(slot.mode, GameMode::Single);
        assert_eq!(slot.name, session.to_string());
        assert_eq!(slot.players(), vec![player]);
        slot.with_state(|s| {
            assert!(s.is_game_active());
            assert!(!s.is_game_over());
            assert_eq!(s.score(), 0);
            assert_eq!(s.player_count(), 1);
        });
        assert!(!registry.is_loop_running(session));
    }

    #[test]
    fn test_create_double_waits() {
        let registry = SessionRegistry::new();
        let session = registry.create_double(Uuid::new_v4(), "lobby");

        let slot = registry.get_slot(session).expect("slot exists");
        assert_eq!(slot.name, "lobby");
        assert!(!slot.with_state(|s| s.is_game_active()));
    }

    #[test]
    fn test_join_activates_double() {
        let registry = SessionRegistry::new();
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let session = registry.create_double(host, "lobby");

        assert!(registry.join(guest, session));
        let slot = registry.get_slot(session).expect("slot exists");
        assert_eq!(slot.players(), vec![host, guest]);
        slot.with_state(|s| {
            assert!(s.is_game_active());
            assert_eq!(s.player_count(), 2);
        });
    }

    #[test]
    fn test_join_unknown_or_full() {
        let registry = SessionRegistry::new();
        assert!(!registry.join(Uuid::new_v4(), Uuid::new_v4()));

        let session = registry.create_double(Uuid::new_v4(), "lobby");
        assert!(registry.join(Uuid::new_v4(), session));
        assert!(!registry.join(Uuid::new_v4(), session));
        assert_eq!(registry.get_slot(session).map(|s| s.player_count()), Some(2));
    }

    #[test]
    fn test_self_join_is_refused() {
        let registry = SessionRegistry::new();
        let host = Uuid::new_v4();
        let session = registry.create_double(host, "solo tabs");

        assert!(!registry.join(host, session));
        let slot = registry.get_slot(session).expect("slot exists");
        assert_eq!(slot.players(), vec![host]);
        assert!(!slot.with_state(|s| s.is_game_active()));
        assert_eq!(registry.list_joinable(None).len(), 1);
    }

    #[tokio::test]
    async fn test_restart_after_clear_spawns_nothing() {
        let registry = SessionRegistry::new();
        let host = Uuid::new_v4();
        let session = registry.create_single(host);
        registry.start_loop(session);

        // A restart racing a clear still holds the slot it looked up
        let slot = registry.get_slot(session).expect("slot exists");
        registry.clear(session);

        assert!(!slot.restart(host));
        assert!(!slot.is_loop_running());
        assert!(!registry.restart(host, session));
    }

    #[test]
    fn test_join_single_with_room() {
        let registry = SessionRegistry::new();
        let session = registry.create_single(Uuid::new_v4());
        assert!(registry.join(Uuid::new_v4(), session));
        assert!(!registry.join(Uuid::new_v4(), session));
    }

    #[test]
    fn test_list_joinable() {
        let registry = SessionRegistry::new();
        registry.create_single(Uuid::new_v4());
        let open = registry.create_double(Uuid::new_v4(), "alpha room");
        let other = registry.create_double(Uuid::new_v4(), "beta room");
        let full = registry.create_double(Uuid::new_v4(), "alpha full");
        registry.join(Uuid::new_v4(), full);

        let mut all = registry.list_joinable(None);
        all.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            all,
            vec![
                JoinableGame {
                    name: "alpha room".to_string(),
                    id: open
                },
                JoinableGame {
                    name: "beta room".to_string(),
                    id: other
                },
            ]
        );

        let filtered = registry.list_joinable(Some("alpha"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, open);

        assert!(registry.list_joinable(Some("gamma")).is_empty());
    }

    #[test]
    fn test_clear() {
        let registry = SessionRegistry::new();
        let session = registry.create_single(Uuid::new_v4());
        assert_eq!(registry.active_sessions(), 1);

        registry.clear(session);
        assert!(registry.get_slot(session).is_none());
        assert_eq!(registry.active_sessions(), 0);

        registry.clear(session);
        registry.clear(Uuid::new_v4());
        assert_eq!(registry.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_start_loop_and_clear_stops_it() {
        let registry = SessionRegistry::new();
        let session = registry.create_single(Uuid::new_v4());
        assert!(!registry.start_loop(Uuid::new_v4()));

        assert!(registry.start_loop(session));
        assert!(registry.start_loop(session));
        assert!(registry.is_loop_running(session));

        let slot = registry.get_slot(session).expect("slot exists");
        registry.clear(session);
        assert!(!slot.is_loop_running());
        assert!(!registry.is_loop_running(session));
    }

    #[tokio::test]
    async fn test_restart_via_registry() {
        let registry = SessionRegistry::new();
        let player = Uuid::new_v4();
        let session = registry.create_single(player);

        assert!(!registry.restart(player, Uuid::new_v4()));
        assert!(!registry.restart(Uuid::new_v4(), session));
        assert!(registry.restart(player, session));
        assert!(registry.is_loop_running(session));
        registry.clear(session);
    }

    #[tokio::test]
    async fn test_concurrent_joins_admit_one() {
        let registry = Arc::new(SessionRegistry::new());
        let session = registry.create_double(Uuid::new_v4(), "race");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.join(Uuid::new_v4(), session) })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.expect("join task") {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(registry.get_slot(session).map(|s| s.player_count()), Some(2));
    }
}
