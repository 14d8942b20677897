//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::matchmaking::SessionRegistry;
use crate::store::LeaderboardStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<SessionRegistry>,
    pub leaderboard: LeaderboardStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(SessionRegistry::new()),
            leaderboard: LeaderboardStore::new(),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    AppState::new(Config {
        server_addr: "127.0.0.1:0".parse().expect("valid address"),
        log_level: "debug".to_string(),
        client_origin: "http://localhost:3000".to_string(),
    })
}
