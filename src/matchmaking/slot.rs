//! Match slot: one match, its admitted players, subscribers and tick loop

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::game::{GameMode, MatchState, SnapshotBuilder};
use crate::util::time::{DeltaClock, TICK_INTERVAL};
use crate::ws::protocol::GameSnapshot;

/// Players a slot admits at most
pub const MAX_PLAYERS_PER_SLOT: usize = 2;
/// Frames a slow subscriber may fall behind before it starts skipping
const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

/// Handle to a running tick loop
struct TickLoopHandle {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl TickLoopHandle {
    fn is_running(&self) -> bool {
        !self.cancelled.load(Ordering::Acquire) && !self.task.is_finished()
    }

    /// Flag first so an iteration already past its timer bails out, then
    /// abort to cancel the pending timer.
    fn stop(self) {
        self.cancelled.store(true, Ordering::Release);
        self.task.abort();
    }
}

/// Mutable interior, guarded by the slot mutex
struct SlotInner {
    state: MatchState,
    /// Admission order, at most `MAX_PLAYERS_PER_SLOT`
    players: Vec<Uuid>,
    tick_loop: Option<TickLoopHandle>,
    /// Set once the slot leaves the registry; no loop may start after that
    closed: bool,
}

/// One match instance
pub struct GameSlot {
    pub id: Uuid,
    pub mode: GameMode,
    /// Name shown in the joinable list
    pub name: String,
    snapshot_tx: broadcast::Sender<String>,
    inner: Mutex<SlotInner>,
}

impl GameSlot {
    pub fn new(id: Uuid, mode: GameMode, name: String, host: Uuid) -> Self {
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);

        Self {
            id,
            mode,
            name,
            snapshot_tx,
            inner: Mutex::new(SlotInner {
                state: MatchState::new(host, mode),
                players: vec![host],
                tick_loop: None,
                closed: false,
            }),
        }
    }

    /// Attach a connection: it receives every snapshot serialized from now on
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.snapshot_tx.subscribe()
    }

    /// Run `f` inside the slot's critical section
    pub fn with_state<R>(&self, f: impl FnOnce(&mut MatchState) -> R) -> R {
        f(&mut self.inner.lock().state)
    }

    pub fn players(&self) -> Vec<Uuid> {
        self.inner.lock().players.clone()
    }

    pub fn player_count(&self) -> usize {
        self.inner.lock().players.len()
    }

    /// Admit a player into both the admitted list and the match, atomically.
    /// An already admitted player is refused, keeping the list and the seats
    /// in step.
    pub fn admit(&self, player_id: Uuid) -> bool {
        let mut inner = self.inner.lock();
        if inner.players.len() >= MAX_PLAYERS_PER_SLOT || inner.players.contains(&player_id) {
            return false;
        }

        inner.players.push(player_id);
        inner.state.add_player(player_id);
        true
    }

    pub fn is_loop_running(&self) -> bool {
        self.inner
            .lock()
            .tick_loop
            .as_ref()
            .is_some_and(TickLoopHandle::is_running)
    }

    /// Start the tick loop unless one is already running or the slot is closed
    pub fn start_loop(self: &Arc<Self>) {
        let mut inner = self.inner.lock();
        if inner.closed || inner.tick_loop.as_ref().is_some_and(TickLoopHandle::is_running) {
            return;
        }
        inner.tick_loop = Some(self.spawn_loop());
    }

    /// Stop the loop for good. Later starts and restarts are refused.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        if let Some(handle) = inner.tick_loop.take() {
            handle.stop();
        }
        debug!(session_id = %self.id, "Slot closed");
    }

    /// Replace the match with a fresh one and restart the loop.
    ///
    /// Returns false when `player_id` is not admitted to this slot or the
    /// slot is closed.
    pub fn restart(self: &Arc<Self>, player_id: Uuid) -> bool {
        let mut inner = self.inner.lock();
        if inner.closed {
            debug!(session_id = %self.id, player_id = %player_id, "Restart on closed slot");
            return false;
        }
        if !inner.players.contains(&player_id) {
            warn!(session_id = %self.id, player_id = %player_id, "Restart from unknown player");
            return false;
        }

        if let Some(handle) = inner.tick_loop.take() {
            handle.stop();
        }

        let mut state = MatchState::new(inner.players[0], self.mode);
        for &other in &inner.players[1..] {
            state.add_player(other);
        }
        inner.state = state;
        inner.tick_loop = Some(self.spawn_loop());

        info!(session_id = %self.id, player_id = %player_id, "Match restarted");
        true
    }

    fn spawn_loop(self: &Arc<Self>) -> TickLoopHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(run_tick_loop(self.clone(), cancelled.clone()));
        TickLoopHandle { cancelled, task }
    }

    /// One iteration of simulation work. `None` once the loop was cancelled.
    fn advance(&self, delta_ms: f64, cancelled: &AtomicBool) -> Option<GameSnapshot> {
        let mut inner = self.inner.lock();
        if cancelled.load(Ordering::Acquire) {
            return None;
        }

        inner.state.tick(delta_ms);
        let snapshot = SnapshotBuilder::build(&inner.state);
        inner.state.clear_out_of_bounds();
        Some(snapshot)
    }
}

/// Fixed-cadence loop feeding measured wall time into the match
async fn run_tick_loop(slot: Arc<GameSlot>, cancelled: Arc<AtomicBool>) {
    info!(session_id = %slot.id, "Tick loop started");

    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut clock = DeltaClock::started();

    loop {
        ticker.tick().await;
        if cancelled.load(Ordering::Acquire) {
            break;
        }

        let delta_ms = clock.lap_ms();
        let Some(snapshot) = slot.advance(delta_ms, &cancelled) else {
            break;
        };

        match serde_json::to_string(&snapshot) {
            // Err only means nobody is attached right now
            Ok(json) => {
                let _ = slot.snapshot_tx.send(json);
            }
            Err(e) => {
                warn!(session_id = %slot.id, error = %e, "Failed to serialize snapshot");
            }
        }
    }

    debug!(session_id = %slot.id, "Tick loop exited");
}
