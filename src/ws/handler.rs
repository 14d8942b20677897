//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, HeaderMap},
    response::Response,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::matchmaking::{GameSlot, SessionRegistry};
use crate::util::cookies::{extract_cookies, GAME_COOKIE, USER_COOKIE};
use crate::util::time::DeltaClock;
use crate::ws::protocol::ClientMsg;

/// Player and session a connection is bound to, read from its cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SessionBinding {
    player_id: Uuid,
    session_id: Uuid,
}

impl SessionBinding {
    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let raw = headers.get(header::COOKIE)?.to_str().ok()?;
        let cookies = extract_cookies(raw);

        Some(Self {
            player_id: cookies.get(USER_COOKIE)?.parse().ok()?,
            session_id: cookies.get(GAME_COOKIE)?.parse().ok()?,
        })
    }
}

/// WebSocket upgrade handler. The upgrade always succeeds; a connection
/// without a usable session binding stays open but inert.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Response {
    let binding = SessionBinding::from_headers(&headers);
    ws.on_upgrade(move |socket| handle_socket(socket, binding, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, binding: Option<SessionBinding>, state: AppState) {
    let Some(binding) = binding else {
        debug!("WebSocket connection without session cookies, ignoring its messages");
        drain_inert(socket).await;
        return;
    };

    let Some(slot) = state.registry.get_slot(binding.session_id) else {
        debug!(session_id = %binding.session_id, "WebSocket connection for unknown session");
        drain_inert(socket).await;
        return;
    };

    info!(
        session_id = %binding.session_id,
        player_id = %binding.player_id,
        "WebSocket connection bound"
    );

    // Subscribe before the loop starts so the first frame is not missed
    let snapshot_rx = slot.subscribe();
    state.registry.start_loop(binding.session_id);

    let (ws_sink, ws_stream) = socket.split();
    run_session(binding, &state.registry, slot, ws_sink, ws_stream, snapshot_rx).await;

    // Any bound connection closing ends its session
    state.registry.clear(binding.session_id);

    info!(
        session_id = %binding.session_id,
        player_id = %binding.player_id,
        "WebSocket connection closed"
    );
}

/// Run the WebSocket session with read/write split
async fn run_session(
    binding: SessionBinding,
    registry: &SessionRegistry,
    slot: Arc<GameSlot>,
    mut ws_sink: SplitSink<WebSocket, Message>,
    mut ws_stream: SplitStream<WebSocket>,
    mut snapshot_rx: broadcast::Receiver<String>,
) {
    let player_id = binding.player_id;

    // Spawn writer task: slot snapshots -> WebSocket
    let writer_handle = tokio::spawn(async move {
        loop {
            match snapshot_rx.recv().await {
                Ok(json) => {
                    if let Err(e) = ws_sink.send(Message::Text(json)).await {
                        debug!(player_id = %player_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(
                        player_id = %player_id,
                        lagged_count = n,
                        "Client lagged, skipping {} snapshots", n
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(player_id = %player_id, "Snapshot channel closed");
                    break;
                }
            }
        }
    });

    // Reader loop: WebSocket -> match state
    let mut clock = DeltaClock::unstarted();
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let delta_ms = clock.lap_ms();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(msg) => apply_client_msg(registry, &slot, player_id, msg, delta_ms),
                    Err(e) => {
                        warn!(player_id = %player_id, error = %e, "Failed to parse client message");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(player_id = %player_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                debug!(player_id = %player_id, "Received ping/pong");
            }
            Ok(Message::Close(_)) => {
                info!(player_id = %player_id, "Client initiated close");
                break;
            }
            Err(e) => {
                error!(player_id = %player_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    writer_handle.abort();
}

/// Apply one inbound message to the slot's match.
///
/// A restart request replaces the match and nothing else in the message is
/// applied. Otherwise movement, aim and trigger are applied in that order.
fn apply_client_msg(
    registry: &SessionRegistry,
    slot: &GameSlot,
    player_id: Uuid,
    msg: ClientMsg,
    delta_ms: f64,
) {
    if msg.is_restart() {
        registry.restart(player_id, slot.id);
        return;
    }

    slot.with_state(|state| {
        if let Some(movement) = msg.player_movement {
            state.move_player(player_id, movement.into(), delta_ms);
        }
        if let Some(target) = msg.target_position {
            state.set_aim_target(player_id, target.into());
        }
        state.set_shooting(player_id, msg.trigger_held(), delta_ms);
    });
}

/// Read until the peer goes away, acting on nothing
async fn drain_inert(mut socket: WebSocket) {
    while let Some(result) = socket.recv().await {
        match result {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => debug!("Ignoring message on inert connection"),
        }
    }
}
