//! HTTP route definitions

use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::matchmaking::JoinableGame;
use crate::store::{LeaderboardEntry, StoreError, LEADERBOARD_PAGE_SIZE};
use crate::util::cookies::{GAME_COOKIE, USER_COOKIE};
use crate::util::time::uptime_secs;
use crate::ws::handler::ws_handler;

/// Lifetime of the session cookies
const SESSION_COOKIE_HOURS: i64 = 24;

const GAME_CREATED: &str = "Game created successfully";
const GAME_SAVED: &str = "Game saved successfully";
const JOIN_FAILED: &str = "Game not found or is full";

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.allowed_origins())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let game_routes = Router::new()
        .route("/", get(leaderboard_handler).post(save_score_handler))
        .route("/single", post(create_single_handler))
        .route(
            "/double",
            get(list_joinable_handler).post(create_double_handler),
        )
        .route("/join", post(join_handler));

    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .nest("/api/game", game_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    active_sessions: usize,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        active_sessions: state.registry.active_sessions(),
    })
}

// ============================================================================
// Leaderboard endpoints
// ============================================================================

#[derive(Deserialize)]
struct SaveScoreRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    score: u64,
}

#[derive(Serialize)]
struct SaveScoreResponse {
    message: &'static str,
    rank: usize,
}

async fn save_score_handler(
    State(state): State<AppState>,
    Json(req): Json<SaveScoreRequest>,
) -> Result<Json<SaveScoreResponse>, AppError> {
    let rank = state.leaderboard.submit(&req.name, req.score)?;
    info!(score = req.score, rank, "Score saved");

    Ok(Json(SaveScoreResponse {
        message: GAME_SAVED,
        rank,
    }))
}

async fn leaderboard_handler(State(state): State<AppState>) -> Json<Vec<LeaderboardEntry>> {
    Json(state.leaderboard.top(LEADERBOARD_PAGE_SIZE))
}

// ============================================================================
// Session endpoints
// ============================================================================

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDoubleRequest {
    #[serde(default)]
    game_name: String,
}

#[derive(Deserialize)]
struct JoinRequest {
    #[serde(rename = "gameID")]
    game_id: String,
}

#[derive(Deserialize)]
struct ListJoinableQuery {
    #[serde(rename = "gameID")]
    game_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListJoinableResponse {
    available_games: Vec<JoinableGame>,
}

async fn create_single_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let player_id = player_id_from(&jar);
    let session_id = state.registry.create_single(player_id);

    (
        with_session_cookies(jar, player_id, session_id),
        Json(MessageResponse {
            message: GAME_CREATED,
        }),
    )
}

async fn create_double_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<CreateDoubleRequest>,
) -> (CookieJar, Json<MessageResponse>) {
    let player_id = player_id_from(&jar);
    let session_id = state.registry.create_double(player_id, req.game_name);

    (
        with_session_cookies(jar, player_id, session_id),
        Json(MessageResponse {
            message: GAME_CREATED,
        }),
    )
}

async fn join_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<JoinRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let Ok(session_id) = req.game_id.parse::<Uuid>() else {
        warn!(game_id = %req.game_id, "Join with malformed session id");
        return Err(AppError::NotFound(JOIN_FAILED.to_string()));
    };

    // A second tab of the same browser joins as a separate player
    let mut player_id = player_id_from(&jar);
    let already_seated = state
        .registry
        .get_slot(session_id)
        .is_some_and(|slot| slot.players().contains(&player_id));
    if already_seated {
        player_id = Uuid::new_v4();
    }

    if !state.registry.join(player_id, session_id) {
        return Err(AppError::NotFound(JOIN_FAILED.to_string()));
    }

    Ok((
        with_session_cookies(jar, player_id, session_id),
        Json(MessageResponse {
            message: GAME_CREATED,
        }),
    ))
}

async fn list_joinable_handler(
    State(state): State<AppState>,
    Query(query): Query<ListJoinableQuery>,
) -> Json<ListJoinableResponse> {
    Json(ListJoinableResponse {
        available_games: state.registry.list_joinable(query.game_id.as_deref()),
    })
}

/// Reuse the caller's player id when its cookie holds one, else mint a new one
fn player_id_from(jar: &CookieJar) -> Uuid {
    jar.get(USER_COOKIE)
        .and_then(|c| c.value().parse().ok())
        .unwrap_or_else(Uuid::new_v4)
}

fn with_session_cookies(jar: CookieJar, player_id: Uuid, session_id: Uuid) -> CookieJar {
    jar.add(session_cookie(USER_COOKIE, player_id))
        .add(session_cookie(GAME_COOKIE, session_id))
}

fn session_cookie(name: &'static str, value: Uuid) -> Cookie<'static> {
    Cookie::build((name, value.to_string()))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::hours(SESSION_COOKIE_HOURS))
        .build()
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::MissingName => AppError::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = serde_json::json!({
            "message": message
        });

        (status, Json(body)).into_response()
    }
}
