//! The four game operations: start, step, save, load.
//!
//! All four are mutually exclusive critical sections over the shared session
//! slot; each runs to completion synchronously while holding the lock.

use axum::body::Bytes;
use axum::extract::State;
use axum::{Json, Router, routing::post};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use lantern_core::error::SessionError;
use lantern_core::types::StepInfo;
use lantern_session::{DerivedViews, GameSession};

use crate::error::ApiError;
use crate::state::AppState;

/// Story started when the request names none.
const DEFAULT_GAME: &str = "zork1";
/// Command submitted when the request names none.
const DEFAULT_COMMAND: &str = "look";

/// Lenient body parsing: an absent or unparsable body behaves like `{}`.
fn parse_lenient<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

/// Request body for POST /start.
#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    /// Story name, resolved to `<games_dir>/<game>.z5`.
    pub game: Option<String>,
}

/// Request body for POST /step.
#[derive(Debug, Default, Deserialize)]
pub struct StepRequest {
    /// Command text fed to the interpreter.
    pub command: Option<String>,
}

/// Request body for POST /load.
#[derive(Debug, Deserialize)]
pub struct LoadRequest {
    /// Base64-encoded snapshot produced by POST /save.
    pub state: String,
}

/// Response body for POST /start.
#[derive(Debug, Serialize)]
pub struct StartResponse {
    /// Opening text of the game.
    pub observation: String,
    /// Interpreter-supplied metadata.
    pub info: StepInfo,
    /// Derived views of the fresh session.
    #[serde(flatten)]
    pub views: DerivedViews,
    /// Maximum achievable score for the story.
    pub max_score: i32,
}

/// Response body for POST /step.
#[derive(Debug, Serialize)]
pub struct StepResponse {
    /// Text the game printed in response to the command.
    pub observation: String,
    /// Score delta produced by the step.
    pub reward: i32,
    /// Whether the episode has terminated.
    pub done: bool,
    /// Interpreter-supplied metadata.
    pub info: StepInfo,
    /// Derived views after the step.
    #[serde(flatten)]
    pub views: DerivedViews,
}

/// Response body for POST /save.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    /// Base64-encoded opaque snapshot.
    pub state: String,
}

/// Response body for POST /load.
#[derive(Debug, Serialize)]
pub struct LoadResponse {
    /// Fixed confirmation message.
    pub observation: &'static str,
    /// Derived views after the restore.
    #[serde(flatten)]
    pub views: DerivedViews,
}

/// POST /start
///
/// Replaces any prior session with a fresh engine on the requested story.
/// A failed start leaves the prior session untouched.
#[instrument(skip(state, body))]
async fn start(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StartResponse>, ApiError> {
    let request: StartRequest = parse_lenient(&body);
    let game = request.game.unwrap_or_else(|| DEFAULT_GAME.to_string());

    let mut slot = state.lock_session()?;
    let (mut session, observation, info) =
        GameSession::start(state.provider.as_ref(), &state.games_dir, &game)?;
    let max_score = session.max_score()?;
    let views = session.views();
    *slot = Some(session);

    info!(game = %game, "game session started");

    Ok(Json(StartResponse {
        observation,
        info,
        views,
        max_score,
    }))
}

/// POST /step
#[instrument(skip(state, body))]
async fn step(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StepResponse>, ApiError> {
    let request: StepRequest = parse_lenient(&body);
    let command = request
        .command
        .unwrap_or_else(|| DEFAULT_COMMAND.to_string());

    let mut slot = state.lock_session()?;
    let session = slot.as_mut().ok_or(SessionError::NoActiveSession)?;
    let outcome = session.step(&command)?;
    let views = session.views();

    info!(command = %command, reward = outcome.reward, done = outcome.done, "command stepped");

    Ok(Json(StepResponse {
        observation: outcome.observation,
        reward: outcome.reward,
        done: outcome.done,
        info: outcome.info,
        views,
    }))
}

/// POST /save
#[instrument(skip(state))]
async fn save(State(state): State<AppState>) -> Result<Json<SaveResponse>, ApiError> {
    let mut slot = state.lock_session()?;
    let session = slot.as_mut().ok_or(SessionError::NoActiveSession)?;
    let encoded = session.save_state()?;

    info!(bytes = encoded.len(), "session state serialized");

    Ok(Json(SaveResponse { state: encoded }))
}

/// POST /load
///
/// Installs the snapshot into the *existing* session in place. Loading a
/// snapshot from a different story than the one running is unspecified.
#[instrument(skip(state, request))]
async fn load(
    State(state): State<AppState>,
    Json(request): Json<LoadRequest>,
) -> Result<Json<LoadResponse>, ApiError> {
    let mut slot = state.lock_session()?;
    let session = slot.as_mut().ok_or(SessionError::NoActiveSession)?;
    session.restore_state(&request.state)?;
    let views = session.views();

    info!("session state restored");

    Ok(Json(LoadResponse {
        observation: "State restored.",
        views,
    }))
}

/// Returns the router for the game operations.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start))
        .route("/step", post(step))
        .route("/save", post(save))
        .route("/load", post(load))
}
