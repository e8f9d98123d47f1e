//! Shared application state.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use lantern_core::engine::EngineProvider;
use lantern_session::GameSession;

use crate::error::ApiError;

/// Application state shared across all request handlers.
///
/// The session mutex is the single critical section guarding the one
/// interpreter instance: the engine is not safe for concurrent mutation, and
/// a start unconditionally discards the prior instance. Handlers never await
/// while holding the guard.
#[derive(Clone)]
pub struct AppState {
    /// Directory holding installed `<name>.z5` story files.
    pub games_dir: PathBuf,
    /// Backend used to construct interpreter engines.
    pub provider: Arc<dyn EngineProvider>,
    /// The at-most-one active game session.
    session: Arc<Mutex<Option<GameSession>>>,
}

impl AppState {
    /// Create new application state with no active session.
    #[must_use]
    pub fn new(games_dir: PathBuf, provider: Arc<dyn EngineProvider>) -> Self {
        Self {
            games_dir,
            provider,
            session: Arc::new(Mutex::new(None)),
        }
    }

    /// Locks the session slot for the duration of one operation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::LockPoisoned`] if a previous handler panicked
    /// while holding the lock.
    pub fn lock_session(&self) -> Result<MutexGuard<'_, Option<GameSession>>, ApiError> {
        self.session.lock().map_err(|_| ApiError::LockPoisoned)
    }
}
