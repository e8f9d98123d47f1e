//! Domain error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by an interpreter engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine process or binding failed at the I/O level.
    #[error("interpreter I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine produced output the bridge could not make sense of.
    #[error("malformed interpreter output: {0}")]
    Protocol(String),

    /// A state blob could not be decoded or installed.
    #[error("invalid snapshot: {0}")]
    Snapshot(String),

    /// The backing interpreter cannot answer this query.
    ///
    /// World-model getters hit this on backends that only expose a
    /// dumb-terminal interface; the façade maps it to an empty view.
    #[error("query not supported by this interpreter backend")]
    Unsupported,

    /// The interpreter process has exited and cannot be used further.
    #[error("interpreter process has terminated")]
    Terminated,
}

/// Errors surfaced by the session façade.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The requested story file does not exist.
    #[error("Game not found: {}", .0.display())]
    StoryNotFound(PathBuf),

    /// An operation requiring an active session was invoked before start.
    #[error("No game running")]
    NoActiveSession,

    /// The underlying engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
