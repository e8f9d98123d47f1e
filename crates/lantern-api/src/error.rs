//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use lantern_core::error::SessionError;

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

/// HTTP-layer error wrapper around façade failures.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A prior handler panicked while holding the session lock.
    #[error("session lock poisoned")]
    LockPoisoned,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Session(SessionError::StoryNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Session(SessionError::NoActiveSession) => StatusCode::BAD_REQUEST,
            ApiError::Session(SessionError::Engine(_)) | ApiError::LockPoisoned => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use axum::http::StatusCode;
    use lantern_core::error::{EngineError, SessionError};

    fn status_of(err: SessionError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_story_not_found_maps_to_404() {
        assert_eq!(
            status_of(SessionError::StoryNotFound(PathBuf::from("games/x.z5"))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_no_active_session_maps_to_400() {
        assert_eq!(
            status_of(SessionError::NoActiveSession),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_engine_failure_maps_to_500() {
        assert_eq!(
            status_of(SessionError::Engine(EngineError::Terminated)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_lock_poisoned_maps_to_500() {
        assert_eq!(
            ApiError::LockPoisoned.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
