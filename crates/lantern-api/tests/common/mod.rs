//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use lantern_core::engine::EngineProvider;
use lantern_test_support::ScriptedProvider;
use tower::ServiceExt;

use lantern_api::routes;
use lantern_api::state::AppState;

/// Creates a games directory containing the given story stems as `.z5` files.
pub fn games_dir_with(stories: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for story in stories {
        fs::write(dir.path().join(format!("{story}.z5")), b"\x05fake story").unwrap();
    }
    dir
}

/// Build the full app router over a scripted engine backend. Uses the same
/// route structure as `main.rs`.
pub fn build_test_app(games_dir: &Path) -> Router {
    build_test_app_with_provider(games_dir, Arc::new(ScriptedProvider))
}

/// Build the full app router with a custom engine provider, for tests that
/// need failing or refusing backends.
pub fn build_test_app_with_provider(
    games_dir: &Path,
    provider: Arc<dyn EngineProvider>,
) -> Router {
    let app_state = AppState::new(games_dir.to_path_buf(), provider);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::game::router())
        .with_state(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with no body and return the response.
pub async fn post_empty(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
