//! Lantern API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use lantern_frotz::FrotzProvider;

use lantern_api::routes;
use lantern_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Lantern bridge server");

    // Read configuration from environment.
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "5001".to_string())
        .parse()
        .map_err(|e| format!("PORT must be a valid u16: {e}"))?;
    let games_dir =
        PathBuf::from(std::env::var("GAMES_DIR").unwrap_or_else(|_| "games".to_string()));

    // Build application state around the interpreter backend.
    let provider = Arc::new(FrotzProvider::from_env());
    let app_state = AppState::new(games_dir, provider);

    // Build router.
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::game::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| format!("invalid HOST:PORT combination: {e}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
