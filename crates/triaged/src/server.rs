//! HTTP server for triaged

use crate::config::TriageConfig;
use crate::engine::Engine;
use crate::routes;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub engine: Engine,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
        }
    }
}

/// Run the HTTP server
pub async fn run(config: &TriageConfig, state: AppState) -> Result<()> {
    // Idle sessions are reaped in the background.
    state.engine.store().clone().spawn_sweeper(
        Duration::from_secs(config.sessions.idle_ttl_secs),
        Duration::from_secs(config.sessions.sweep_interval_secs),
    );

    let state = Arc::new(state);

    let app = Router::new()
        .merge(routes::diagnostic_routes())
        .merge(routes::health_routes())
        .merge(routes::debug_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The browser frontend is served from elsewhere; allow it.
        .layer(CorsLayer::permissive());

    let addr = &config.server.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
