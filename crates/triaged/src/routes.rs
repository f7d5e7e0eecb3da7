//! API routes for triaged.
//!
//! Every endpoint answers HTTP 200 with either the success payload or a
//! same-shape `{"error": ...}` body - domain failures never surface as
//! bare status codes.

use crate::server::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info};
use triage_common::{
    AnswerRequest, AnswerResponse, ApiResult, DebugSessionResponse, ErrorResponse, HealthResponse,
    StartRequest, StartResponse, TriageError,
};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Diagnostic Routes
// ============================================================================

pub fn diagnostic_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/start", post(start_session))
        .route("/answer", post(answer_question))
}

async fn start_session(
    State(state): State<AppStateArc>,
    Json(req): Json<StartRequest>,
) -> Json<ApiResult<StartResponse>> {
    info!("New session requested");

    match state.engine.start(&req.message).await {
        Ok(response) => Json(ApiResult::Ok(response)),
        Err(e) => {
            // Intake failures are surfaced as a generic message; the
            // detail stays in the log.
            error!("Start failed: {}", e);
            Json(ApiResult::Err(ErrorResponse::new(
                "Failed to process your enquiry",
            )))
        }
    }
}

async fn answer_question(
    State(state): State<AppStateArc>,
    Json(req): Json<AnswerRequest>,
) -> Json<ApiResult<AnswerResponse>> {
    match state.engine.answer(&req.session_id, &req.selected_option).await {
        Ok(response) => Json(ApiResult::Ok(response)),
        Err(TriageError::SessionNotFound(_)) => {
            Json(ApiResult::Err(ErrorResponse::new("Invalid session")))
        }
        Err(e) => {
            error!("Answer failed: {}", e);
            Json(ApiResult::Err(ErrorResponse::new(e.to_string())))
        }
    }
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        active_sessions: state.engine.store().active_count().await,
    })
}

// ============================================================================
// Debug Routes
// ============================================================================

pub fn debug_routes() -> Router<AppStateArc> {
    Router::new().route("/debug/session/:session_id", post(debug_session))
}

/// Raw session introspection by id.
async fn debug_session(
    State(state): State<AppStateArc>,
    Path(session_id): Path<String>,
) -> Json<ApiResult<DebugSessionResponse>> {
    match state.engine.store().get(&session_id).await {
        Some(session) => Json(ApiResult::Ok(DebugSessionResponse {
            main_issue: session.main_issue,
            hypotheses: session.hypotheses.iter().cloned().collect(),
            answers_count: session.answer_count,
            risk_level: session.risk_level,
        })),
        None => Json(ApiResult::Err(ErrorResponse::new("Session not found"))),
    }
}
