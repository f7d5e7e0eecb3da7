//! Wire types for the triaged HTTP API.
//!
//! Failures are always a same-shape JSON body (`{"error": ...}`) with
//! HTTP 200, never a crash or a bare non-200.

use crate::hypothesis::Hypothesis;
use crate::session::RiskLevel;
use serde::{Deserialize, Serialize};

/// `POST /start` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRequest {
    pub message: String,
}

/// `POST /answer` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub session_id: String,
    pub selected_option: String,
}

/// Successful `POST /start` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartResponse {
    pub session_id: String,
    pub issue_summary: String,
    pub risk_level: RiskLevel,
    pub question: String,
    pub options: Vec<String>,
    pub why_asking: String,
    pub question_number: u32,
}

/// Successful `POST /answer` payload: either the next question or the
/// final narrative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnswerResponse {
    Continue {
        confidence: f64,
        question: String,
        options: Vec<String>,
        why_asking: String,
        question_number: u32,
        top_hypothesis: String,
    },
    Completed {
        confidence: f64,
        final_response: String,
    },
}

/// Tagged error body shared by all endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Success-or-error wrapper; serializes flat so callers see either the
/// payload fields or `{"error": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResult<T> {
    Ok(T),
    Err(ErrorResponse),
}

/// `GET /health` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub active_sessions: usize,
}

/// `POST /debug/session/:id` payload - raw session introspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugSessionResponse {
    pub main_issue: String,
    pub hypotheses: Vec<Hypothesis>,
    pub answers_count: u32,
    pub risk_level: RiskLevel,
}
