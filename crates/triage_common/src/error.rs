//! Error types for Triage.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Daemon not running. Start triaged and retry.")]
    DaemonNotRunning,

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("invalid_json: {0}")]
    InvalidJson(String),

    #[error("Invalid session")]
    SessionNotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TriageError {
    pub fn code(&self) -> i32 {
        match self {
            TriageError::DaemonNotRunning => -32000,
            TriageError::Llm(_) => -32001,
            TriageError::InvalidJson(_) => -32700,
            TriageError::SessionNotFound(_) => -32002,
            TriageError::Config(_) => -32003,
            TriageError::Io(_) => -32004,
            TriageError::Json(_) => -32005,
            TriageError::Internal(_) => -32603,
        }
    }
}
