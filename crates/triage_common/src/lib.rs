//! Shared types for Triage - the conversational diagnostic assistant.
//!
//! Everything that crosses a crate boundary lives here: the hypothesis
//! model, session state, domain classification, stopping policy, wire
//! types for the HTTP API, and the error enum.

pub mod domain;
pub mod error;
pub mod hypothesis;
pub mod policy;
pub mod rpc;
pub mod session;

pub use domain::{classify, Domain};
pub use error::TriageError;
pub use hypothesis::{Hypothesis, HypothesisSet};
pub use policy::{policy_for, DomainPolicy, Verdict, MAX_ANSWERS, MIN_ANSWERS_BEFORE_STOP};
pub use rpc::{
    AnswerRequest, AnswerResponse, ApiResult, DebugSessionResponse, ErrorResponse,
    HealthResponse, StartRequest, StartResponse,
};
pub use session::{AnswerRecord, Intake, RiskLevel, Session};
