//! Triage daemon library.
//!
//! The conversational diagnostic engine: intake a free-text problem
//! description, ask adaptive multiple-choice questions, maintain a
//! probability-weighted hypothesis set, and stop once the confidence
//! gate (plus hard turn bounds) permits a short diagnosis.

pub mod config;
pub mod engine;
pub mod extract;
pub mod gate;
pub mod llm;
pub mod postprocess;
pub mod prompts;
pub mod routes;
pub mod server;
pub mod sessions;
