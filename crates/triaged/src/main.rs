//! Triage Daemon - conversational diagnostic assistant
//!
//! Takes a free-text problem description, asks adaptive multiple-choice
//! questions, and commits to a short diagnosis once the confidence gate
//! allows it.

use anyhow::Result;
use tracing::{info, warn, Level};

use triaged::config::TriageConfig;
use triaged::engine::Engine;
use triaged::llm::LlmClient;
use triaged::server::{self, AppState};
use triaged::sessions::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Triage Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = TriageConfig::load();
    let llm = LlmClient::new(&config.llm);

    if llm.is_available().await {
        info!("LLM backend reachable, model: {}", llm.model());
    } else {
        warn!(
            "LLM backend at {} not reachable yet; requests will fail until it is",
            config.llm.base_url
        );
    }

    let store = SessionStore::new();
    let engine = Engine::new(llm, store, config.llm.clone());
    let state = AppState::new(engine);

    server::run(&config, state).await
}
