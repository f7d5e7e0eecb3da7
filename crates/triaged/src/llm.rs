//! LLM collaborator client.
//!
//! Talks to an Ollama-compatible generate API: one free-text prompt and
//! a sampling temperature in, free text out. Everything returned is
//! treated as untrusted prose; structured parsing happens in
//! [`crate::extract`].

use crate::config::LlmConfig;
use anyhow::{anyhow, Result};
use std::time::Duration;
use tracing::debug;

/// Handle to the text-generation service.
#[derive(Debug, Clone)]
pub struct LlmClient {
    base_url: String,
    model: String,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Liveness probe against the backend.
    pub async fn is_available(&self) -> bool {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
        {
            Ok(c) => c,
            Err(_) => return false,
        };

        client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Send one prompt and return the raw completion text.
    pub async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": { "temperature": temperature }
        });

        debug!(
            "LLM call: model={} temp={} prompt_chars={}",
            self.model,
            temperature,
            prompt.len()
        );

        let response = client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("LLM request failed: {}", response.status()));
        }

        let json: serde_json::Value = response.json().await?;
        let text = json
            .get("response")
            .and_then(|r| r.as_str())
            .unwrap_or("")
            .to_string();

        Ok(text)
    }
}
