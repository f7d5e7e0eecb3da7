//! Configuration management for triaged.
//!
//! Loads settings from /etc/triage/config.toml or uses defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/triage/config.toml";

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP API
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:7870".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// LLM collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the Ollama-compatible generate API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for every collaborator call
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Sampling temperature for intake (low: structured output)
    #[serde(default = "default_intake_temperature")]
    pub intake_temperature: f32,

    /// Sampling temperature for question generation (high: natural,
    /// varied questions)
    #[serde(default = "default_question_temperature")]
    pub question_temperature: f32,

    /// Sampling temperature for hypothesis updates
    #[serde(default = "default_update_temperature")]
    pub update_temperature: f32,

    /// Sampling temperature for confidence evaluation
    #[serde(default = "default_confidence_temperature")]
    pub confidence_temperature: f32,

    /// Sampling temperature for the final narrative (very low: stable
    /// format)
    #[serde(default = "default_final_temperature")]
    pub final_temperature: f32,
}

fn default_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_model() -> String {
    "llama3.1:8b-instruct-q4_K_M".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_intake_temperature() -> f32 {
    0.3
}

fn default_question_temperature() -> f32 {
    0.7
}

fn default_update_temperature() -> f32 {
    0.2
}

fn default_confidence_temperature() -> f32 {
    0.2
}

fn default_final_temperature() -> f32 {
    0.15
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            intake_temperature: default_intake_temperature(),
            question_temperature: default_question_temperature(),
            update_temperature: default_update_temperature(),
            confidence_temperature: default_confidence_temperature(),
            final_temperature: default_final_temperature(),
        }
    }
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sessions idle longer than this are removed by the sweep
    #[serde(default = "default_idle_ttl")]
    pub idle_ttl_secs: u64,

    /// How often the sweep runs
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_idle_ttl() -> u64 {
    1800
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: default_idle_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// Top-level daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriageConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub sessions: SessionConfig,
}

impl TriageConfig {
    /// Load from the default path, falling back to defaults when the
    /// file is absent or unreadable.
    pub fn load() -> Self {
        Self::load_from(CONFIG_PATH)
    }

    /// Load from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::try_load(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to load {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = TriageConfig::load_from("/nonexistent/triage/config.toml");
        assert_eq!(config.server.bind_addr, "127.0.0.1:7870");
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.sessions.idle_ttl_secs, 1800);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: TriageConfig = toml::from_str(
            r#"
            [llm]
            model = "qwen2.5:7b-instruct"
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.model, "qwen2.5:7b-instruct");
        assert_eq!(config.llm.base_url, "http://127.0.0.1:11434");
        assert_eq!(config.server.bind_addr, "127.0.0.1:7870");
    }

    #[test]
    fn test_temperatures_per_call() {
        let config = LlmConfig::default();
        assert!(config.question_temperature > config.intake_temperature);
        assert!(config.final_temperature < config.update_temperature);
    }
}
