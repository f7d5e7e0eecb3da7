//! HTTP client for the triage daemon.

use anyhow::{anyhow, Result};
use std::time::Duration;
use triage_common::{
    AnswerRequest, AnswerResponse, ApiResult, HealthResponse, StartRequest, StartResponse,
};

pub struct DaemonClient {
    base_url: String,
    client: reqwest::Client,
}

impl DaemonClient {
    pub fn new(base_url: &str) -> Result<Self> {
        // Long timeout: every request rides one or more LLM round-trips.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub async fn start(&self, message: &str) -> Result<StartResponse> {
        let response: ApiResult<StartResponse> = self
            .client
            .post(format!("{}/start", self.base_url))
            .json(&StartRequest {
                message: message.to_string(),
            })
            .send()
            .await?
            .json()
            .await?;

        match response {
            ApiResult::Ok(start) => Ok(start),
            ApiResult::Err(e) => Err(anyhow!(e.error)),
        }
    }

    pub async fn answer(&self, session_id: &str, selected_option: &str) -> Result<AnswerResponse> {
        let response: ApiResult<AnswerResponse> = self
            .client
            .post(format!("{}/answer", self.base_url))
            .json(&AnswerRequest {
                session_id: session_id.to_string(),
                selected_option: selected_option.to_string(),
            })
            .send()
            .await?
            .json()
            .await?;

        match response {
            ApiResult::Ok(answer) => Ok(answer),
            ApiResult::Err(e) => Err(anyhow!(e.error)),
        }
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(response.json().await?)
    }
}
