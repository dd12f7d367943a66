//! Ollama generator: local models via the Ollama HTTP API.
//!
//! Uses the non-streaming `POST /api/generate` endpoint and returns the
//! `response` field verbatim. Cleanup of the text is the safety gate's job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlgate_core::GeneratorConfig;
use sqlgate_runtime::TextGenerator;
use std::time::Duration;

/// Errors from the Ollama endpoint.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("ollama unavailable: {0}")]
    Unavailable(String),
    #[error("ollama returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected ollama response: {0}")]
    Parse(String),
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

pub struct OllamaGenerator {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaGenerator {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        })
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        Self::new(
            &config.base_url,
            &config.model,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    fn parse_body(body: &str) -> Result<String, GenerationError> {
        let parsed: GenerateResponse =
            serde_json::from_str(body).map_err(|e| GenerationError::Parse(e.to_string()))?;
        parsed
            .response
            .map(|s| s.trim().to_string())
            .ok_or_else(|| GenerationError::Parse("missing 'response' field".to_string()))
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let resp = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Self::parse_body(&body)
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Calling ollama");
        Ok(self.complete(prompt).await?)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
