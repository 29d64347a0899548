//! Text-generation collaborator.
//!
//! One synchronous request/response call per file: prompt + model in, raw
//! free-text out. The production implementation talks to Ollama's
//! `/api/generate` endpoint with a fixed timeout and no retry. The trait
//! seam exists so the batch orchestration can be tested without a live
//! service.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Why a generate call produced no text. Callers can tell an HTTP-level
/// rejection apart from a transport failure, but the orchestration treats
/// both the same way (fall back to a low-confidence result).
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("service returned status {code}")]
    Status { code: u16 },
    #[error("request failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerateError>;
}

// ─── Ollama client ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct OllamaReply {
    response: String,
}

pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerateError> {
        let url = format!("{}/api/generate", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "model": model,
                "prompt": prompt,
                "stream": false,
            }))
            .send()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(GenerateError::Status {
                code: resp.status().as_u16(),
            });
        }

        let body: OllamaReply = resp
            .json()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;
        Ok(body.response)
    }
}
