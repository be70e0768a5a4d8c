use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};
use trendfit_core::config::LlmConfig;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Gemini `generateContent` client.
#[derive(Debug)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
    max_retries: u32,
}

#[derive(Debug, Error)]
enum CallError {
    #[error("{0}")]
    Transient(String),
    #[error("{0}")]
    Rejected(String),
}

impl GeminiClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("llm.api_key is required for the gemini provider"))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build gemini http client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            max_retries: config.max_retries,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    async fn send_once(&self, body: &Value) -> Result<String, CallError> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|error| CallError::Transient(format!("gemini request failed: {error}")))?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CallError::Transient(format!("gemini returned {status}")));
        }
        if !status.is_success() {
            return Err(CallError::Rejected(format!("gemini returned {status}")));
        }

        let payload: GenerateResponse = response.json().await.map_err(|error| {
            CallError::Rejected(format!("failed to decode gemini response: {error}"))
        })?;
        payload
            .text()
            .ok_or_else(|| CallError::Rejected("gemini response contained no text".to_string()))
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });

        let mut attempt: u32 = 0;
        loop {
            match self.send_once(&body).await {
                Ok(text) => {
                    debug!(
                        event_name = "llm.gemini.completed",
                        model = %self.model,
                        attempts = attempt + 1,
                        response_chars = text.len(),
                        "gemini completion received"
                    );
                    return Ok(text);
                }
                Err(CallError::Transient(message)) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        event_name = "llm.gemini.retry",
                        model = %self.model,
                        attempt,
                        error = %message,
                        "retrying gemini request"
                    );
                    tokio::time::sleep(backoff(attempt)).await;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }
}

fn backoff(attempt: u32) -> Duration {
    let exponent = attempt.clamp(1, 6) - 1;
    Duration::from_millis(250u64 << exponent)
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(|part| part.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}
