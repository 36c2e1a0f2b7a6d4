//! `TextFormatter` trait and the OpenAI-compatible API implementation.
//!
//! `ApiFormatter` calls any `/v1/chat/completions` endpoint — Ollama (OpenAI
//! mode), LM Studio, vLLM, OpenAI itself.  All connection details come from
//! [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::LlmConfig;

/// Instructions sent as the system message with every formatting request.
const SYSTEM_PROMPT: &str = "\
You clean up speech-to-text transcripts. Rewrite the input according to these \
rules and output only the rewritten text:
1. Remove filler words (um, uh, er, you know, I mean).
2. Fix false starts, stutters and self-corrections, keeping the final intent.
3. Add sentence punctuation and capitalisation.
4. Fix obvious mis-transcriptions of technical terms.
5. Never change the meaning and never add information.
6. Output the cleaned text only, with no commentary.";

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur during a formatting call.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("formatting request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse formatter response: {0}")]
    Parse(String),

    /// The endpoint returned a response with no usable text content.
    #[error("formatter returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// TextFormatter trait
// ---------------------------------------------------------------------------

/// Async capability interface for transcript formatting.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn TextFormatter>` with the pipeline worker.
#[async_trait]
pub trait TextFormatter: Send + Sync {
    /// Reformat `raw` and return the refined text.
    async fn format(&self, raw: &str) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiFormatter
// ---------------------------------------------------------------------------

/// Formatter backed by an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct ApiFormatter {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ApiFormatter {
    /// Build an `ApiFormatter` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs` so a stalled endpoint cannot hold the worker
    /// longer than configured.
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl TextFormatter for ApiFormatter {
    /// Send `raw` to the configured endpoint.
    ///
    /// The `Authorization: Bearer …` header is attached only when
    /// `config.api_key` is a non-empty string — local providers need none.
    async fn format(&self, raw: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user",   "content": raw           }
            ],
            "stream":      false,
            "temperature": self.config.temperature,
            "max_tokens":  self.config.max_tokens
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let formatted = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(LlmError::EmptyResponse)?
            .trim()
            .to_string();

        if formatted.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(formatted)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
