//! LLM client: the single entry point for all text-generation calls.
//!
//! ARCHITECTURAL RULE: no other module may call the Anthropic API directly.
//! Content generation, grading, and meeting dialogue all go through here so
//! retry, timeout, and JSON-extraction behavior stay uniform.

use anyhow::Result;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Hardcoded to prevent accidental model drift between content kinds.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
/// Retry budget for transient failures (transport errors, 429, 5xx).
const MAX_ATTEMPTS: u32 = 3;
/// Per-call timeout. Generation calls are bounded; nothing is held open longer.
const CALL_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("exhausted {attempts} attempts against the generation service")]
    Exhausted { attempts: u32 },

    #[error("generation service returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Whether another attempt could plausibly succeed. Malformed JSON counts:
    /// regeneration often fixes it.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LlmError::Api { status, .. } if *status < 500 && *status != 429)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Shared HTTP wrapper around the Anthropic Messages API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(CALL_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Raw call returning the full response. Retries transport errors, 429,
    /// and 5xx with exponential backoff; other API errors surface immediately
    /// because retrying them cannot help.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![Message { role: "user", content: prompt }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                let delay = std::time::Duration::from_millis(500 * (1u64 << (attempt - 1)));
                warn!(attempt, delay_ms = delay.as_millis() as u64, "retrying generation call");
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let text = response.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), "generation service error: {text}");
                last_error = Some(LlmError::Api { status: status.as_u16(), message: text });
                continue;
            }

            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                    .map(|e| e.error.message)
                    .unwrap_or(text);
                return Err(LlmError::Api { status: status.as_u16(), message });
            }

            let parsed: LlmResponse = response.json().await?;
            debug!(
                input_tokens = parsed.usage.input_tokens,
                output_tokens = parsed.usage.output_tokens,
                "generation call succeeded"
            );
            return Ok(parsed);
        }

        Err(last_error.unwrap_or(LlmError::Exhausted { attempts: MAX_ATTEMPTS }))
    }

    /// Calls the LLM and deserializes the text response as JSON. The supplied
    /// system prompt is layered on top of the shared JSON-only base, and stray
    /// markdown fences are stripped before parsing.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, &json_system(system)).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        serde_json::from_str(strip_json_fences(text)).map_err(LlmError::Parse)
    }
}

/// Every JSON call shares the same output-discipline base; per-kind system
/// prompts only add role and content rules on top.
fn json_system(system: &str) -> String {
    format!("{}\n\n{system}", prompts::JSON_ONLY_SYSTEM)
}

/// Strips ```json ... ``` or ``` ... ``` fences that models sometimes wrap
/// around structured output despite instructions.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    for prefix in ["```json", "```"] {
        if let Some(inner) = text.strip_prefix(prefix) {
            let inner = inner.trim_start();
            return inner.strip_suffix("```").map(str::trim).unwrap_or(inner);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"score\": 80}\n```";
        assert_eq!(strip_json_fences(input), "{\"score\": 80}");
    }

    #[test]
    fn test_strip_json_fences_bare_fence() {
        let input = "```\n[1, 2, 3]\n```";
        assert_eq!(strip_json_fences(input), "[1, 2, 3]");
    }

    #[test]
    fn test_strip_json_fences_passthrough() {
        assert_eq!(strip_json_fences("  {\"ok\": true} "), "{\"ok\": true}");
    }

    #[test]
    fn test_json_system_layers_shared_base_under_role_prompt() {
        let combined = json_system("You are a job market simulator.");
        assert!(combined.starts_with(prompts::JSON_ONLY_SYSTEM));
        assert!(combined.ends_with("You are a job market simulator."));
    }

    #[test]
    fn test_retryability_classification() {
        assert!(LlmError::Api { status: 429, message: String::new() }.is_retryable());
        assert!(LlmError::Api { status: 503, message: String::new() }.is_retryable());
        assert!(!LlmError::Api { status: 400, message: String::new() }.is_retryable());
        assert!(LlmError::EmptyContent.is_retryable());
        assert!(LlmError::Exhausted { attempts: 3 }.is_retryable());
    }
}
