// Content generator: structured generation requests in, validated drafts out.
// All LLM calls go through llm_client; all generated content passes validate
// before anything downstream sees it. Jobs and tasks fall back to deterministic
// templates when the service stays unavailable; interviews and meetings have
// no safe fallback and surface GenerationError::Unavailable instead.

pub mod cv;
pub mod fallback;
pub mod generator;
pub mod prompts;
pub mod validate;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Bounded regeneration budget for content that fails validation. The LLM
/// client already retries transport-level failures internally.
pub const CONTENT_ATTEMPTS: u32 = 2;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The service failed after retries and no fallback exists for this kind.
    /// Retryable by the caller.
    #[error("content generation unavailable: {reason}")]
    Unavailable { reason: String },

    /// Generated content failed schema/consistency checks on every attempt.
    #[error("generated content failed validation: {0}")]
    Validation(String),
}

impl From<LlmError> for GenerationError {
    fn from(e: LlmError) -> Self {
        GenerationError::Unavailable { reason: e.to_string() }
    }
}
