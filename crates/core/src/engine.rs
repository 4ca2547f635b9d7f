//! Engine trait — the abstraction over the text-generation backend.
//!
//! An Engine takes a prompt and produces the final response text, running any
//! tool callbacks the model requests along the way. The pipeline treats it as
//! an opaque capability: invoke succeeds with raw text or fails with an
//! `EngineError`.

use crate::error::EngineError;
use crate::message::Prompt;
use async_trait::async_trait;

/// The engine-invocation capability.
///
/// Implementations own the transport (HTTP client, model name, bound tools).
/// The returned text is raw — blankness policy belongs to the caller, so an
/// engine may legitimately return an empty string.
#[async_trait]
pub trait Engine: Send + Sync {
    /// A human-readable name for this engine backend (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a prompt and return the final response text.
    async fn invoke(&self, prompt: Prompt) -> std::result::Result<String, EngineError>;

    /// Health check — can we reach the backend?
    async fn health_check(&self) -> std::result::Result<bool, EngineError> {
        Ok(true)
    }
}
