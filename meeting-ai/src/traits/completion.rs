//! Chat completion provider trait.

use crate::Error;
use async_trait::async_trait;

/// Generation parameters for a chat completion request.
#[derive(Debug, Clone)]
pub struct Params {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            max_tokens: 1024,
            top_p: 1.0,
        }
    }
}

/// Abstraction for LLM chat completion services.
///
/// Implementations send a system+user message pair and return the raw
/// generated text. The response is free-form and may contain reasoning
/// traces or markdown around the payload; callers own the parsing.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Run a completion for the given system and user prompts.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &Params,
    ) -> Result<String, Error>;

    /// Return unique identifier for this provider (e.g., "groq").
    ///
    /// Must be lowercase, alphanumeric with underscores only.
    fn provider_id(&self) -> &str;
}
