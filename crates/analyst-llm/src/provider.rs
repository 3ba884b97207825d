//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, LLMError, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// Implementations give access to a generative-language service. Flows only
/// depend on this trait, so tests can substitute a canned provider.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the LLM
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Count the tokens `text` occupies for `model`
    ///
    /// Providers without a counting endpoint report [`LLMError::Unsupported`].
    async fn count_tokens(&self, model: &str, text: &str) -> Result<usize> {
        let _ = (model, text);
        Err(LLMError::Unsupported {
            provider: self.name().to_string(),
            operation: "token counting".to_string(),
        })
    }

    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &str;
}
