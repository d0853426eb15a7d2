//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// A provider is an explicitly owned handle: callers construct it, call
/// [`initialize`](LLMProvider::initialize) before first use and
/// [`shutdown`](LLMProvider::shutdown) when done. Both hooks default to no-ops
/// for stateless HTTP backends.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the model
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "ollama", "openai")
    fn name(&self) -> &str;

    /// Prepare the backend (load the model, warm connections)
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Release backend resources
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}
