//! LLM client abstractions
//!
//! A unified interface over OpenAI-compatible chat APIs. The server talks
//! to OpenRouter by default, but anything that speaks the OpenAI protocol
//! works. API keys are supplied per call site because every user brings
//! their own key.

use crate::types::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A boxed stream of text fragments from a streaming completion.
pub type TextStream = Box<dyn futures::Stream<Item = Result<String>> + Send + Unpin>;

/// Generic LLM client trait for provider abstraction
///
/// Implemented by the production OpenAI-compatible client and by test
/// doubles, allowing the research pipeline to run without a network.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with conversation history
    async fn generate_with_history(
        &self,
        messages: &[(String, String)], // (role, content) pairs
    ) -> Result<String>;

    /// Stream a completion guided by a system prompt
    async fn stream_with_system(&self, system: &str, prompt: &str) -> Result<TextStream>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Builds role-specific clients bound to a caller's API key.
///
/// Each research run constructs fresh clients from the immutable server
/// configuration plus the owning user's key; nothing about a run is
/// shared mutable state.
pub trait LLMClientFactory: Send + Sync {
    /// Client used to pick a search strategy. Deterministic settings.
    fn planner(&self, api_key: &str) -> Arc<dyn LLMClient>;

    /// Client used to stream the final report.
    fn synthesizer(&self, api_key: &str) -> Arc<dyn LLMClient>;

    /// Client used to answer follow-up questions about a finished report.
    fn follow_up(&self, api_key: &str) -> Arc<dyn LLMClient>;
}
