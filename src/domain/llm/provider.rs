use async_trait::async_trait;
use std::fmt::Debug;

use super::GenerationRequest;
use crate::domain::DomainError;

/// Trait for LLM providers (Gemini, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Generate a response for the given request
    async fn generate(&self, request: GenerationRequest) -> Result<String, DomainError>;

    /// Generate with web search results included.
    ///
    /// Folds the web results and any document context into a single
    /// enhanced context, then delegates to the same generation path.
    async fn generate_with_web_context(
        &self,
        request: GenerationRequest,
        web_results: &str,
    ) -> Result<String, DomainError> {
        if web_results.is_empty() {
            return self.generate(request).await;
        }

        let mut enhanced = format!("Web Search Results:\n{}", web_results);
        if let Some(context) = request.context() {
            enhanced.push_str(&format!("\n\nDocument Context:\n{}", context));
        }

        self.generate(request.with_context(enhanced)).await
    }

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
