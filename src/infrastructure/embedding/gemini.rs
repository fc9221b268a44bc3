//! Gemini embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::DEFAULT_EMBEDDING_MODEL;
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini embedding provider.
///
/// Unlike generation, embedding credentials are fixed at construction:
/// knowledge-base nodes carry no key override.
#[derive(Debug)]
pub struct GeminiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    model: String,
    base_url: String,
}

impl<C: HttpClientTrait> GeminiEmbeddingProvider<C> {
    /// Create a new embedding provider with the default model
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn embed_url(&self) -> String {
        format!("{}/v1beta/models/{}:embedContent", self.base_url, self.model)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for GeminiEmbeddingProvider<C> {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let body = json!({
            "content": {"parts": [{"text": text}]},
            "taskType": "RETRIEVAL_QUERY",
        });
        let headers = vec![
            ("x-goog-api-key", self.api_key.as_str()),
            ("Content-Type", "application/json"),
        ];

        let response = self.client.post_json(&self.embed_url(), headers, &body).await?;

        let parsed: GeminiEmbedResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("gemini", format!("Failed to parse embedding response: {}", e))
        })?;

        Ok(parsed.embedding.values)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
struct GeminiEmbedResponse {
    embedding: GeminiEmbedding,
}

#[derive(Debug, Deserialize)]
struct GeminiEmbedding {
    values: Vec<f32>,
}
