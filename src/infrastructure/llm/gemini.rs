//! Gemini LLM provider implementation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::domain::execution::ChatRole;
use crate::domain::llm::{GenerationRequest, LlmProvider};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Output cap applied to every generation call
const MAX_OUTPUT_TOKENS: u32 = 2048;

/// Gemini LLM provider.
///
/// The API key travels with each [`GenerationRequest`] because nodes may
/// override the run-level key; the provider itself only holds transport
/// state.
#[derive(Debug)]
pub struct GeminiProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> GeminiProvider<C> {
    /// Create a new Gemini provider
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_GEMINI_BASE_URL)
    }

    /// Create a provider with a custom base URL
    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Assemble the full prompt: system prompt, knowledge context, chat
    /// transcript, then the current query.
    fn build_prompt(request: &GenerationRequest) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(system_prompt) = request.system_prompt() {
            parts.push(system_prompt.to_string());
        }

        if let Some(context) = request.context() {
            parts.push(format!("Context from Knowledge Base:\n{}\n", context));
        }

        if !request.chat_history().is_empty() {
            parts.push("Previous conversation:".to_string());
            for message in request.chat_history() {
                let role = match message.role {
                    ChatRole::User => "User",
                    ChatRole::Assistant => "Assistant",
                };
                parts.push(format!("{}: {}", role, message.content));
            }
            // Blank line between the transcript and the current query.
            parts.push(String::new());
        }

        parts.push(format!("User Query: {}", request.query()));

        parts.join("\n\n")
    }

    fn build_body(request: &GenerationRequest) -> serde_json::Value {
        json!({
            "contents": [{
                "parts": [{"text": Self::build_prompt(request)}]
            }],
            "generationConfig": {
                "temperature": request.temperature(),
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
            }
        })
    }

    fn parse_response(json: serde_json::Value) -> Result<String, DomainError> {
        let response: GeminiGenerateResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("gemini", format!("Failed to parse response: {}", e))
        })?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| DomainError::provider("gemini", "Response contained no candidates"))
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for GeminiProvider<C> {
    async fn generate(&self, request: GenerationRequest) -> Result<String, DomainError> {
        let url = self.generate_url(request.model());
        let body = Self::build_body(&request);
        let headers = vec![
            ("x-goog-api-key", request.api_key()),
            ("Content-Type", "application/json"),
        ];

        let response = self.client.post_json(&url, headers, &body).await?;
        Self::parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::ChatMessage;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const TEST_URL: &str =
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

    fn request() -> GenerationRequest {
        GenerationRequest::builder()
            .model("gemini-2.5-flash")
            .api_key("test-key")
            .query("What is Rust?")
            .build()
    }

    fn candidate_response(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": {"parts": [{"text": text}]}
            }]
        })
    }

    #[test]
    fn test_prompt_with_query_only() {
        let prompt = GeminiProvider::<MockHttpClient>::build_prompt(&request());
        assert_eq!(prompt, "User Query: What is Rust?");
    }

    #[test]
    fn test_prompt_assembly_order() {
        let request = GenerationRequest::builder()
            .model("m")
            .api_key("k")
            .query("And now?")
            .context(Some("retrieved text".to_string()))
            .system_prompt(Some("Be brief.".to_string()))
            .chat_history(vec![
                ChatMessage::user("first question"),
                ChatMessage::assistant("first answer"),
            ])
            .build();

        let prompt = GeminiProvider::<MockHttpClient>::build_prompt(&request);
        assert_eq!(
            prompt,
            "Be brief.\n\n\
             Context from Knowledge Base:\nretrieved text\n\n\n\
             Previous conversation:\n\n\
             User: first question\n\n\
             Assistant: first answer\n\n\n\n\
             User Query: And now?"
        );
    }

    #[tokio::test]
    async fn test_generate_parses_candidate_text() {
        let client = MockHttpClient::new().with_response(TEST_URL, candidate_response("hi there"));
        let provider = GeminiProvider::new(client);

        let response = provider.generate(request()).await.unwrap();
        assert_eq!(response, "hi there");
    }

    #[tokio::test]
    async fn test_generate_sends_generation_config() {
        let client = MockHttpClient::new().with_response(TEST_URL, candidate_response("ok"));
        let provider = GeminiProvider::new(client);

        let request = GenerationRequest::builder()
            .model("gemini-2.5-flash")
            .api_key("test-key")
            .query("q")
            .temperature(0.5)
            .build();
        provider.generate(request).await.unwrap();

        let body = provider.client.posted_body(0).unwrap();
        assert_eq!(body["generationConfig"]["temperature"], json!(0.5));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], json!(2048));
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            json!("User Query: q")
        );
    }

    #[tokio::test]
    async fn test_generate_error_maps_to_domain_error() {
        let client = MockHttpClient::new().with_error(TEST_URL, "HTTP 429: quota exceeded");
        let provider = GeminiProvider::new(client);

        let error = provider.generate(request()).await.unwrap_err();
        assert!(error.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_an_error() {
        let client = MockHttpClient::new().with_response(TEST_URL, json!({"candidates": []}));
        let provider = GeminiProvider::new(client);

        let error = provider.generate(request()).await.unwrap_err();
        assert!(error.to_string().contains("no candidates"));
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let url = "http://localhost:9090/v1beta/models/gemini-2.5-flash:generateContent";
        let client = MockHttpClient::new().with_response(url, candidate_response("local"));
        let provider = GeminiProvider::with_base_url(client, "http://localhost:9090/");

        let response = provider.generate(request()).await.unwrap();
        assert_eq!(response, "local");
    }

    #[tokio::test]
    async fn test_web_context_generation_folds_results() {
        let client = MockHttpClient::new().with_response(TEST_URL, candidate_response("ok"));
        let provider = GeminiProvider::new(client);

        let request = request().with_context("doc context".to_string());
        provider
            .generate_with_web_context(request, "1. news item")
            .await
            .unwrap();

        let body = provider.client.posted_body(0).unwrap();
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Web Search Results:\n1. news item"));
        assert!(prompt.contains("Document Context:\ndoc context"));
    }
}
