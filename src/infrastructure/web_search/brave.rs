//! Brave Search API client

use serde::Deserialize;

use super::service::SearchHit;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_BRAVE_BASE_URL: &str = "https://api.search.brave.com";

/// Brave Search client
#[derive(Debug)]
pub struct BraveSearchClient<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
}

impl<C: HttpClientTrait> BraveSearchClient<C> {
    /// Create a new client
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BRAVE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Search, returning up to `num_results` hits
    pub async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchHit>, DomainError> {
        let url = format!(
            "{}/res/v1/web/search?q={}&count={}",
            self.base_url,
            urlencoding::encode(query),
            num_results
        );
        let headers = vec![
            ("Accept", "application/json"),
            ("X-Subscription-Token", self.api_key.as_str()),
        ];

        let response = self.client.get_json(&url, headers).await.map_err(|e| {
            DomainError::provider("brave", format!("Search request failed: {}", e))
        })?;

        let parsed: BraveSearchResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("brave", format!("Failed to parse response: {}", e))
        })?;

        Ok(parsed
            .web
            .results
            .into_iter()
            .take(num_results)
            .map(|result| SearchHit {
                title: result.title.unwrap_or_default(),
                link: result.url.unwrap_or_default(),
                snippet: result.description.unwrap_or_default(),
            })
            .collect())
    }
}

// Brave API response types

#[derive(Debug, Deserialize)]
struct BraveSearchResponse {
    #[serde(default)]
    web: BraveWebResults,
}

#[derive(Debug, Default, Deserialize)]
struct BraveWebResults {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
}
