//! SerpAPI search client

use serde::Deserialize;

use super::service::SearchHit;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com";

/// SerpAPI client
#[derive(Debug)]
pub struct SerpApiClient<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
}

impl<C: HttpClientTrait> SerpApiClient<C> {
    /// Create a new client
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_SERPAPI_BASE_URL.to_string(),
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
            "{}/search?q={}&api_key={}&num={}",
            self.base_url,
            urlencoding::encode(query),
            self.api_key,
            num_results
        );

        let response = self.client.get_json(&url, Vec::new()).await.map_err(|e| {
            DomainError::provider("serpapi", format!("Search request failed: {}", e))
        })?;

        let parsed: SerpApiResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("serpapi", format!("Failed to parse response: {}", e))
        })?;

        Ok(parsed
            .organic_results
            .into_iter()
            .take(num_results)
            .map(|result| SearchHit {
                title: result.title.unwrap_or_default(),
                link: result.link.unwrap_or_default(),
                snippet: result.snippet.unwrap_or_default(),
            })
            .collect())
    }
}

// SerpAPI response types

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SerpApiResult>,
}

#[derive(Debug, Deserialize)]
struct SerpApiResult {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;
    use serde_json::json;

    #[tokio::test]
    async fn test_query_is_url_encoded() {
        let url = "https://serpapi.com/search?q=rust%20async&api_key=key&num=3";
        let client = MockHttpClient::new().with_response(
            url,
            json!({"organic_results": [{"title": "t", "link": "l", "snippet": "s"}]}),
        );
        let serpapi = SerpApiClient::new(client, "key");

        let hits = serpapi.search("rust async", 3).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "t");
    }

    #[tokio::test]
    async fn test_missing_fields_default_to_empty() {
        let url = "https://serpapi.com/search?q=q&api_key=key&num=5";
        let client = MockHttpClient::new()
            .with_response(url, json!({"organic_results": [{"title": "only title"}]}));
        let serpapi = SerpApiClient::new(client, "key");

        let hits = serpapi.search("q", 5).await.unwrap();
        assert_eq!(hits[0].title, "only title");
        assert_eq!(hits[0].link, "");
        assert_eq!(hits[0].snippet, "");
    }

    #[tokio::test]
    async fn test_result_count_capped() {
        let results: Vec<_> = (0..10)
            .map(|i| json!({"title": format!("r{}", i), "link": "l", "snippet": "s"}))
            .collect();
        let url = "https://serpapi.com/search?q=q&api_key=key&num=2";
        let client =
            MockHttpClient::new().with_response(url, json!({"organic_results": results}));
        let serpapi = SerpApiClient::new(client, "key");

        let hits = serpapi.search("q", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
    }
}
