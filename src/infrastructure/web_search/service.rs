//! Web search service with provider fallback

use async_trait::async_trait;

use super::brave::BraveSearchClient;
use super::serpapi::SerpApiClient;
use crate::domain::web_search::WebSearchProvider;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// Results fetched per search
const DEFAULT_NUM_RESULTS: usize = 5;

/// A single web search result
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Web search service trying SerpAPI first and Brave Search as fallback.
///
/// Returns a numbered, preformatted text block ready for prompt inclusion;
/// an empty string when nothing was found. An error surfaces only when
/// every configured backend failed.
#[derive(Debug)]
pub struct WebSearchService<C: HttpClientTrait> {
    serpapi: Option<SerpApiClient<C>>,
    brave: Option<BraveSearchClient<C>>,
    num_results: usize,
}

impl<C: HttpClientTrait> Default for WebSearchService<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HttpClientTrait> WebSearchService<C> {
    /// Create a service with no backends configured
    pub fn new() -> Self {
        Self {
            serpapi: None,
            brave: None,
            num_results: DEFAULT_NUM_RESULTS,
        }
    }

    pub fn with_serpapi(mut self, client: SerpApiClient<C>) -> Self {
        self.serpapi = Some(client);
        self
    }

    pub fn with_brave(mut self, client: BraveSearchClient<C>) -> Self {
        self.brave = Some(client);
        self
    }

    pub fn with_num_results(mut self, num_results: usize) -> Self {
        self.num_results = num_results;
        self
    }

    async fn fetch_hits(&self, query: &str) -> Result<Vec<SearchHit>, DomainError> {
        match (&self.serpapi, &self.brave) {
            (Some(serpapi), brave) => match serpapi.search(query, self.num_results).await {
                Ok(hits) => Ok(hits),
                Err(error) => {
                    tracing::warn!("SerpAPI search failed: {}", error);
                    match brave {
                        Some(brave) => brave.search(query, self.num_results).await,
                        None => Err(error),
                    }
                }
            },
            (None, Some(brave)) => brave.search(query, self.num_results).await,
            (None, None) => Ok(Vec::new()),
        }
    }

    fn format_hits(hits: &[SearchHit]) -> String {
        hits.iter()
            .enumerate()
            .map(|(i, hit)| {
                format!(
                    "{}. {}\n   {}\n   Source: {}",
                    i + 1,
                    hit.title,
                    hit.snippet,
                    hit.link
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[async_trait]
impl<C: HttpClientTrait> WebSearchProvider for WebSearchService<C> {
    fn is_configured(&self) -> bool {
        self.serpapi.is_some() || self.brave.is_some()
    }

    async fn search(&self, query: &str) -> Result<String, DomainError> {
        let hits = self.fetch_hits(query).await?;
        Ok(Self::format_hits(&hits))
    }
}
