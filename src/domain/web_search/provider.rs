//! Web search provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for web search providers.
///
/// Results come back as a preformatted text block ready for prompt
/// inclusion; an empty string means nothing was found. Search failures
/// degrade to "no web results" at the engine level.
#[async_trait]
pub trait WebSearchProvider: Send + Sync + Debug {
    /// Whether this provider has credentials to perform searches
    fn is_configured(&self) -> bool;

    /// Search the web for the given query
    async fn search(&self, query: &str) -> Result<String, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Deterministic web search provider for tests
    #[derive(Debug)]
    pub struct MockWebSearchProvider {
        configured: bool,
        results: String,
        error: Option<String>,
    }

    impl MockWebSearchProvider {
        pub fn new(results: impl Into<String>) -> Self {
            Self {
                configured: true,
                results: results.into(),
                error: None,
            }
        }

        pub fn unconfigured() -> Self {
            Self {
                configured: false,
                results: String::new(),
                error: None,
            }
        }

        pub fn failing(error: impl Into<String>) -> Self {
            Self {
                configured: true,
                results: String::new(),
                error: Some(error.into()),
            }
        }
    }

    #[async_trait]
    impl WebSearchProvider for MockWebSearchProvider {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn search(&self, _query: &str) -> Result<String, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock", error));
            }
            Ok(self.results.clone())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_search() {
            let provider = MockWebSearchProvider::new("1. Result");
            assert!(provider.is_configured());
            assert_eq!(provider.search("query").await.unwrap(), "1. Result");
        }

        #[tokio::test]
        async fn test_unconfigured_mock() {
            let provider = MockWebSearchProvider::unconfigured();
            assert!(!provider.is_configured());
        }
    }
}
