//! Chroma vector store client

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::domain::vector_store::{ScoredDocument, VectorStore};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// Chroma REST client.
///
/// Collections are addressed by name; Chroma resolves them to ids, so each
/// query is a name lookup followed by the actual similarity query. An
/// unknown collection name surfaces as an error from the lookup.
#[derive(Debug)]
pub struct ChromaVectorStore<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> ChromaVectorStore<C> {
    /// Create a client for the given Chroma server
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self, name: &str) -> String {
        format!("{}/api/v1/collections/{}", self.base_url, name)
    }

    fn query_url(&self, collection_id: &str) -> String {
        format!("{}/api/v1/collections/{}/query", self.base_url, collection_id)
    }

    async fn resolve_collection_id(&self, name: &str) -> Result<String, DomainError> {
        let response = self
            .client
            .get_json(&self.collection_url(name), Vec::new())
            .await
            .map_err(|e| {
                DomainError::vector_store(format!("Collection '{}' lookup failed: {}", name, e))
            })?;

        let collection: ChromaCollection = serde_json::from_value(response).map_err(|e| {
            DomainError::vector_store(format!("Failed to parse collection response: {}", e))
        })?;

        Ok(collection.id)
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorStore for ChromaVectorStore<C> {
    async fn query(
        &self,
        collection_name: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, DomainError> {
        let collection_id = self.resolve_collection_id(collection_name).await?;

        let body = json!({
            "query_embeddings": [embedding],
            "n_results": top_k,
            "include": ["documents", "metadatas", "distances"],
        });
        let response = self
            .client
            .post_json(&self.query_url(&collection_id), Vec::new(), &body)
            .await?;

        let parsed: ChromaQueryResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::vector_store(format!("Failed to parse query response: {}", e))
        })?;

        // Results come back batched per query embedding; we always send
        // exactly one.
        let documents = parsed.documents.into_iter().next().unwrap_or_default();
        let metadatas = parsed.metadatas.into_iter().next().unwrap_or_default();
        let distances = parsed.distances.into_iter().next().unwrap_or_default();

        let results = documents
            .into_iter()
            .enumerate()
            .map(|(i, content)| {
                let mut document =
                    ScoredDocument::new(content, distances.get(i).copied().unwrap_or(0.0));
                if let Some(Some(metadata)) = metadatas.get(i) {
                    document.metadata = metadata.clone();
                }
                document
            })
            .collect();

        Ok(results)
    }

    fn provider_name(&self) -> &'static str {
        "chroma"
    }
}

// Chroma API response types

#[derive(Debug, Deserialize)]
struct ChromaCollection {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ChromaQueryResponse {
    #[serde(default)]
    documents: Vec<Vec<String>>,
    #[serde(default)]
    metadatas: Vec<Vec<Option<std::collections::HashMap<String, serde_json::Value>>>>,
    #[serde(default)]
    distances: Vec<Vec<f32>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const COLLECTION_URL: &str = "http://localhost:8000/api/v1/collections/docs";
    const QUERY_URL: &str = "http://localhost:8000/api/v1/collections/col-uuid/query";

    fn collection_response() -> serde_json::Value {
        json!({"id": "col-uuid", "name": "docs"})
    }

    fn query_response() -> serde_json::Value {
        json!({
            "documents": [["first chunk", "second chunk"]],
            "metadatas": [[{"chunk_index": 0}, null]],
            "distances": [[0.12, 0.34]],
        })
    }

    #[tokio::test]
    async fn test_query_resolves_name_then_queries() {
        let client = MockHttpClient::new()
            .with_response(COLLECTION_URL, collection_response())
            .with_response(QUERY_URL, query_response());
        let store = ChromaVectorStore::new(client, "http://localhost:8000");

        let results = store.query("docs", &[0.1, 0.2], 5).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "first chunk");
        assert_eq!(results[0].distance, 0.12);
        assert_eq!(results[0].metadata.get("chunk_index"), Some(&json!(0)));
        assert!(results[1].metadata.is_empty());

        let body = store.client.posted_body(0).unwrap();
        assert_eq!(body["n_results"], json!(5));
        assert_eq!(body["query_embeddings"][0], json!([0.1, 0.2]));
    }

    #[tokio::test]
    async fn test_unknown_collection_is_an_error() {
        let client = MockHttpClient::new(); // no response registered -> lookup fails
        let store = ChromaVectorStore::new(client, "http://localhost:8000");

        let error = store.query("missing", &[0.1], 5).await.unwrap_err();
        assert!(error.to_string().contains("lookup failed"));
    }

    #[tokio::test]
    async fn test_empty_result_batch() {
        let client = MockHttpClient::new()
            .with_response(COLLECTION_URL, collection_response())
            .with_response(QUERY_URL, json!({"documents": [[]], "metadatas": [[]], "distances": [[]]}));
        let store = ChromaVectorStore::new(client, "http://localhost:8000");

        let results = store.query("docs", &[0.1], 5).await.unwrap();
        assert!(results.is_empty());
    }
}
