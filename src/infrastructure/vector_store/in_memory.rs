//! In-memory vector store for development and testing

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::vector_store::{ScoredDocument, VectorStore};
use crate::domain::DomainError;

/// In-memory vector store for development without a Chroma server.
///
/// Performs no similarity scoring: documents come back in insertion order
/// with their position as a pseudo-distance. Querying a collection that
/// was never created is an error, matching the real backend.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

#[derive(Debug, Clone)]
struct StoredDocument {
    content: String,
    metadata: HashMap<String, serde_json::Value>,
}

impl InMemoryVectorStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection if it does not exist yet
    pub async fn create_collection(&self, name: impl Into<String>) {
        self.collections
            .write()
            .await
            .entry(name.into())
            .or_default();
    }

    /// Add a document to a collection, creating the collection on first
    /// use
    pub async fn add_document(&self, collection: &str, content: impl Into<String>) {
        self.add_document_with_metadata(collection, content, HashMap::new())
            .await;
    }

    /// Add a document with metadata
    pub async fn add_document_with_metadata(
        &self,
        collection: &str,
        content: impl Into<String>,
        metadata: HashMap<String, serde_json::Value>,
    ) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                content: content.into(),
                metadata,
            });
    }

    /// Number of documents in a collection, if it exists
    pub async fn document_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|docs| docs.len())
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn query(
        &self,
        collection_name: &str,
        _embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, DomainError> {
        let collections = self.collections.read().await;
        let documents = collections.get(collection_name).ok_or_else(|| {
            DomainError::not_found(format!("Collection '{}' not found", collection_name))
        })?;

        Ok(documents
            .iter()
            .take(top_k)
            .enumerate()
            .map(|(i, doc)| {
                let mut scored = ScoredDocument::new(&doc.content, i as f32);
                scored.metadata = doc.metadata.clone();
                scored
            })
            .collect())
    }

    fn provider_name(&self) -> &'static str {
        "in_memory"
    }
}
