//! Vector store provider trait

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A document returned from a similarity query, closest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// Document text
    pub content: String,

    /// Document metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,

    /// Distance from the query embedding (smaller is closer)
    pub distance: f32,
}

impl ScoredDocument {
    pub fn new(content: impl Into<String>, distance: f32) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
            distance,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Trait for vector store backends.
///
/// Querying an unknown collection is an error, not an empty result; the
/// engine treats it like any other provider failure.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Query a collection for the nearest documents to the embedding
    async fn query(
        &self,
        collection_name: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
