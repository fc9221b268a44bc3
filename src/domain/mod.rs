//! Domain layer - Core business logic and entities

pub mod embedding;
pub mod error;
pub mod execution;
pub mod graph;
pub mod llm;
pub mod vector_store;
pub mod web_search;

pub use embedding::EmbeddingProvider;
pub use error::DomainError;
pub use execution::{
    ChatMessage, ChatRole, ExecutionConfig, ExecutionContext, ExecutionLogger, ExecutionRequest,
    ExecutionResult, KnowledgeContext, LogEntry, LogStatus, WorkflowExecutor,
};
pub use graph::{adjacency, execution_order, Edge, Node, NodeKind, WorkflowGraph};
pub use llm::{GenerationRequest, GenerationRequestBuilder, LlmProvider};
pub use vector_store::{ScoredDocument, VectorStore};
pub use web_search::WebSearchProvider;
