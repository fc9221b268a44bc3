//! RAG workflow execution engine
//!
//! Executes user-authored workflow graphs of typed nodes with support for:
//! - Topological ordering of node graphs (permissive toward cycles and
//!   dangling edges)
//! - Multi-source knowledge-base retrieval with labeled context accumulation
//! - LLM generation with optional web-search augmentation and chat history
//! - A structured, replayable step log returned with every run
//!
//! Providers (LLM, embedding, vector store, web search) are injected trait
//! objects, so the engine runs identically against live services or the
//! deterministic mocks shipped with each trait.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::execution::{
    ChatMessage, ChatRole, ExecutionConfig, ExecutionContext, ExecutionLogger, ExecutionRequest,
    ExecutionResult, LogEntry, LogStatus, WorkflowExecutor,
};
pub use domain::graph::{Edge, Node, NodeKind, WorkflowGraph};
pub use domain::DomainError;
pub use infrastructure::engine::WorkflowEngine;
