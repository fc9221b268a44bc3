//! Workflow graph domain module
//!
//! A workflow is a directed graph of typed nodes. Node kinds form a closed
//! sum type, so the dispatcher's match is checked at compile time when a new
//! kind is added. The wire format matches client-authored graph JSON:
//! `{"id": ..., "type": "userQuery" | "knowledgeBase" | "llmEngine" |
//! "output", "data": {...}}` with camelCase data fields.

mod edge;
mod entity;
mod node;
mod order;

pub use edge::Edge;
pub use entity::WorkflowGraph;
pub use node::{KnowledgeBaseConfig, LlmEngineConfig, Node, NodeKind, OutputConfig, UserQueryConfig};
pub use order::{adjacency, execution_order};
