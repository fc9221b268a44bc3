//! Workflow executor trait and run request/result types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::context::ChatMessage;
use super::logger::LogEntry;
use crate::domain::graph::WorkflowGraph;

/// Fallback response when no LLM engine node produced one
pub const NO_RESPONSE_FALLBACK: &str = "No response generated";

/// Run-level configuration for a single execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutionConfig {
    /// LLM API key consulted when a node carries no override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ExecutionConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Inputs for a single workflow run
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    query: String,
    config: ExecutionConfig,
    chat_history: Vec<ChatMessage>,
    execution_id: Option<String>,
    workflow_id: Option<String>,
}

impl ExecutionRequest {
    /// Create a request for the given user query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            config: ExecutionConfig::default(),
            chat_history: Vec::new(),
            execution_id: None,
            workflow_id: None,
        }
    }

    // Builder methods

    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_chat_history(mut self, chat_history: Vec<ChatMessage>) -> Self {
        self.chat_history = chat_history;
        self
    }

    pub fn with_execution_id(mut self, execution_id: impl Into<String>) -> Self {
        self.execution_id = Some(execution_id.into());
        self
    }

    pub fn with_workflow_id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }

    // Getters

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.chat_history
    }

    pub fn execution_id(&self) -> Option<&str> {
        self.execution_id.as_deref()
    }

    pub fn workflow_id(&self) -> Option<&str> {
        self.workflow_id.as_deref()
    }
}

/// Result of one workflow run: the response plus the ordered step log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub response: String,
    pub logs: Vec<LogEntry>,
}

impl ExecutionResult {
    pub fn new(response: impl Into<String>, logs: Vec<LogEntry>) -> Self {
        Self {
            response: response.into(),
            logs,
        }
    }
}

/// Trait for workflow execution.
///
/// Implementations must never let a node or provider error escape: every
/// failure is either logged and skipped or surfaced in-band in the
/// response.
#[async_trait]
pub trait WorkflowExecutor: Send + Sync + std::fmt::Debug {
    /// Execute a workflow graph for the given request
    async fn execute(&self, graph: &WorkflowGraph, request: ExecutionRequest) -> ExecutionResult;
}
