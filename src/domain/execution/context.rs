//! Mutable execution context threaded through a workflow run
//!
//! Handlers declare their access through the accessors here instead of
//! sharing an ambient bag of state: UserQuery writes the query template,
//! KnowledgeBase appends knowledge contexts, LlmEngine reads everything and
//! writes the response, Output reads nothing.

use serde::{Deserialize, Serialize};

/// Role of a message in the chat history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A prior message supplied by the caller for conversation memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Text retrieved by one knowledge-base node, labeled with its source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeContext {
    pub source_label: String,
    pub content: String,
}

/// Mutable state for a single workflow run.
///
/// Created once at run start, mutated in place by node handlers in
/// execution order, read once at run end, then discarded. Execution is
/// strictly sequential, so no synchronization is needed.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// The original user query, immutable for the whole run
    query: String,

    /// Template recorded by a UserQuery node, if one supplies it
    query_template: Option<String>,

    /// Knowledge contexts accumulated in visitation order
    knowledge_contexts: Vec<KnowledgeContext>,

    /// Caller-supplied conversation history, read-only during the run
    chat_history: Vec<ChatMessage>,

    /// Response written by the LlmEngine node
    response: Option<String>,
}

impl ExecutionContext {
    /// Create a fresh context for one run
    pub fn new(query: impl Into<String>, chat_history: Vec<ChatMessage>) -> Self {
        Self {
            query: query.into(),
            query_template: None,
            knowledge_contexts: Vec::new(),
            chat_history,
            response: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn query_template(&self) -> Option<&str> {
        self.query_template.as_deref()
    }

    pub fn set_query_template(&mut self, template: impl Into<String>) {
        self.query_template = Some(template.into());
    }

    pub fn knowledge_contexts(&self) -> &[KnowledgeContext] {
        &self.knowledge_contexts
    }

    /// Append one source's retrieved context, preserving visitation order
    pub fn add_knowledge_context(
        &mut self,
        source_label: impl Into<String>,
        content: impl Into<String>,
    ) {
        self.knowledge_contexts.push(KnowledgeContext {
            source_label: source_label.into(),
            content: content.into(),
        });
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.chat_history
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn set_response(&mut self, response: impl Into<String>) {
        self.response = Some(response.into());
    }

    /// Consume the context, yielding the response if one was generated
    pub fn into_response(self) -> Option<String> {
        self.response
    }

    /// Concatenate the accumulated context for generation: the query
    /// template first (under its own header), then one labeled section per
    /// knowledge context in visitation order. `None` when nothing
    /// accumulated.
    pub fn combined_context(&self) -> Option<String> {
        let mut sections = Vec::new();

        if let Some(template) = &self.query_template {
            sections.push(format!("Query Template:\n{}", template));
        }

        for context in &self.knowledge_contexts {
            sections.push(format!(
                "Context from {}:\n{}",
                context.source_label, context.content
            ));
        }

        if sections.is_empty() {
            None
        } else {
            Some(sections.join("\n\n"))
        }
    }
}
