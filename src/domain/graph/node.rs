//! Workflow node type definitions

use serde::{Deserialize, Serialize};

/// A typed unit of work in a workflow graph.
///
/// Nodes are immutable once a run starts; ids must be unique within a graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Unique id within the graph
    id: String,

    /// The node kind and its configuration
    #[serde(flatten)]
    kind: NodeKind,
}

impl Node {
    /// Create a new node
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Get the node id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the node kind
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

/// Kind of workflow node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum NodeKind {
    /// Entry point carrying the user query
    UserQuery(UserQueryConfig),

    /// Knowledge base retrieval over a vector collection
    KnowledgeBase(KnowledgeBaseConfig),

    /// LLM generation over the accumulated context
    LlmEngine(LlmEngineConfig),

    /// Terminal marker for the workflow result
    Output(OutputConfig),
}

impl NodeKind {
    /// Get the wire-format type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::UserQuery(_) => "userQuery",
            Self::KnowledgeBase(_) => "knowledgeBase",
            Self::LlmEngine(_) => "llmEngine",
            Self::Output(_) => "output",
        }
    }

    /// Get the human-readable step name used in execution logs
    pub fn step_name(&self) -> &'static str {
        match self {
            Self::UserQuery(_) => "User Query",
            Self::KnowledgeBase(_) => "Knowledge Base",
            Self::LlmEngine(_) => "LLM Engine",
            Self::Output(_) => "Output",
        }
    }
}

/// User query node configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserQueryConfig {
    /// Optional template recorded into the execution context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_template: Option<String>,
}

impl UserQueryConfig {
    pub fn with_query_template(mut self, template: impl Into<String>) -> Self {
        self.query_template = Some(template.into());
        self
    }
}

/// Knowledge base node configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct KnowledgeBaseConfig {
    /// Vector collection to query; retrieval is skipped (with an error step)
    /// when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,

    /// Display name of the indexed file, used to label retrieved context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl KnowledgeBaseConfig {
    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Label identifying this source in the combined context: the file name
    /// when present, else the collection name, else a generic label.
    pub fn source_label(&self) -> &str {
        self.file_name
            .as_deref()
            .or(self.collection_name.as_deref())
            .unwrap_or("Knowledge Base")
    }
}

/// LLM engine node configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmEngineConfig {
    /// Model override; the configured default is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Node-level API key override; the run-level key is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Optional system prompt for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Sampling temperature; defaults to 0.7 when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Whether to augment generation with web search results
    pub enable_web_search: bool,
}

impl LlmEngineConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.enable_web_search = enabled;
        self
    }
}

/// Output node configuration (no parameters)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_wire_format() {
        let node = Node::new(
            "kb-1",
            NodeKind::KnowledgeBase(
                KnowledgeBaseConfig::default()
                    .with_collection_name("docs")
                    .with_file_name("manual.pdf"),
            ),
        );

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "kb-1",
                "type": "knowledgeBase",
                "data": {
                    "collectionName": "docs",
                    "fileName": "manual.pdf"
                }
            })
        );

        let roundtrip: Node = serde_json::from_value(value).unwrap();
        assert_eq!(roundtrip, node);
    }

    #[test]
    fn test_node_deserializes_client_json() {
        let node: Node = serde_json::from_value(json!({
            "id": "llm-1",
            "type": "llmEngine",
            "data": {
                "model": "gemini-2.5-flash",
                "temperature": 0.2,
                "enableWebSearch": true
            }
        }))
        .unwrap();

        match node.kind() {
            NodeKind::LlmEngine(config) => {
                assert_eq!(config.model.as_deref(), Some("gemini-2.5-flash"));
                assert_eq!(config.temperature, Some(0.2));
                assert!(config.enable_web_search);
                assert!(config.api_key.is_none());
            }
            other => panic!("Expected LlmEngine, got {:?}", other),
        }
    }

    #[test]
    fn test_node_with_empty_data() {
        let node: Node = serde_json::from_value(json!({
            "id": "out-1",
            "type": "output",
            "data": {}
        }))
        .unwrap();

        assert_eq!(node.kind().type_name(), "output");
        assert_eq!(node.kind().step_name(), "Output");
    }

    #[test]
    fn test_source_label_fallbacks() {
        let with_file = KnowledgeBaseConfig::default()
            .with_collection_name("docs")
            .with_file_name("manual.pdf");
        assert_eq!(with_file.source_label(), "manual.pdf");

        let collection_only = KnowledgeBaseConfig::default().with_collection_name("docs");
        assert_eq!(collection_only.source_label(), "docs");

        let empty = KnowledgeBaseConfig::default();
        assert_eq!(empty.source_label(), "Knowledge Base");
    }

    #[test]
    fn test_step_names() {
        let kinds = [
            NodeKind::UserQuery(UserQueryConfig::default()),
            NodeKind::KnowledgeBase(KnowledgeBaseConfig::default()),
            NodeKind::LlmEngine(LlmEngineConfig::default()),
            NodeKind::Output(OutputConfig::default()),
        ];

        let names: Vec<&str> = kinds.iter().map(|k| k.step_name()).collect();
        assert_eq!(
            names,
            vec!["User Query", "Knowledge Base", "LLM Engine", "Output"]
        );
    }
}
