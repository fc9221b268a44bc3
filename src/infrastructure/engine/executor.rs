//! Workflow engine: orchestrator and node dispatcher
//!
//! Executes a workflow graph strictly sequentially in topological order,
//! threading the execution context through each node handler and
//! bracketing every node with started/completed-or-error log entries. No
//! node or provider error ever escapes `execute`; failures degrade to "no
//! contribution" or surface in-band in the response.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::config::DEFAULT_MODEL;
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::execution::{
    ExecutionConfig, ExecutionContext, ExecutionLogger, ExecutionRequest, ExecutionResult,
    WorkflowExecutor, NO_RESPONSE_FALLBACK,
};
use crate::domain::graph::{
    execution_order, KnowledgeBaseConfig, LlmEngineConfig, Node, NodeKind, WorkflowGraph,
};
use crate::domain::llm::{GenerationRequest, LlmProvider};
use crate::domain::vector_store::{ScoredDocument, VectorStore};
use crate::domain::web_search::WebSearchProvider;
use crate::domain::DomainError;

/// Step name bracketing the whole run
const WORKFLOW_STEP: &str = "Workflow";

/// Step name for web search augmentation failures
const WEB_SEARCH_STEP: &str = "Web Search";

/// Number of nearest documents retrieved per knowledge base node
const RETRIEVAL_TOP_K: usize = 5;

/// Separator between document texts within one knowledge context
const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Prefix of the in-band response produced when generation fails
const ERROR_RESPONSE_PREFIX: &str = "Error generating response: ";

/// Workflow execution engine.
///
/// Holds its four collaborators as injected trait objects, so runs are
/// identical against live providers or deterministic test doubles.
#[derive(Debug)]
pub struct WorkflowEngine {
    embedding: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    llm: Arc<dyn LlmProvider>,
    web_search: Arc<dyn WebSearchProvider>,
    default_model: String,
}

impl WorkflowEngine {
    /// Create an engine with the given providers
    pub fn new(
        embedding: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        llm: Arc<dyn LlmProvider>,
        web_search: Arc<dyn WebSearchProvider>,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            llm,
            web_search,
            default_model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the model used when an LLM node does not configure one
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Dispatch one node against the shared context, bracketed by step
    /// logs. Pure no-op kinds still get their bracket so the log stays a
    /// faithful step-by-step trace.
    async fn dispatch(
        &self,
        node: &Node,
        context: &mut ExecutionContext,
        run_config: &ExecutionConfig,
        logger: &mut ExecutionLogger,
    ) {
        let step = node.kind().step_name();
        logger.start_step(
            step,
            "",
            Some(HashMap::from([("node_id".to_string(), json!(node.id()))])),
        );

        match node.kind() {
            NodeKind::UserQuery(config) => {
                if let Some(template) = &config.query_template {
                    context.set_query_template(template.clone());
                }
                logger.complete_step(step, "Captured user query", None);
            }
            NodeKind::KnowledgeBase(config) => {
                self.run_knowledge_base(step, config, context, logger).await;
            }
            NodeKind::LlmEngine(config) => {
                self.run_llm_engine(step, config, context, run_config, logger)
                    .await;
            }
            NodeKind::Output(_) => {
                logger.complete_step(step, "Workflow output ready", None);
            }
        }
    }

    /// Knowledge base retrieval: embed the query, fetch the nearest
    /// documents, append them to the context under this node's source
    /// label. Every failure degrades to "no contribution".
    async fn run_knowledge_base(
        &self,
        step: &str,
        config: &KnowledgeBaseConfig,
        context: &mut ExecutionContext,
        logger: &mut ExecutionLogger,
    ) {
        let Some(collection_name) = config.collection_name.as_deref().filter(|c| !c.is_empty())
        else {
            logger.error_step(step, "Knowledge base node is missing a collection name", None);
            return;
        };

        match self.retrieve(collection_name, context.query()).await {
            Ok(documents) if documents.is_empty() => {
                logger.complete_step(
                    step,
                    format!("No documents found in '{}'", collection_name),
                    Some(HashMap::from([("documents".to_string(), json!(0))])),
                );
            }
            Ok(documents) => {
                let joined = documents
                    .iter()
                    .map(|d| d.content.as_str())
                    .collect::<Vec<_>>()
                    .join(DOCUMENT_SEPARATOR);
                context.add_knowledge_context(config.source_label(), joined);

                logger.complete_step(
                    step,
                    format!(
                        "Retrieved {} documents from '{}'",
                        documents.len(),
                        collection_name
                    ),
                    Some(HashMap::from([
                        ("documents".to_string(), json!(documents.len())),
                        ("source".to_string(), json!(config.source_label())),
                    ])),
                );
            }
            Err(error) => {
                logger.error_step(step, error.to_string(), None);
            }
        }
    }

    async fn retrieve(
        &self,
        collection_name: &str,
        query: &str,
    ) -> Result<Vec<ScoredDocument>, DomainError> {
        let embedding = self.embedding.embed_query(query).await?;
        self.vector_store
            .query(collection_name, &embedding, RETRIEVAL_TOP_K)
            .await
    }

    /// LLM generation over the accumulated context, with optional web
    /// search augmentation. A generation failure becomes the in-band
    /// sentinel response, never a propagated error.
    async fn run_llm_engine(
        &self,
        step: &str,
        config: &LlmEngineConfig,
        context: &mut ExecutionContext,
        run_config: &ExecutionConfig,
        logger: &mut ExecutionLogger,
    ) {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .or(run_config.api_key.as_deref());
        let Some(api_key) = api_key else {
            logger.error_step(step, "LLM API key not configured", None);
            return;
        };

        let model = config
            .model
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.default_model.clone());

        let web_results = if config.enable_web_search {
            self.run_web_search(context.query(), logger).await
        } else {
            String::new()
        };

        let mut builder = GenerationRequest::builder()
            .model(&model)
            .api_key(api_key)
            .query(context.query())
            .context(context.combined_context())
            .system_prompt(config.prompt.clone().filter(|p| !p.is_empty()))
            .chat_history(context.chat_history().to_vec());
        if let Some(temperature) = config.temperature {
            builder = builder.temperature(temperature);
        }
        let request = builder.build();

        let generated = if web_results.is_empty() {
            self.llm.generate(request).await
        } else {
            self.llm.generate_with_web_context(request, &web_results).await
        };

        match generated {
            Ok(response) => {
                logger.complete_step(
                    step,
                    "Generated response",
                    Some(HashMap::from([
                        ("model".to_string(), json!(model)),
                        ("response_chars".to_string(), json!(response.chars().count())),
                    ])),
                );
                context.set_response(response);
            }
            Err(error) => {
                logger.error_step(
                    step,
                    error.to_string(),
                    Some(HashMap::from([("model".to_string(), json!(model))])),
                );
                context.set_response(format!("{}{}", ERROR_RESPONSE_PREFIX, error));
            }
        }
    }

    /// Web search augmentation; failures are logged and degrade to no web
    /// results
    async fn run_web_search(&self, query: &str, logger: &mut ExecutionLogger) -> String {
        if !self.web_search.is_configured() {
            return String::new();
        }

        match self.web_search.search(query).await {
            Ok(results) => results,
            Err(error) => {
                logger.error_step(WEB_SEARCH_STEP, error.to_string(), None);
                String::new()
            }
        }
    }
}

#[async_trait]
impl WorkflowExecutor for WorkflowEngine {
    async fn execute(&self, graph: &WorkflowGraph, request: ExecutionRequest) -> ExecutionResult {
        let execution_id = request
            .execution_id()
            .map(str::to_string)
            .unwrap_or_else(|| format!("exec-{}", Uuid::new_v4()));
        let mut logger =
            ExecutionLogger::new(execution_id, request.workflow_id().map(str::to_string));
        let mut context = ExecutionContext::new(request.query(), request.chat_history().to_vec());

        logger.start_step(
            WORKFLOW_STEP,
            "Starting workflow execution",
            Some(HashMap::from([
                ("node_count".to_string(), json!(graph.node_count())),
                ("edge_count".to_string(), json!(graph.edge_count())),
            ])),
        );

        let order = execution_order(graph.nodes(), graph.edges());
        let node_map = graph.node_map();
        for node_id in &order {
            // Ids excluded by cycles or referenced by dangling edges are
            // simply absent from the node map.
            let Some(node) = node_map.get(node_id.as_str()) else {
                continue;
            };
            self.dispatch(node, &mut context, request.config(), &mut logger)
                .await;
        }

        logger.complete_step(WORKFLOW_STEP, "Workflow execution completed", None);

        let response = context
            .into_response()
            .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string());
        ExecutionResult::new(response, logger.into_logs())
    }
}
