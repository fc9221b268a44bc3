use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use ragflow::config::{AppConfig, LogFormat};
use ragflow::domain::execution::{
    ChatMessage, ExecutionConfig, ExecutionRequest, WorkflowExecutor,
};
use ragflow::domain::graph::WorkflowGraph;
use ragflow::infrastructure::embedding::GeminiEmbeddingProvider;
use ragflow::infrastructure::engine::WorkflowEngine;
use ragflow::infrastructure::http_client::HttpClient;
use ragflow::infrastructure::llm::GeminiProvider;
use ragflow::infrastructure::vector_store::ChromaVectorStore;
use ragflow::infrastructure::web_search::{BraveSearchClient, SerpApiClient, WebSearchService};

/// Execute a RAG workflow definition against a query
#[derive(Debug, Parser)]
#[command(name = "ragflow", version, about)]
struct Cli {
    /// Path to the workflow definition JSON ({"nodes": [...], "edges": [...]})
    workflow: PathBuf,

    /// User query to run through the workflow
    query: String,

    /// Path to a chat history JSON file ([{"role": "user", "content": "..."}, ...])
    #[arg(long)]
    history: Option<PathBuf>,

    /// Print the step log as JSON after the response
    #[arg(long)]
    logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config);

    let workflow_json = std::fs::read_to_string(&cli.workflow)
        .with_context(|| format!("Failed to read workflow file {}", cli.workflow.display()))?;
    let graph: WorkflowGraph =
        serde_json::from_str(&workflow_json).context("Failed to parse workflow definition")?;

    let chat_history: Vec<ChatMessage> = match &cli.history {
        Some(path) => {
            let history_json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read history file {}", path.display()))?;
            serde_json::from_str(&history_json).context("Failed to parse chat history")?
        }
        None => Vec::new(),
    };

    let engine = build_engine(&config);
    let request = ExecutionRequest::new(&cli.query)
        .with_config(ExecutionConfig {
            api_key: config.llm.api_key.clone(),
        })
        .with_chat_history(chat_history);

    let result = engine.execute(&graph, request).await;

    println!("{}", result.response);
    if cli.logs {
        println!("{}", serde_json::to_string_pretty(&result.logs)?);
    }

    Ok(())
}

fn build_engine(config: &AppConfig) -> WorkflowEngine {
    let embedding = GeminiEmbeddingProvider::new(
        HttpClient::new(),
        config.llm.api_key.clone().unwrap_or_default(),
    )
    .with_model(&config.llm.embedding_model);
    let vector_store = ChromaVectorStore::new(HttpClient::new(), &config.vector_store.url);
    let llm = GeminiProvider::new(HttpClient::new());

    let mut search = WebSearchService::new();
    if let Some(key) = &config.search.serp_api_key {
        search = search.with_serpapi(SerpApiClient::new(HttpClient::new(), key));
    }
    if let Some(key) = &config.search.brave_api_key {
        search = search.with_brave(BraveSearchClient::new(HttpClient::new(), key));
    }

    WorkflowEngine::new(
        Arc::new(embedding),
        Arc::new(vector_store),
        Arc::new(llm),
        Arc::new(search),
    )
    .with_default_model(&config.llm.model)
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
