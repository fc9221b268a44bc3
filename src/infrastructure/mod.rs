//! Infrastructure layer - Engine and provider implementations

pub mod embedding;
pub mod engine;
pub mod http_client;
pub mod llm;
pub mod vector_store;
pub mod web_search;
