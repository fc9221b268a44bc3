//! Web search provider implementations

mod brave;
mod serpapi;
mod service;

pub use brave::BraveSearchClient;
pub use serpapi::SerpApiClient;
pub use service::{SearchHit, WebSearchService};
