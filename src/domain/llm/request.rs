//! Generation request parameters

use crate::domain::execution::ChatMessage;

/// Sampling temperature used when a node does not configure one
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Parameters for one LLM generation call.
///
/// Credentials travel with the request because the API key is resolved per
/// node (node-level override, else run-level config) rather than fixed at
/// provider construction.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    model: String,
    api_key: String,
    query: String,
    context: Option<String>,
    system_prompt: Option<String>,
    temperature: f32,
    chat_history: Vec<ChatMessage>,
}

impl GenerationRequest {
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.chat_history
    }

    /// Replace the context, keeping everything else
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Builder for [`GenerationRequest`]
#[derive(Debug, Default)]
pub struct GenerationRequestBuilder {
    model: String,
    api_key: String,
    query: String,
    context: Option<String>,
    system_prompt: Option<String>,
    temperature: Option<f32>,
    chat_history: Vec<ChatMessage>,
}

impl GenerationRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    pub fn system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn chat_history(mut self, chat_history: Vec<ChatMessage>) -> Self {
        self.chat_history = chat_history;
        self
    }

    pub fn build(self) -> GenerationRequest {
        GenerationRequest {
            model: self.model,
            api_key: self.api_key,
            query: self.query,
            context: self.context,
            system_prompt: self.system_prompt,
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            chat_history: self.chat_history,
        }
    }
}
