// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// What to ask the model, and how to read its answer, lives in the domains.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseProductSearch)

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{Message, ToolCall, ToolDefinition};
use serpapi_client::ShoppingResult;

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

/// A tool-capable model call, independent of the wire API used to make it.
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    /// Full ordered input, system prompt included
    pub messages: Vec<Message>,
    /// Function tools offered to the model
    pub tools: Vec<ToolDefinition>,
    /// Attach the hosted web search capability
    pub web_search: bool,
}

impl ModelRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }
}

/// What came back from a [`ModelRequest`].
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    /// Aggregated output text (may be empty when the model only called tools)
    pub text: String,
    /// Function calls in the order the model emitted them
    pub tool_calls: Vec<ToolCall>,
}

impl ModelResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }
}

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Plain chat completion (returns the assistant text)
    async fn complete(&self, messages: Vec<Message>, temperature: Option<f32>) -> Result<String>;

    /// Call with tools and/or web search attached
    async fn respond(&self, request: ModelRequest) -> Result<ModelResponse>;

    /// Model identifier used for every call
    fn model(&self) -> &str;
}

// =============================================================================
// Product Search Trait (Infrastructure - shopping search provider)
// =============================================================================

#[async_trait]
pub trait BaseProductSearch: Send + Sync {
    /// Shopping results for a free-text query, best match first
    async fn search_shopping(&self, query: &str) -> Result<Vec<ShoppingResult>>;

    /// URL of the first image result for a query
    async fn search_image(&self, query: &str) -> Result<Option<String>>;

    /// False when no provider is configured
    fn is_enabled(&self) -> bool {
        true
    }
}
