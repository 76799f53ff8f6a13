// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{Message, ToolCall};
use serpapi_client::ShoppingResult;

use super::{
    BaseAI, BaseProductSearch, CachePolicy, Features, ModelRequest, ModelResponse, Prompts,
    ServerDeps,
};
use crate::domains::products::ProductLookup;

// =============================================================================
// Mock AI (Generic LLM capabilities)
// =============================================================================

/// A canned model reply.
#[derive(Debug, Clone, Default)]
pub struct MockReply {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    pub delay: Option<Duration>,
    pub error: Option<String>,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn tool_call(name: &str, arguments: serde_json::Value) -> Self {
        Self {
            tool_calls: vec![ToolCall::new(name, arguments.to_string())],
            ..Default::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Which trait method a recorded call went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Complete,
    Respond,
}

/// Arguments captured from a model call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub messages: Vec<Message>,
    pub tools: Vec<String>,
    pub web_search: bool,
    pub temperature: Option<f32>,
}

impl RecordedCall {
    pub fn system_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_str())
    }

    pub fn user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
    }
}

pub struct MockAI {
    queued: Arc<Mutex<VecDeque<MockReply>>>,
    keyed: Arc<Mutex<Vec<(String, MockReply)>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    completion_order: Arc<Mutex<Vec<String>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            queued: Arc::new(Mutex::new(VecDeque::new())),
            keyed: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            completion_order: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.with_reply(MockReply::text(response))
    }

    /// Queue a response containing a single function call
    pub fn with_tool_call(self, name: &str, arguments: serde_json::Value) -> Self {
        self.with_reply(MockReply::tool_call(name, arguments))
    }

    /// Queue a transport failure
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.with_reply(MockReply::failure(message))
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.queued.lock().unwrap().push_back(reply);
        self
    }

    /// Answer any call whose last user message contains `needle`.
    /// Keyed replies are reusable and take precedence over the queue.
    pub fn with_keyed_reply(self, needle: impl Into<String>, reply: MockReply) -> Self {
        self.keyed.lock().unwrap().push((needle.into(), reply));
        self
    }

    /// Get all calls made to the AI
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the last call made to the AI
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Check if a user message containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.user_message().is_some_and(|m| m.contains(text)))
    }

    /// User messages in the order their replies were delivered
    pub fn completion_order(&self) -> Vec<String> {
        self.completion_order.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) -> MockReply {
        let user = call.user_message().unwrap_or_default().to_string();
        self.calls.lock().unwrap().push(call);

        let keyed = self
            .keyed
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| user.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        keyed
            .or_else(|| self.queued.lock().unwrap().pop_front())
            .unwrap_or_else(|| MockReply::text("Mock AI response"))
    }

    async fn deliver(&self, user: String, reply: MockReply) -> Result<ModelResponse> {
        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        self.completion_order.lock().unwrap().push(user);

        if let Some(error) = reply.error {
            anyhow::bail!(error);
        }
        Ok(ModelResponse {
            text: reply.text,
            tool_calls: reply.tool_calls,
        })
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, messages: Vec<Message>, temperature: Option<f32>) -> Result<String> {
        let call = RecordedCall {
            kind: CallKind::Complete,
            messages,
            tools: Vec::new(),
            web_search: false,
            temperature,
        };
        let user = call.user_message().unwrap_or_default().to_string();
        let reply = self.record(call);

        Ok(self.deliver(user, reply).await?.text)
    }

    async fn respond(&self, request: ModelRequest) -> Result<ModelResponse> {
        let call = RecordedCall {
            kind: CallKind::Respond,
            tools: request.tools.iter().map(|t| t.name.clone()).collect(),
            web_search: request.web_search,
            temperature: None,
            messages: request.messages,
        };
        let user = call.user_message().unwrap_or_default().to_string();
        let reply = self.record(call);

        self.deliver(user, reply).await
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

// =============================================================================
// Mock Product Search
// =============================================================================

pub struct MockProductSearch {
    results: Mutex<HashMap<String, Vec<ShoppingResult>>>,
    images: Mutex<HashMap<String, String>>,
    failing: bool,
    shopping_calls: Mutex<Vec<String>>,
}

impl MockProductSearch {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(HashMap::new()),
            images: Mutex::new(HashMap::new()),
            failing: false,
            shopping_calls: Mutex::new(Vec::new()),
        }
    }

    /// Shopping results returned for an exact query
    pub fn with_results(self, query: &str, results: Vec<ShoppingResult>) -> Self {
        self.results.lock().unwrap().insert(query.to_string(), results);
        self
    }

    /// Single shopping result with a price text and optional thumbnail
    pub fn with_price(self, query: &str, price: &str, thumbnail: Option<&str>) -> Self {
        let result = ShoppingResult {
            title: Some(query.to_string()),
            price: Some(price.to_string()),
            thumbnail: thumbnail.map(str::to_string),
            ..Default::default()
        };
        self.with_results(query, vec![result])
    }

    /// Image search result for an exact query
    pub fn with_image(self, query: &str, url: &str) -> Self {
        self.images
            .lock()
            .unwrap()
            .insert(query.to_string(), url.to_string());
        self
    }

    /// Every search fails
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Get all shopping queries that were searched
    pub fn shopping_calls(&self) -> Vec<String> {
        self.shopping_calls.lock().unwrap().clone()
    }

    pub fn shopping_call_count(&self, query: &str) -> usize {
        self.shopping_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.as_str() == query)
            .count()
    }
}

impl Default for MockProductSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseProductSearch for MockProductSearch {
    async fn search_shopping(&self, query: &str) -> Result<Vec<ShoppingResult>> {
        self.shopping_calls.lock().unwrap().push(query.to_string());
        if self.failing {
            anyhow::bail!("mock product search failure");
        }
        Ok(self
            .results
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn search_image(&self, query: &str) -> Result<Option<String>> {
        if self.failing {
            anyhow::bail!("mock image search failure");
        }
        Ok(self.images.lock().unwrap().get(query).cloned())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub ai: Arc<MockAI>,
    pub product_search: Arc<MockProductSearch>,
    pub prompts: Prompts,
    pub features: Features,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            ai: Arc::new(MockAI::new()),
            product_search: Arc::new(MockProductSearch::new()),
            prompts: Prompts::embedded(),
            features: Features::default(),
        }
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    /// Set a mock product search
    pub fn mock_product_search(mut self, search: MockProductSearch) -> Self {
        self.product_search = Arc::new(search);
        self
    }

    pub fn features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Convert into ServerDeps for testing
    pub fn into_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.ai,
            Arc::new(ProductLookup::new(self.product_search, CachePolicy::default())),
            self.prompts,
            self.features,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
