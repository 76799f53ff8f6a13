// AI implementation using OpenAI
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient, ResponsesRequest};

use super::{BaseAI, ModelRequest, ModelResponse};

/// OpenAI implementation of AI capabilities
#[derive(Clone)]
pub struct OpenAIModel {
    client: OpenAIClient,
    model: String,
}

impl OpenAIModel {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl BaseAI for OpenAIModel {
    async fn complete(&self, messages: Vec<Message>, temperature: Option<f32>) -> Result<String> {
        let mut request = ChatRequest::new(&self.model).messages(messages);
        if let Some(temperature) = temperature {
            request = request.temperature(temperature);
        }

        tracing::debug!(model = %self.model, "Calling OpenAI chat completion");

        let response = self
            .client
            .chat_completion(request)
            .await
            .context("OpenAI chat completion failed")?;

        Ok(response.content)
    }

    async fn respond(&self, request: ModelRequest) -> Result<ModelResponse> {
        let mut wire = ResponsesRequest::new(&self.model).messages(request.messages);
        for tool in &request.tools {
            wire = wire.tool(tool);
        }
        if request.web_search {
            wire = wire.web_search();
        }

        tracing::debug!(
            model = %self.model,
            tool_count = request.tools.len(),
            web_search = request.web_search,
            "Calling OpenAI responses"
        );

        let response = self
            .client
            .create_response(wire)
            .await
            .context("OpenAI responses call failed")?;

        Ok(ModelResponse {
            text: response.output_text(),
            tool_calls: response.tool_calls(),
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
