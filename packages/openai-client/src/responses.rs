//! Responses API types (`POST /responses`).
//!
//! The Responses API is what exposes the hosted `web_search_preview` tool, so
//! every call that needs live retrieval or function tools goes through here.

use serde::{Deserialize, Serialize};

use crate::tool::{ToolCall, ToolDefinition};
use crate::types::Message;

/// Request body for `POST /responses`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    /// Model to use
    pub model: String,

    /// Ordered conversation input
    pub input: Vec<Message>,

    /// Tool entries, already in wire format
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<serde_json::Value>,
}

impl ResponsesRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: Vec::new(),
            tools: Vec::new(),
        }
    }

    /// Add an input message.
    pub fn message(mut self, message: Message) -> Self {
        self.input.push(message);
        self
    }

    /// Append several input messages in order.
    pub fn messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.input.extend(messages);
        self
    }

    /// Attach a function tool.
    pub fn tool(mut self, definition: &ToolDefinition) -> Self {
        self.tools.push(definition.to_responses_format());
        self
    }

    /// Attach the hosted web search tool.
    pub fn web_search(mut self) -> Self {
        self.tools
            .push(serde_json::json!({ "type": "web_search_preview" }));
        self
    }

    /// True if the hosted web search tool is attached.
    pub fn has_web_search(&self) -> bool {
        self.tools
            .iter()
            .any(|t| t.get("type").and_then(|v| v.as_str()) == Some("web_search_preview"))
    }
}

/// Parsed `POST /responses` result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

/// One entry of `output[]`. Unknown item kinds (web search calls, reasoning)
/// are kept as [`OutputItem::Other`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    FunctionCall {
        name: String,
        #[serde(default)]
        arguments: String,
        #[serde(default)]
        call_id: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    OutputText { text: String },
    #[serde(other)]
    Other,
}

impl Response {
    /// Concatenation of every `output_text` part, in output order.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                _ => None,
            })
            .flatten()
            .filter_map(|part| match part {
                OutputContent::OutputText { text } => Some(text.as_str()),
                OutputContent::Other => None,
            })
            .collect()
    }

    /// Function calls in output order.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::FunctionCall {
                    name,
                    arguments,
                    call_id,
                } => Some(ToolCall {
                    call_id: call_id.clone().unwrap_or_default(),
                    name: name.clone(),
                    arguments: arguments.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let def = ToolDefinition {
            name: "createUserReport".into(),
            description: "report".into(),
            parameters: serde_json::json!({"type": "object"}),
        };
        let req = ResponsesRequest::new("gpt-4o")
            .message(Message::system("sys"))
            .message(Message::user("hi"))
            .tool(&def)
            .web_search();

        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["input"][1]["role"], "user");
        assert_eq!(body["tools"][0]["name"], "createUserReport");
        assert_eq!(body["tools"][1]["type"], "web_search_preview");
        assert!(req.has_web_search());
    }

    #[test]
    fn test_request_without_tools_omits_field() {
        let body = serde_json::to_value(ResponsesRequest::new("gpt-4o")).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_output_text_and_tool_calls() {
        let response: Response = serde_json::from_value(serde_json::json!({
            "id": "resp_1",
            "output": [
                {"type": "web_search_call", "id": "ws_1", "status": "completed"},
                {
                    "type": "message",
                    "role": "assistant",
                    "content": [
                        {"type": "output_text", "text": "Hello ", "annotations": []},
                        {"type": "refusal", "refusal": "no"},
                        {"type": "output_text", "text": "world"}
                    ]
                },
                {
                    "type": "function_call",
                    "call_id": "call_9",
                    "name": "addSources",
                    "arguments": "{\"sources\": []}"
                }
            ]
        }))
        .unwrap();

        assert_eq!(response.output_text(), "Hello world");

        let calls = response.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "addSources");
        assert_eq!(calls[0].call_id, "call_9");
    }

    #[test]
    fn test_empty_output() {
        let response: Response = serde_json::from_str("{}").unwrap();
        assert_eq!(response.output_text(), "");
        assert!(response.tool_calls().is_empty());
    }
}
