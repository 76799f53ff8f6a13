//! One chat turn: ask the model with the tool catalog attached and turn
//! whatever comes back into exactly one envelope.
//!
//! The model does not always call a tool. Replies degrade through three levels:
//! the first tool call, an inline JSON object naming a tool, then the raw text
//! as an open-ended question.

use anyhow::{Context, Result};
use futures::future::join_all;
use openai_client::Message;
use serde_json::Value;
use tracing::{debug, info};

use crate::common::extract_json;
use crate::domains::chat::envelope::{Recommendation, ToolEnvelope};
use crate::domains::chat::tools::{ChatTool, ToolCatalog};
use crate::kernel::{ModelRequest, ModelResponse, ServerDeps};

/// Reasoning attached when the reply could not be read.
pub const FALLBACK_REASONING: &str = "The previous message could not be parsed, please try again.";

/// Run one turn for `message` on top of `history`.
///
/// Model transport failures propagate; everything after the call degrades
/// instead of failing.
pub async fn chat_turn(
    message: &str,
    history: &[Message],
    catalog: &ToolCatalog,
    deps: &ServerDeps,
) -> Result<ToolEnvelope> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(deps.prompts.chatbot.clone()));
    messages.extend_from_slice(history);
    messages.push(Message::user(message));

    let request = ModelRequest::new(messages)
        .with_tools(catalog.definitions().to_vec())
        .with_web_search(deps.features.chat_web_search);

    let response = deps.ai.respond(request).await.context("Chat model call failed")?;
    let envelope = resolve_envelope(&response, message, catalog);

    let envelope = match envelope {
        ToolEnvelope::RecommendationsList { recommendations }
            if deps.features.enrich_recommendation_images && deps.products.is_enabled() =>
        {
            ToolEnvelope::RecommendationsList {
                recommendations: attach_images(recommendations, deps).await,
            }
        }
        other => other,
    };

    info!(envelope = envelope.tag(), history = history.len(), "Chat turn resolved");
    Ok(envelope)
}

/// Map a model reply to an envelope without any further calls.
pub fn resolve_envelope(response: &ModelResponse, message: &str, catalog: &ToolCatalog) -> ToolEnvelope {
    if let Some(call) = response.tool_calls.first() {
        if response.tool_calls.len() > 1 {
            debug!(discarded = response.tool_calls.len() - 1, "Ignoring extra tool calls");
        }
        if let Some(envelope) = catalog.dispatch(call) {
            return envelope;
        }
    }

    if let Some(envelope) = inline_envelope(&response.text) {
        debug!(envelope = envelope.tag(), "Recovered envelope from inline JSON");
        return envelope;
    }

    ToolEnvelope::QuestionOpenEnded {
        question: response.text.clone(),
        reasoning: FALLBACK_REASONING.to_string(),
        original_message: Some(message.to_string()),
    }
}

/// An envelope from text that opens with a JSON object whose `type` is a tool
/// name (either spelling) or an envelope tag.
pub fn inline_envelope(text: &str) -> Option<ToolEnvelope> {
    if !text.trim_start().starts_with('{') {
        return None;
    }

    let value = extract_json(text).ok()?;
    let kind = value.get("type").and_then(Value::as_str)?;

    match ChatTool::from_name(kind) {
        Some(tool) => tool.envelope(&value).ok(),
        None => serde_json::from_value(value).ok(),
    }
}

/// Fill in missing recommendation images from product lookups, concurrently.
async fn attach_images(recommendations: Vec<Recommendation>, deps: &ServerDeps) -> Vec<Recommendation> {
    join_all(recommendations.into_iter().map(|mut rec| async move {
        if rec.image.is_none() {
            rec.image = deps.products.lookup(&rec.text).await.image;
        }
        rec
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::{MockAI, MockProductSearch};
    use crate::kernel::{Features, TestDependencies};
    use openai_client::ToolCall;
    use serde_json::json;

    fn catalog() -> ToolCatalog {
        ToolCatalog::new().unwrap()
    }

    #[test]
    fn test_inline_user_report_without_tool_call() {
        let response = ModelResponse::text(r#"{"type":"createUserReport","message":"done"}"#);
        let envelope = resolve_envelope(&response, "summarize please", &catalog());
        assert_eq!(envelope, ToolEnvelope::UserReport { message: "done".into() });
    }

    #[test]
    fn test_prose_becomes_open_ended_question() {
        let response = ModelResponse::text("What will you mostly use it for?");
        let envelope = resolve_envelope(&response, "I want a laptop", &catalog());
        assert_eq!(
            envelope,
            ToolEnvelope::QuestionOpenEnded {
                question: "What will you mostly use it for?".into(),
                reasoning: FALLBACK_REASONING.into(),
                original_message: Some("I want a laptop".into()),
            }
        );
    }

    #[test]
    fn test_requirement_confirmation_suppressed() {
        let response = ModelResponse {
            text: String::new(),
            tool_calls: vec![ToolCall::new(
                "addUserRequirement",
                json!({"requirement": "Requirement added: need a laptop"}).to_string(),
            )],
        };
        assert_eq!(resolve_envelope(&response, "x", &catalog()), ToolEnvelope::Noop);
    }

    #[test]
    fn test_only_first_tool_call_is_used() {
        let response = ModelResponse {
            text: String::new(),
            tool_calls: vec![
                ToolCall::new("addUserConstraint", json!({"constraint": "under $800"}).to_string()),
                ToolCall::new("createUserReport", json!({"message": "ignored"}).to_string()),
            ],
        };
        assert_eq!(
            resolve_envelope(&response, "x", &catalog()),
            ToolEnvelope::UserConstraint { constraint: "under $800".into() }
        );
    }

    #[test]
    fn test_bad_tool_arguments_fall_through_to_text() {
        let response = ModelResponse {
            text: r#"{"type": "create_multiple_choice", "question": "Size?", "reason": "Fit", "options": ["13\"", "15\""]}"#.into(),
            tool_calls: vec![ToolCall::new("createMultipleChoice", "{broken")],
        };
        assert!(matches!(
            resolve_envelope(&response, "x", &catalog()),
            ToolEnvelope::QuestionMultipleChoice { ref options, .. } if options.len() == 2
        ));
    }

    #[test]
    fn test_inline_envelope_tags_are_accepted() {
        let envelope = inline_envelope(r#"{"type": "noop"}"#).unwrap();
        assert_eq!(envelope, ToolEnvelope::Noop);

        let envelope = inline_envelope(
            r#"{"type": "question_open_ended", "question": "Budget?", "reasoning": "Scope"} thanks"#,
        )
        .unwrap();
        assert!(matches!(envelope, ToolEnvelope::QuestionOpenEnded { .. }));
    }

    #[test]
    fn test_inline_question_without_reason() {
        let response =
            ModelResponse::text(r#"{"type":"createOpenEndedQuestion","question":"What is your budget?"}"#);
        let envelope = resolve_envelope(&response, "I need a phone", &catalog());
        assert_eq!(
            envelope,
            ToolEnvelope::QuestionOpenEnded {
                question: "What is your budget?".into(),
                reasoning: String::new(),
                original_message: None,
            }
        );
    }

    #[test]
    fn test_inline_unknown_type_falls_back() {
        let response = ModelResponse::text(r#"{"type": "somethingElse", "foo": 1}"#);
        assert!(matches!(
            resolve_envelope(&response, "x", &catalog()),
            ToolEnvelope::QuestionOpenEnded { ref reasoning, .. } if reasoning == FALLBACK_REASONING
        ));
    }

    #[tokio::test]
    async fn test_turn_sends_history_and_tools() {
        let ai = MockAI::new().with_tool_call(
            "createMultipleChoice",
            json!({"question": "Which OS?", "reason": "Narrow down", "options": ["macOS", "Windows"]}),
        );
        let test_deps = TestDependencies::new().mock_ai(ai);
        let mock = test_deps.ai.clone();
        let deps = test_deps.into_deps();

        let history = vec![Message::user("hello"), Message::assistant(r#"{"type":"noop"}"#)];
        let envelope = chat_turn("I need a laptop", &history, &catalog(), &deps).await.unwrap();

        assert_eq!(envelope.tag(), "question_multiple_choice");

        let call = mock.last_call().unwrap();
        assert_eq!(call.tools.len(), 8);
        assert!(!call.web_search);
        assert_eq!(call.messages.len(), 4);
        assert_eq!(call.messages[0].content, deps.prompts.chatbot);
        assert_eq!(call.messages[1].content, "hello");
        assert_eq!(call.user_message(), Some("I need a laptop"));
    }

    #[tokio::test]
    async fn test_recommendations_get_images() {
        let ai = MockAI::new().with_tool_call(
            "createRecommendations",
            json!({"recommendations": [
                {"text": "Dell XPS 13", "specs": "16GB", "price": "$999", "ratings": "4.5"},
                {"text": "MacBook Air", "specs": "M3", "price": "$1099", "ratings": "4.8", "image": "https://given.jpg"}
            ]}),
        );
        let search = MockProductSearch::new().with_price("Dell XPS 13", "$999.00", Some("https://xps.jpg"));
        let test_deps = TestDependencies::new().mock_ai(ai).mock_product_search(search);
        let product_search = test_deps.product_search.clone();
        let deps = test_deps.into_deps();

        let envelope = chat_turn("recommend", &[], &catalog(), &deps).await.unwrap();

        let ToolEnvelope::RecommendationsList { recommendations } = envelope else {
            panic!("expected recommendations");
        };
        assert_eq!(recommendations[0].image.as_deref(), Some("https://xps.jpg"));
        assert_eq!(recommendations[1].image.as_deref(), Some("https://given.jpg"));
        assert_eq!(recommendations[0].details["price"], "$999");
        assert_eq!(product_search.shopping_call_count("MacBook Air"), 0);
    }

    #[tokio::test]
    async fn test_image_enrichment_can_be_disabled() {
        let ai = MockAI::new().with_tool_call(
            "recommendations",
            json!({"recommendations": [{"text": "Dell XPS 13", "specs": "", "price": "", "ratings": ""}]}),
        );
        let features = Features {
            enrich_recommendation_images: false,
            chat_web_search: true,
            ..Features::default()
        };
        let test_deps = TestDependencies::new().mock_ai(ai).features(features);
        let mock = test_deps.ai.clone();
        let product_search = test_deps.product_search.clone();
        let deps = test_deps.into_deps();

        chat_turn("recommend", &[], &catalog(), &deps).await.unwrap();

        assert!(product_search.shopping_calls().is_empty());
        assert!(mock.last_call().unwrap().web_search);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let ai = MockAI::new().with_failure("503");
        let deps = TestDependencies::new().mock_ai(ai).into_deps();

        assert!(chat_turn("hi", &[], &catalog(), &deps).await.is_err());
    }
}
