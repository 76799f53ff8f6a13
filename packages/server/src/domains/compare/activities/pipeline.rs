//! Comparison pipeline: fan out item searches, then compile once.

use std::time::Instant;

use anyhow::{Context, Result};
use futures::future::join_all;
use openai_client::Message;
use serde_json::Value;
use tracing::info;

use super::{compile_comparison, search_item};
use crate::common::extract_json_or_error;
use crate::domains::compare::models::{ComparisonInput, ItemRecord};
use crate::kernel::{ModelRequest, ServerDeps};

/// Run whichever pipeline shape `input` calls for.
pub async fn compare(input: ComparisonInput, deps: &ServerDeps) -> Result<Value> {
    match input {
        ComparisonInput::Pair(first, second) => compare_pair(&first, &second, deps).await,
        ComparisonInput::Records(records) => compare_records(&records, deps).await,
        ComparisonInput::Names(names) => search_and_compile(&names, deps).await,
    }
}

/// Search every item concurrently, then compile the results.
///
/// Records reach the compile call in the order of `items`, whatever order the
/// searches finish in. A failed search contributes an error record.
pub async fn search_and_compile(items: &[String], deps: &ServerDeps) -> Result<Value> {
    let started = Instant::now();
    info!(count = items.len(), "Searching items for comparison");

    let records: Vec<ItemRecord> = join_all(items.iter().map(|item| search_item(item, deps))).await;

    let failed = records.iter().filter(|r| r.is_error()).count();
    info!(
        count = records.len(),
        failed,
        duration_ms = started.elapsed().as_millis() as u64,
        "Item searches finished"
    );

    let records: Vec<Value> = records.into_iter().map(ItemRecord::into_value).collect();
    compile_comparison(&records, deps).await
}

/// Compile pre-fetched records without searching.
pub async fn compare_records(records: &[Value], deps: &ServerDeps) -> Result<Value> {
    info!(count = records.len(), "Compiling pre-fetched records");
    compile_comparison(records, deps).await
}

/// Two-item comparison in a single web-search call.
pub async fn compare_pair(first: &str, second: &str, deps: &ServerDeps) -> Result<Value> {
    let request = ModelRequest::new(vec![
        Message::system(deps.prompts.compare.clone()),
        Message::user(format!("Compare {} and {}", first, second)),
    ])
    .with_web_search(true);

    let response = deps
        .ai
        .respond(request)
        .await
        .context("Pair comparison call failed")?;

    info!(first, second, "Pair comparison complete");
    Ok(extract_json_or_error(&response.text))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domains::compare::activities::item_search::search_message;
    use crate::kernel::test_dependencies::{MockAI, MockReply};
    use crate::kernel::TestDependencies;
    use serde_json::json;

    fn compile_payload(message: &str) -> Vec<Value> {
        let (_, payload) = message.split_once('\n').unwrap();
        serde_json::from_str(payload).unwrap()
    }

    #[tokio::test]
    async fn test_n_searches_then_one_compile() {
        let ai = MockAI::new()
            .with_keyed_reply("about: ", MockReply::text(r#"{"price": "$10.00"}"#))
            .with_response(r#"{"table": [], "distinctions": "d", "recommend": "r"}"#);
        let test_deps = TestDependencies::new().mock_ai(ai);
        let mock = test_deps.ai.clone();
        let deps = test_deps.into_deps();

        let items = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let result = search_and_compile(&items, &deps).await.unwrap();

        assert_eq!(result["distinctions"], "d");

        let calls = mock.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls[..3].iter().all(|c| c.web_search));
        let compile = &calls[3];
        assert!(!compile.web_search);
        assert!(compile.tools.is_empty());
        assert_eq!(compile.system_message(), Some(deps.prompts.compile.as_str()));
    }

    #[tokio::test]
    async fn test_compile_order_matches_input_when_middle_item_is_slow() {
        let ai = MockAI::new()
            .with_keyed_reply("about: A", MockReply::text(r#"{"rank": 1}"#))
            .with_keyed_reply(
                "about: B",
                MockReply::text(r#"{"rank": 2}"#).delayed(Duration::from_millis(50)),
            )
            .with_keyed_reply("about: C", MockReply::text(r#"{"rank": 3}"#))
            .with_response(r#"{"table": []}"#);
        let test_deps = TestDependencies::new().mock_ai(ai);
        let mock = test_deps.ai.clone();
        let deps = test_deps.into_deps();

        let items = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        search_and_compile(&items, &deps).await.unwrap();

        let order = mock.completion_order();
        assert_eq!(order[2], search_message("B"));

        let compile = mock.last_call().unwrap();
        let records = compile_payload(compile.user_message().unwrap());
        let names: Vec<&str> = records.iter().map(|r| r["item"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(records[1]["rank"], 2);
    }

    #[tokio::test]
    async fn test_failed_item_flows_into_compile_as_data() {
        let ai = MockAI::new()
            .with_keyed_reply("about: Good", MockReply::text(r#"{"price": "$5.00"}"#))
            .with_keyed_reply("about: Bad", MockReply::failure("timeout"))
            .with_response(r#"{"table": []}"#);
        let test_deps = TestDependencies::new().mock_ai(ai);
        let mock = test_deps.ai.clone();
        let deps = test_deps.into_deps();

        let items = vec!["Good".to_string(), "Bad".to_string()];
        let result = search_and_compile(&items, &deps).await.unwrap();
        assert_eq!(result, json!({"table": []}));

        let records = compile_payload(mock.last_call().unwrap().user_message().unwrap());
        assert_eq!(records[0]["price"], "$5.00");
        assert_eq!(records[1]["item"], "Bad");
        assert_eq!(records[1]["error"], "timeout");
    }

    #[tokio::test]
    async fn test_records_skip_search_phase() {
        let ai = MockAI::new().with_response("```json\n{\"table\": [{\"item\": \"X\"}]}\n```");
        let test_deps = TestDependencies::new().mock_ai(ai);
        let mock = test_deps.ai.clone();
        let deps = test_deps.into_deps();

        let input = ComparisonInput::Records(vec![json!({"item": "X", "price": "$1.00"})]);
        let result = compare(input, &deps).await.unwrap();

        assert_eq!(result["table"][0]["item"], "X");
        assert_eq!(mock.call_count(), 1);
        assert!(!mock.last_call().unwrap().web_search);
    }

    #[tokio::test]
    async fn test_pair_uses_single_web_search_call() {
        let ai = MockAI::new().with_response(r#"{"table": [], "recommend": "either"}"#);
        let test_deps = TestDependencies::new().mock_ai(ai);
        let mock = test_deps.ai.clone();
        let deps = test_deps.into_deps();

        let input = ComparisonInput::Pair("iPad".into(), "Galaxy Tab".into());
        let result = compare(input, &deps).await.unwrap();

        assert_eq!(result["recommend"], "either");
        let call = mock.last_call().unwrap();
        assert_eq!(mock.call_count(), 1);
        assert!(call.web_search);
        assert_eq!(call.user_message(), Some("Compare iPad and Galaxy Tab"));
        assert_eq!(call.system_message(), Some(deps.prompts.compare.as_str()));
    }

    #[tokio::test]
    async fn test_unparseable_compile_output_is_soft_failure() {
        let ai = MockAI::new().with_response("Here is your comparison!");
        let deps = TestDependencies::new().mock_ai(ai).into_deps();

        let input = ComparisonInput::Records(vec![json!({"item": "X"})]);
        let result = compare(input, &deps).await.unwrap();

        assert!(result.get("error").is_some());
        assert_eq!(result["raw"], "Here is your comparison!");
    }

    #[tokio::test]
    async fn test_compile_transport_failure_propagates() {
        let ai = MockAI::new().with_failure("upstream 503");
        let deps = TestDependencies::new().mock_ai(ai).into_deps();

        let input = ComparisonInput::Records(vec![json!({"item": "X"})]);
        assert!(compare(input, &deps).await.is_err());
    }
}
