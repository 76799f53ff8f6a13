//! Per-item web research.

use openai_client::Message;
use tracing::{info, warn};

use crate::common::{extract_json, json::preview};
use crate::domains::compare::models::ItemRecord;
use crate::kernel::{ModelRequest, ServerDeps};

/// User message sent for one item.
pub fn search_message(item: &str) -> String {
    format!("Search for and return information about: {}", item)
}

/// Research one item with web search enabled.
///
/// Never fails: transport and parse failures come back as an error record
/// stamped with `item`, so one bad item cannot sink a batch.
pub async fn search_item(item: &str, deps: &ServerDeps) -> ItemRecord {
    let request = ModelRequest::new(vec![
        Message::system(deps.prompts.search.clone()),
        Message::user(search_message(item)),
    ])
    .with_web_search(true);

    let response = match deps.ai.respond(request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(item, error = %e, "Item search call failed");
            return ItemRecord::failed(item, e.to_string(), "");
        }
    };

    match extract_json(&response.text) {
        Ok(parsed) => {
            info!(item, "Item search complete");
            ItemRecord::from_parsed(item, parsed)
        }
        Err(e) => {
            warn!(
                item,
                error = %e.message,
                raw_preview = %preview(&e.raw, 200),
                "Item search returned unparseable output"
            );
            ItemRecord::failed(item, e.message, e.raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::{CallKind, MockAI};
    use crate::kernel::TestDependencies;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_stamps_requested_name() {
        let ai = MockAI::new()
            .with_response("```json\n{\"item\": \"Kindle Paperwhite (2024)\", \"price\": \"$159.99\"}\n```");
        let test_deps = TestDependencies::new().mock_ai(ai);
        let mock = test_deps.ai.clone();
        let deps = test_deps.into_deps();

        let record = search_item("Kindle Paperwhite", &deps).await;

        assert_eq!(record.item(), "Kindle Paperwhite");
        assert_eq!(record.get("price"), Some(&json!("$159.99")));

        let call = mock.last_call().unwrap();
        assert_eq!(call.kind, CallKind::Respond);
        assert!(call.web_search);
        assert_eq!(
            call.user_message(),
            Some("Search for and return information about: Kindle Paperwhite")
        );
        assert_eq!(call.system_message(), Some(deps.prompts.search.as_str()));
    }

    #[tokio::test]
    async fn test_parse_failure_becomes_error_record() {
        let ai = MockAI::new().with_response("I could not find that product.");
        let deps = TestDependencies::new().mock_ai(ai).into_deps();

        let record = search_item("Mystery Gadget", &deps).await;

        assert!(record.is_error());
        assert_eq!(record.item(), "Mystery Gadget");
        assert_eq!(record.get("raw"), Some(&json!("I could not find that product.")));
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_error_record() {
        let ai = MockAI::new().with_failure("connection reset");
        let deps = TestDependencies::new().mock_ai(ai).into_deps();

        let record = search_item("Pen", &deps).await;

        assert_eq!(record.error(), Some("connection reset"));
        assert_eq!(record.item(), "Pen");
    }
}
