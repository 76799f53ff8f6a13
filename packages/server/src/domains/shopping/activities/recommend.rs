//! Shopping-list recommendations that never repeat an accepted or rejected item.

use std::collections::HashSet;

use anyhow::{Context, Result};
use openai_client::Message;
use tracing::{debug, info};

use crate::domains::shopping::models::{ItemRef, ShoppingItem};
use crate::domains::shopping::parsing::parse_suggestions;
use crate::kernel::ServerDeps;

/// Sampling temperature for recommendation calls.
pub const RECOMMEND_TEMPERATURE: f32 = 0.2;

/// Names to exclude, accepted first, in first-seen order.
pub fn excluded_names(accepted: &[ItemRef], rejected: &[ItemRef]) -> Vec<String> {
    let mut seen = HashSet::new();
    accepted
        .iter()
        .chain(rejected)
        .filter_map(ItemRef::name)
        .map(str::trim)
        .filter(|name| !name.is_empty() && seen.insert(normalize(name)))
        .map(str::to_string)
        .collect()
}

/// User prompt asking for `count` items while excluding `excluded`.
pub fn build_prompt(event: &str, excluded: &[String], count: usize) -> Result<String> {
    let excluded = serde_json::to_string(excluded).context("Failed to encode excluded items")?;
    let plural = if count > 1 { "s" } else { "" };

    Ok(format!(
        r#"You are a helpful shopping assistant. A user is preparing for an {event}.

Recommend {count} essential item{plural}.
Do NOT include any of the following:
{excluded}

Respond with ONLY valid JSON, enclosed in triple backticks, like this:
```json
[
  {{
    "item": "Item name",
    "reason": "Very short reason"
  }}
]
```
The 'reason' should be a very concise, 1-6 word explanation."#
    ))
}

/// Ask for `count` new items for `event`.
///
/// Items already accepted or rejected are removed whatever the model returns,
/// as are repeats within the reply. Surviving items are enriched with lookup
/// prices and images when enabled. Model transport failures propagate.
pub async fn recommend_items(
    event: &str,
    accepted: &[ItemRef],
    rejected: &[ItemRef],
    count: usize,
    deps: &ServerDeps,
) -> Result<Vec<ShoppingItem>> {
    let excluded = excluded_names(accepted, rejected);
    let prompt = build_prompt(event, &excluded, count)?;

    let messages = vec![
        Message::system(deps.prompts.shopping_system.clone()),
        Message::user(prompt),
    ];
    let raw = deps
        .ai
        .complete(messages, Some(RECOMMEND_TEMPERATURE))
        .await
        .context("Shopping recommendation call failed")?;

    let mut seen: HashSet<String> = excluded.iter().map(|n| normalize(n)).collect();
    let mut items: Vec<ShoppingItem> = parse_suggestions(&raw)
        .into_iter()
        .filter(|item| {
            let fresh = seen.insert(normalize(&item.item));
            if !fresh {
                debug!(item = %item.item, "Dropping repeated recommendation");
            }
            fresh
        })
        .collect();

    if deps.features.enrich_shopping_prices && deps.products.is_enabled() {
        for item in &mut items {
            let info = deps.products.lookup(&item.item).await;
            item.merge_price_info(&info);
        }
    }

    info!(event, requested = count, count = items.len(), "Shopping recommendations ready");
    Ok(items)
}

/// First surviving single recommendation, if any.
pub async fn recommend_next_item(
    event: &str,
    accepted: &[ItemRef],
    rejected: &[ItemRef],
    deps: &ServerDeps,
) -> Result<Option<ShoppingItem>> {
    let items = recommend_items(event, accepted, rejected, 1, deps).await?;
    Ok(items.into_iter().next())
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
