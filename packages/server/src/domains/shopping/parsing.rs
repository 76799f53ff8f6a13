//! Reading shopping suggestions out of model text.
//!
//! Three strategies run in a fixed order and the first that recognizes the
//! text wins: a fenced JSON block, bare JSON, then line-by-line regexes.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::models::ShoppingItem;
use crate::common::{extract_json, json::strip_fences};

/// Reason used when the model gave none.
pub const DEFAULT_REASON: &str = "No description provided.";

lazy_static! {
    static ref PRICED_LINE_RE: Regex = Regex::new(
        r"^\s*[-*•]\s*(?P<name>[^:]+):\s*(?P<reason>.*?)\s*\(from \$(?P<low>[\d,]+(?:\.\d+)?)\s*-\s*\$(?P<high>[\d,]+(?:\.\d+)?)\)\s*$"
    )
    .expect("priced line regex is valid");
    static ref PLAIN_LINE_RE: Regex =
        Regex::new(r"^\s*[-*•]\s*(?P<name>[^:]+):\s*(?P<reason>.*?)\s*$")
            .expect("plain line regex is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// JSON inside the first triple-backtick block
    FencedJson,
    /// The whole text as JSON
    BareJson,
    /// `- Name: Reason (from $X - $Y)` and `- Name: Reason` lines
    LineRegex,
}

/// Strategies in the order they are attempted.
pub const STRATEGIES: [ParseStrategy; 3] = [
    ParseStrategy::FencedJson,
    ParseStrategy::BareJson,
    ParseStrategy::LineRegex,
];

impl ParseStrategy {
    /// Uncleaned suggestions, or `None` when this strategy does not apply.
    pub fn parse(self, text: &str) -> Option<Vec<ShoppingItem>> {
        match self {
            Self::FencedJson => {
                let block = text.split("```").nth(1)?;
                let value = extract_json(strip_fences(block)).ok()?;
                items_from_json(value)
            }
            Self::BareJson => items_from_json(extract_json(text).ok()?),
            Self::LineRegex => {
                let items: Vec<ShoppingItem> = text.lines().filter_map(parse_line).collect();
                (!items.is_empty()).then_some(items)
            }
        }
    }
}

/// Run [`STRATEGIES`] in order and clean the first result. Unrecognized text
/// yields an empty list.
pub fn parse_suggestions(text: &str) -> Vec<ShoppingItem> {
    for strategy in STRATEGIES {
        if let Some(items) = strategy.parse(text) {
            tracing::debug!(?strategy, count = items.len(), "Parsed shopping suggestions");
            return items.into_iter().filter_map(clean_item).collect();
        }
    }

    tracing::warn!(
        preview = %crate::common::json::preview(text, 200),
        "Shopping suggestions were not recognizable"
    );
    Vec::new()
}

/// Trim fields, default the reason, and drop nameless items.
pub fn clean_item(mut item: ShoppingItem) -> Option<ShoppingItem> {
    item.item = item.item.trim().to_string();
    if item.item.is_empty() {
        return None;
    }

    item.reason = item.reason.trim().to_string();
    if item.reason.is_empty() {
        item.reason = DEFAULT_REASON.to_string();
    }
    Some(item)
}

/// An object becomes one item, an array its object elements. Anything else
/// is not a suggestion list.
fn items_from_json(value: Value) -> Option<Vec<ShoppingItem>> {
    let entries = match value {
        Value::Object(_) => vec![value],
        Value::Array(entries) => entries,
        _ => return None,
    };

    Some(entries.iter().filter_map(item_from_json).collect())
}

fn item_from_json(entry: &Value) -> Option<ShoppingItem> {
    let name = entry.get("item")?.as_str()?;
    let reason = entry.get("reason").and_then(Value::as_str).unwrap_or_default();

    let mut item = ShoppingItem::new(name, reason);
    item.price_low = entry.get("price_low").and_then(Value::as_f64);
    item.price_high = entry.get("price_high").and_then(Value::as_f64);
    Some(item)
}

fn parse_line(line: &str) -> Option<ShoppingItem> {
    if let Some(caps) = PRICED_LINE_RE.captures(line) {
        let mut item = ShoppingItem::new(&caps["name"], &caps["reason"]);
        item.price_low = parse_amount(&caps["low"]);
        item.price_high = parse_amount(&caps["high"]);
        return Some(item);
    }

    PLAIN_LINE_RE
        .captures(line)
        .map(|caps| ShoppingItem::new(&caps["name"], &caps["reason"]))
}

fn parse_amount(text: &str) -> Option<f64> {
    text.replace(',', "").parse().ok()
}
