//! Tolerant JSON extraction for model output.
//!
//! Models wrap JSON in markdown fences, prefix it with a language tag, or trail
//! it with prose. [`extract_json`] peels those layers before parsing;
//! [`extract_json_or_error`] turns a parse failure into an `{error, raw}` value
//! that callers pass along as data.

use serde_json::{json, Value};

const FENCE: &str = "```";

/// A parse failure, keeping the text that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonExtractError {
    pub message: String,
    pub raw: String,
}

impl std::fmt::Display for JsonExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for JsonExtractError {}

impl JsonExtractError {
    /// The `{error, raw}` soft-failure record.
    pub fn to_value(&self) -> Value {
        json!({ "error": self.message, "raw": self.raw })
    }
}

/// Remove a surrounding fence and a leading bare `json` tag line.
pub fn strip_fences(text: &str) -> &str {
    let mut body = text.trim();

    if body.len() >= 2 * FENCE.len() && body.starts_with(FENCE) && body.ends_with(FENCE) {
        match (body.find('\n'), body.rfind('\n')) {
            (Some(first), Some(last)) if first < last => body = &body[first + 1..last],
            (Some(first), Some(_)) => body = &body[first + 1..],
            _ => body = body.trim_matches('`'),
        }
        body = body.trim();
    }

    let (first_line, rest) = match body.split_once('\n') {
        Some((line, rest)) => (line, rest),
        None => (body, ""),
    };
    if first_line.trim().eq_ignore_ascii_case("json") {
        body = rest.trim();
    }

    body
}

/// Parse model output as JSON after stripping fences and a language tag.
///
/// When strict parsing fails and the body opens with `{` or `[`, the first
/// complete JSON value is accepted and anything after it ignored.
pub fn extract_json(text: &str) -> Result<Value, JsonExtractError> {
    let trimmed = text.trim();
    let body = strip_fences(trimmed);

    match serde_json::from_str::<Value>(body) {
        Ok(value) => Ok(value),
        Err(strict) => {
            if body.starts_with('{') || body.starts_with('[') {
                let mut stream = serde_json::Deserializer::from_str(body).into_iter::<Value>();
                if let Some(Ok(value)) = stream.next() {
                    return Ok(value);
                }
            }
            Err(JsonExtractError {
                message: strict.to_string(),
                raw: trimmed.to_string(),
            })
        }
    }
}

/// [`extract_json`], with failures folded into an `{error, raw}` value.
pub fn extract_json_or_error(text: &str) -> Value {
    match extract_json(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                error = %e.message,
                raw_preview = %preview(&e.raw, 200),
                "Model output was not valid JSON"
            );
            e.to_value()
        }
    }
}

/// True for the `{error, ...}` soft-failure shape.
pub fn is_error_record(value: &Value) -> bool {
    value.get("error").is_some()
}

/// At most `max_chars` characters of `text`, for logging.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
