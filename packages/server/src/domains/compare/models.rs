use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Research result for one requested item.
///
/// Arbitrary model-supplied fields, always carrying `item` set to the name the
/// caller asked for. Failed searches carry `error` (and usually `raw`) instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemRecord(Map<String, Value>);

impl ItemRecord {
    /// Stamp `item` onto a parsed model value. Non-object values are kept
    /// under `result`.
    pub fn from_parsed(item: &str, parsed: Value) -> Self {
        let mut fields = match parsed {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("result".to_string(), other);
                map
            }
        };
        fields.insert("item".to_string(), Value::String(item.to_string()));
        Self(fields)
    }

    /// Error-carrying record for `item`.
    pub fn failed(item: &str, error: impl Into<String>, raw: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("item".to_string(), Value::String(item.to_string()));
        fields.insert("error".to_string(), Value::String(error.into()));
        fields.insert("raw".to_string(), Value::String(raw.into()));
        Self(fields)
    }

    pub fn item(&self) -> &str {
        self.0.get("item").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn error(&self) -> Option<&str> {
        self.0.get("error").and_then(Value::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.0.contains_key("error")
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// The three request shapes a comparison can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonInput {
    /// Two names, compared in one web-search call
    Pair(String, String),
    /// Pre-fetched item records; only the compile phase runs
    Records(Vec<Value>),
    /// Names that each need a search before compiling
    Names(Vec<String>),
}

/// Why an `items` payload could not become a [`ComparisonInput`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please provide at least one item to compare.")]
    Empty,
    #[error("Items must be all names or all objects.")]
    Mixed,
}

impl ComparisonInput {
    /// Classify a raw `items` array: all strings become `Names`, all objects
    /// become `Records`. Blank names are an error.
    pub fn from_items(items: Vec<Value>) -> Result<Self, InputError> {
        if items.is_empty() {
            return Err(InputError::Empty);
        }

        if items.iter().all(Value::is_object) {
            return Ok(Self::Records(items));
        }

        let names = items
            .into_iter()
            .map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
                Value::String(_) => Err(InputError::Empty),
                _ => Err(InputError::Mixed),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::Names(names))
    }

    /// Number of items being compared.
    pub fn len(&self) -> usize {
        match self {
            Self::Pair(..) => 2,
            Self::Records(records) => records.len(),
            Self::Names(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
