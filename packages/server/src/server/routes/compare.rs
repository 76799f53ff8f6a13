use axum::{extract::Extension, Json};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::Value;

use crate::domains::compare::{self, ComparisonInput, InputError};
use crate::server::app::AppState;
use crate::server::error::ApiError;

const MISSING_PAIR: &str = "Please provide both items for comparison.";

#[derive(Debug, Deserialize)]
pub struct CompareItemsRequest {
    #[serde(default)]
    pub items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub item1: Option<String>,
    pub item2: Option<String>,
    pub items: Option<Vec<Value>>,
}

impl CompareRequest {
    /// `{items}` wins over `{item1, item2}`. Two names compare as a pair.
    fn into_input(self) -> Result<ComparisonInput, ApiError> {
        if let Some(items) = self.items {
            return match ComparisonInput::from_items(items).map_err(bad_input)? {
                ComparisonInput::Names(names) => {
                    if let [first, second] = names.as_slice() {
                        return Ok(ComparisonInput::Pair(first.clone(), second.clone()));
                    }
                    Ok(ComparisonInput::Names(names))
                }
                input => Ok(input),
            };
        }

        let first = self.item1.as_deref().map(str::trim).unwrap_or_default();
        let second = self.item2.as_deref().map(str::trim).unwrap_or_default();
        if first.is_empty() || second.is_empty() {
            return Err(ApiError::BadRequest(MISSING_PAIR.to_string()));
        }
        Ok(ComparisonInput::Pair(first.to_string(), second.to_string()))
    }
}

fn bad_input(e: InputError) -> ApiError {
    ApiError::BadRequest(e.to_string())
}

async fn run(input: ComparisonInput, state: &AppState) -> Result<Json<Value>, ApiError> {
    let count = input.len();
    match compare::compare(input, &state.deps).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::error!(error = ?e, count, "Comparison failed");
            Err(ApiError::unexpected())
        }
    }
}

/// Compare a list of item names (searched first) or pre-fetched item records.
pub async fn compare_items_handler(
    Extension(state): Extension<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CompareItemsRequest>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let input = ComparisonInput::from_items(request.items).map_err(bad_input)?;
    run(input, &state).await
}

/// Two-item comparison, also accepting the `{items}` shape.
pub async fn compare_handler(
    Extension(state): Extension<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CompareRequest>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let input = request.into_input()?;
    run(input, &state).await
}
