use axum::{extract::Extension, Json};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domains::shopping::{recommend_next_item, ItemRef, PRICE_NA};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ShoppingListRequest {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub accepted: Vec<ItemRef>,
    #[serde(default)]
    pub rejected: Vec<ItemRef>,
}

/// Next shopping-list item for an event, or `{}` when nothing new came back.
pub async fn shopping_list_item_handler(
    Extension(state): Extension<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<ShoppingListRequest>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let event = request.event.trim();
    if event.is_empty() {
        return Err(ApiError::BadRequest("Please provide an event.".to_string()));
    }

    let item = recommend_next_item(event, &request.accepted, &request.rejected, &state.deps)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, event, "Shopping recommendation failed");
            ApiError::Internal(format!("{:#}", e))
        })?;

    match item {
        Some(item) => serde_json::to_value(item.with_display_price(PRICE_NA))
            .map(Json)
            .map_err(|e| ApiError::Internal(e.to_string())),
        None => Ok(Json(json!({}))),
    }
}
