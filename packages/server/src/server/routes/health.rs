use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    model: String,
    product_search: bool,
}

/// Health check endpoint
///
/// Reports the configured model and whether product lookups are backed by a
/// search provider. Makes no upstream calls.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model: state.deps.ai.model().to_string(),
        product_search: state.deps.products.is_enabled(),
    })
}
