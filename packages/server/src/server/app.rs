//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::chat::{ConversationStore, ToolCatalog};
use crate::kernel::ServerDeps;
use crate::server::routes::{
    compare_handler, compare_items_handler, get_response_handler, health_handler,
    reset_handler, shopping_list_item_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub catalog: Arc<ToolCatalog>,
    pub conversations: Arc<ConversationStore>,
}

impl AppState {
    pub fn new(deps: ServerDeps, catalog: ToolCatalog) -> Self {
        Self {
            deps: Arc::new(deps),
            catalog: Arc::new(catalog),
            conversations: Arc::new(ConversationStore::new()),
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        // Comparison
        .route("/compare-items", post(compare_items_handler))
        .route("/compare", post(compare_handler))
        // Chat
        .route("/get_response", post(get_response_handler))
        .route("/reset", post(reset_handler))
        // Shopping list
        .route("/get_shopping_list_item", post(shopping_list_item_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
