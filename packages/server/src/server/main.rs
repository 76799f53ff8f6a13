// Main entry point for API server

use anyhow::{Context, Result};
use advisor_core::domains::chat::ToolCatalog;
use advisor_core::kernel::ServerDeps;
use advisor_core::server::{build_app, AppState};
use advisor_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,advisor_core=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting shopping advisor API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(model = %config.openai_model, "Configuration loaded");

    let deps = ServerDeps::from_config(&config)?;
    let catalog = ToolCatalog::new().context("Invalid chat tool catalog")?;
    tracing::info!(tools = catalog.definitions().len(), "Chat tools registered");

    // Build application
    let app = build_app(AppState::new(deps, catalog));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
