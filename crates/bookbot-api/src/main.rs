use std::sync::Arc;

use anyhow::Context;
use bookbot_api::{
    build_router, config::Config, error::ApiError, state::AppState, telemetry::init_logging,
};
use bookbot_graph::{Graph, GraphConfig};
use bookbot_llm::{ChatClient, OpenAIClient, OpenAIConfig};
use bookbot_store::BookStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(ApiError::from)
        .context("Failed to load configuration")?;

    // Keep the guard alive so the log file is flushed on exit
    let _log_guard = init_logging(&config.logging);

    tracing::info!("Starting bookbot API server");
    tracing::info!(
        model = %config.llm.model,
        database = %config.database.path,
        request_timeout_secs = config.request_timeout().as_secs(),
        "Config loaded: {}:{}",
        config.server.host,
        config.server.port
    );

    let mut openai_config = OpenAIConfig::new(config.openai_api_key.clone());
    if let Some(url) = &config.openai_base_url {
        openai_config = openai_config.with_base_url(url.clone());
    }
    if let Some(secs) = config.llm.timeout_secs {
        openai_config = openai_config.with_timeout_secs(secs);
    }
    let chat_client: Arc<dyn ChatClient> = Arc::new(OpenAIClient::from_config(openai_config)?);

    if !std::path::Path::new(&config.database.path).is_file() {
        tracing::warn!(
            path = %config.database.path,
            "Catalog database not found; run bookbot-ingest first"
        );
    }

    let graph = Graph::builder()
        .chat_client(chat_client)
        .store(BookStore::new(&config.database.path))
        .llm_config(config.llm.clone().into())
        .config(GraphConfig::new().with_max_tool_rounds(config.llm.max_tool_rounds))
        .build()
        .context("Failed to build question-answering graph")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, graph));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
