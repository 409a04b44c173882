//! urlsift Server
//!
//! HTTP surface over the extraction pipeline: health, Prometheus metrics,
//! routing lookup and extraction.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use urlsift_extractor::{register_presets, ExtractionPipeline, StrategyRegistry};
use urlsift_llm::{ChatCompletionsProvider, LlmProvider};
use urlsift_metrics::ExtractionMetrics;
use urlsift_router::UrlMappingManager;
use urlsift_schema::{SchemaRegistry, SchemaValidator};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Pipeline could not be assembled
    #[error("Setup error: {0}")]
    Setup(String),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Assemble the pipeline described by `config`
///
/// Registers one preset strategy per content type, loads the routing file
/// if one is configured and installs the strategy routes.
pub fn build_pipeline(config: &ServerConfig) -> Result<ExtractionPipeline, ServerError> {
    let llm = ChatCompletionsProvider::new(config.llm.clone())
        .map_err(|e| ServerError::Setup(e.to_string()))?;
    info!("LLM endpoint: {} (model {})", config.llm.endpoint(), llm.model());

    build_pipeline_with(config, Arc::new(llm))
}

/// Assemble the pipeline around an existing provider
pub fn build_pipeline_with<L: LlmProvider + 'static>(
    config: &ServerConfig,
    llm: Arc<L>,
) -> Result<ExtractionPipeline, ServerError> {
    let schemas = SchemaRegistry::new();
    let mut strategies = StrategyRegistry::new();
    register_presets(&mut strategies, llm, &schemas, config.pipeline.max_content_chars);

    let mut routes = UrlMappingManager::new();
    if let Some(path) = &config.routing_file {
        let loaded = routes
            .load_config(path)
            .map_err(|e| ServerError::Setup(format!("{}: {}", path.display(), e)))?;
        info!("Loaded {} routing rules from {}", loaded, path.display());
    }

    let mut pipeline = ExtractionPipeline::new(
        config.pipeline.clone(),
        strategies,
        SchemaValidator::new(schemas),
        Arc::new(ExtractionMetrics::new()),
    )
    .map_err(|e| ServerError::Setup(e.to_string()))?
    .with_routes(routes);

    for route in &config.strategy_routes {
        pipeline
            .add_strategy_route(
                &route.pattern,
                route.pattern_type,
                route.matcher_options,
                &route.strategy,
                route.priority,
            )
            .map_err(|e| ServerError::Setup(format!("strategy route '{}': {}", route.pattern, e)))?;
    }

    Ok(pipeline)
}

/// Start the HTTP server
///
/// Builds the pipeline from configuration and serves until the process
/// stops.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting urlsift server");
    info!("Bind address: {}", config.bind_addr());

    let pipeline = build_pipeline(&config)?;
    info!(
        "Strategies: {}, routing rules: {}, strategy routes: {}",
        pipeline.strategies().len(),
        pipeline.routes().len(),
        config.strategy_routes.len()
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
