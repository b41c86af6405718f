mod config;
mod errors;
mod fitment;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::fitment::{BatchLimits, BatchScorer, LlmScoringOracle, PdfTextExtractor};
use crate::llm_client::{LlmClient, LlmConfig};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Fitment API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client; the reqwest timeout sits just above the oracle timeout
    // so a hung call surfaces as an oracle timeout rather than a transport error.
    let llm = LlmClient::new(LlmConfig {
        api_key: config.gemini_api_key.clone(),
        model: config.gemini_model.clone(),
        base_url: config.gemini_base_url.clone(),
        temperature: config.llm_temperature,
        max_retries: config.llm_max_retries,
        request_timeout: config.oracle_timeout + std::time::Duration::from_secs(5),
    })
    .context("Failed to build LLM HTTP client")?;
    info!(
        "LLM client initialized (model: {}, temperature: {})",
        llm.model(),
        config.llm_temperature
    );

    let extractor = match &config.scratch_dir {
        Some(dir) => PdfTextExtractor::with_scratch_dir(dir),
        None => PdfTextExtractor::new(),
    };

    let scorer = BatchScorer::new(
        Arc::new(extractor),
        Arc::new(LlmScoringOracle::new(llm)),
        BatchLimits {
            concurrency: config.scoring_concurrency,
            oracle_timeout: config.oracle_timeout,
        },
    );
    info!(
        "Batch scorer ready (concurrency: {}, oracle timeout: {}s)",
        config.scoring_concurrency,
        config.oracle_timeout.as_secs()
    );

    let state = AppState {
        scorer,
        max_upload_bytes: config.max_upload_bytes,
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
