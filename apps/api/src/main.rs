mod admin;
mod auth;
mod config;
mod dashboard;
mod db;
mod errors;
mod llm_client;
mod meals;
mod models;
mod profile;
mod progress;
mod quiz;
mod recipes;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Protocolo Selva API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite
    ensure_data_dir(&config.database_url)?;
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client (optional: recipes fall back to the static table without it)
    let llm = match &config.openai_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone(), &config.openai_base_url)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            warn!("OPENAI_API_KEY not set, recipe generation will use fallback recipes");
            None
        }
    };
    info!("AI configured: {}", config.ai_configured());

    // Build app state
    let state = AppState::new(db, llm, config.clone());

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Creates the parent directory of a file-backed SQLite database.
fn ensure_data_dir(database_url: &str) -> Result<()> {
    if database_url.contains(":memory:") {
        return Ok(());
    }
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
