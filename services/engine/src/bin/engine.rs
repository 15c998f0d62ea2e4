//! services/engine/src/bin/engine.rs

use bookshare_core::{EngagementEngine, EnginePorts};
use engine_lib::{
    adapters::{
        InMemoryBookStore, InMemoryUserDirectory, LogPushSender, SystemClock, ThreadRandomSource,
    },
    catalog,
    config::Config,
    error::ServiceError,
    host,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting engine...");

    // --- 2. Initialize Adapters & Seed the Catalog ---
    let books = Arc::new(InMemoryBookStore::new());
    let users = Arc::new(InMemoryUserDirectory::new());
    match &config.catalog_path {
        Some(path) => {
            catalog::load_seed(path, books.as_ref(), users.as_ref()).await?;
        }
        None => info!("No CATALOG_PATH set, starting with an empty catalog."),
    }

    // --- 3. Build the Engine ---
    let engine = Arc::new(EngagementEngine::new(
        config.engine.clone(),
        EnginePorts {
            books,
            users,
            clock: Arc::new(SystemClock),
            random: Arc::new(ThreadRandomSource),
            sender: Arc::new(LogPushSender),
        },
    ));

    // --- 4. Run Until Ctrl-C ---
    let cancellation_token = CancellationToken::new();
    let loop_handle = tokio::spawn(host::run(
        engine,
        config.announce_interval,
        cancellation_token.clone(),
    ));

    info!(
        "Engine running, ticking every {:?}. Press Ctrl-C to stop.",
        config.announce_interval
    );
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
    }
    cancellation_token.cancel();
    loop_handle
        .await
        .map_err(|e| ServiceError::Internal(format!("host loop panicked: {}", e)))?;

    info!("Engine stopped.");
    Ok(())
}
