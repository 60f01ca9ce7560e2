use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shelf_api::app::{app, AppState};
use shelf_api::config::config;
use shelf_api::database::{DatabaseManager, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shelf_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    info!("Starting Shelf API in {:?} mode", config.environment);

    let state = if config.database.url.is_some() {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        AppState::new(Arc::new(PgStore::new(pool)), config)
    } else {
        if shelf_api::is_production!() {
            anyhow::bail!("DATABASE_URL must be set in production");
        }
        warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
        AppState::new(Arc::new(MemoryStore::new()), config)
    };
    let state = state.context("invalid token configuration (is JWT_SECRET set?)")?;

    let router = app(state, config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Shelf API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shelf API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
