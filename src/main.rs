use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use mockdup::app::{app, shutdown_signal, AppState};
use mockdup::config::config;
use mockdup::database::{DatabaseManager, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = config();
    tracing::info!("Starting Mockdup API in {:?} mode", config.environment);

    if mockdup::is_development!() {
        tracing::warn!("Development mode: tokens are signed with the built-in secret unless JWT_SECRET is set");
    }
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the metadata database")?;
    if config.database.auto_init {
        DatabaseManager::ensure_schema(&pool).await?;
    }

    let state = AppState::new(config.clone(), Arc::new(PgStore::new(pool)));

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Mockdup API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
