use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use clinicdesk_core::Database;
use clinicdesk_web::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    tracing::info!("clinicdesk starting v{}", env!("CARGO_PKG_VERSION"));
    if config.uses_dev_secret() {
        tracing::warn!("using the development flash secret; set CLINICDESK_FLASH_SECRET");
    }

    // Apply the schema once; requests open their own connections afterwards
    Database::open(&config.database)
        .with_context(|| format!("failed to open database {}", config.database.display()))?;

    let state = AppState::new(config.database.clone(), &config.flash_secret);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(addr = %config.bind, database = %config.database.display(), "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("clinicdesk stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
