use anyhow::Context;
use reshito_core::Config;
use reshito_server::{router, telemetry, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    telemetry::init("reshito-server");

    if let Err(e) = dotenv {
        tracing::info!("No .env file loaded: {e}");
    }

    // Fail fast on missing credentials or endpoints.
    let config = Config::from_env().context("Invalid configuration")?;
    let state = AppState::from_config(&config)?;

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Receipt server listening on {}", config.bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Receipt server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
