//! Task service binary
//!
//! Configured through `HM_DATA_DIR`, `HM_BIND_ADDR`, `HM_JWT_SECRET` and
//! `HM_TOKEN_TTL_MINUTES`.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hm_task_service::{app, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hm_task_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env()?;
    tracing::info!("Using data directory: {:?}", config.data_dir);

    let state = AppState::new(&config)
        .await
        .context("Failed to initialize application state")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Task service listening on {}", config.bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
