//! CRM demo server binary.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `CRM_*` environment variables
//! 3. Load the fixture into the in-memory store
//! 4. Serve GraphQL until `Ctrl-C`

use anyhow::Context;
use crm_server::{ServerConfig, load_state, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("crm-server starting");

    // 2. Load configuration.
    let config = ServerConfig::from_env().context("reading configuration")?;
    info!(
        host = %config.host,
        port = config.port,
        fixture_path = %config.fixture_path.display(),
        cors_origins = ?config.cors_origins,
        "configuration loaded"
    );

    // 3. Load the fixture.
    let state = load_state(&config).context("loading fixture")?;

    // 4. Serve.
    start_server(&config, state).await.context("running server")?;
    Ok(())
}
