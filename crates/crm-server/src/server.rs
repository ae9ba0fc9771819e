//! Server lifecycle management.
//!
//! [`load_state`] turns the configured fixture into an [`AppState`];
//! [`start_server`] binds the listener and serves until `Ctrl-C`.

use std::net::SocketAddr;

use chrono::Utc;
use crm_store::{CrmStore, Fixture};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::router::build_router;
use crate::state::AppState;

/// Load the fixture named by `config` and build the shared state.
pub fn load_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let now = Utc::now();
    let fixture = Fixture::load(&config.fixture_path, now)?;
    let store = CrmStore::from_fixture(fixture, now);
    let counts = store.counts();
    info!(
        users = counts.users,
        companies = counts.companies,
        contacts = counts.contacts,
        deal_stages = counts.deal_stages,
        deals = counts.deals,
        task_stages = counts.task_stages,
        tasks = counts.tasks,
        events = counts.events,
        audits = counts.audits,
        "store ready"
    );
    Ok(AppState::new(store))
}

/// Start the HTTP server.
///
/// Binds to the configured address and serves requests until `Ctrl-C`,
/// then drains in-flight requests and returns.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let router = build_router(state, &config.cors_origins);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "GraphQL server ready at http://{addr}/graphql");
    info!(%addr, "subscriptions ready at ws://{addr}/graphql/ws");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        return;
    }
    info!("shutdown signal received");
}
