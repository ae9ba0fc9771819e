//! GraphQL API server for the CRM demo.
//!
//! This crate serves the in-memory CRM data from `crm-store` over:
//!
//! - **GraphQL over HTTP** (`POST /graphql`) for queries and mutations
//! - **GraphiQL** (`GET /graphql`) for interactive exploration
//! - **GraphQL over `WebSocket`** (`/graphql/ws`) for the company
//!   subscriptions, fed by a [`tokio::sync::broadcast`] channel
//! - **Health** (`GET /health`) with per-collection counts
//!
//! # Architecture
//!
//! The store sits behind one [`tokio::sync::RwLock`] in [`AppState`].
//! Resolvers take a read guard for the span of a single field; mutations
//! take the write guard, apply the change, release it, and then publish a
//! [`CompanyEvent`] to subscribers.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use config::{ConfigError, ServerConfig};
pub use error::ServerError;
pub use router::build_router;
pub use schema::{CrmSchema, SessionToken, build_schema};
pub use server::{load_state, start_server};
pub use state::{AppState, CompanyEvent};
