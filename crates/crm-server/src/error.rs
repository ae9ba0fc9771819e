//! Error types for the CRM server.

use crm_store::FixtureError;

use crate::config::ConfigError;

/// Errors that can occur when starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration could not be read.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The fixture file could not be loaded.
    #[error("fixture error: {source}")]
    Fixture {
        /// The underlying fixture error.
        #[from]
        source: FixtureError,
    },

    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}
