//! Error types for the seed tool.
//!
//! Fetch errors are not fatal: the caller logs them and generates the
//! collection instead.

/// Errors that can occur while talking to the remote demo API.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response carried GraphQL errors.
    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    /// The response did not contain the expected data.
    #[error("unexpected response: {0}")]
    MissingData(String),

    /// The response data did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
