//! Error types for the CRM store.
//!
//! [`StoreError`] covers the two ways a request can fail against the
//! in-memory state: the target record does not exist, or a required
//! value was left empty. Both convert into GraphQL errors carrying an
//! `extensions.code` through [`ErrorExtensions`].
//!
//! [`FixtureError`] is only raised at startup while reading the seed file.

use std::path::PathBuf;

use async_graphql::ErrorExtensions;

/// Errors raised by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The referenced record does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// Entity type name, e.g. `Company`.
        entity: &'static str,
        /// The id (or lookup key) that was not found.
        id: String,
    },

    /// A required input value was missing or empty.
    #[error("{0} is required")]
    MissingField(&'static str),
}

impl StoreError {
    /// Machine-readable error code placed in GraphQL `extensions.code`.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::MissingField(_) => "BAD_USER_INPUT",
        }
    }
}

impl ErrorExtensions for StoreError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

/// Errors that can occur while loading or writing the fixture file.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The fixture file exists but could not be read or written.
    #[error("fixture I/O error at {path}: {source}")]
    Io {
        /// Path of the fixture file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The fixture content is not valid fixture JSON.
    #[error("failed to parse fixture JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_entity() {
        let err = StoreError::NotFound {
            entity: "Company",
            id: String::from("99"),
        };
        assert_eq!(err.to_string(), "Company not found");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn graphql_error_carries_code_extension() {
        let err = StoreError::MissingField("password").extend();
        assert_eq!(err.message, "password is required");
        let code = err
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned();
        assert_eq!(code, Some(async_graphql::Value::from("BAD_USER_INPUT")));
    }
}
