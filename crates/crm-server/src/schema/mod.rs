//! The GraphQL schema.
//!
//! Execution is delegated to `async-graphql`; this module declares the
//! root types and wires the shared [`AppState`] into the schema data.

pub mod mutation;
pub mod objects;
pub mod query;
pub mod subscription;

use async_graphql::Schema;

pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use subscription::SubscriptionRoot;

use crate::state::AppState;

/// The executable CRM schema.
pub type CrmSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Bearer token taken from the request's `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

impl SessionToken {
    /// Extract the token from an `Authorization` header value.
    ///
    /// Accepts `Bearer <token>`; a blank token counts as absent.
    pub fn from_header(value: &str) -> Option<Self> {
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_owned()))
        }
    }
}

/// Build the schema around `state`.
pub fn build_schema(state: AppState) -> CrmSchema {
    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .data(state)
        .finish()
}
