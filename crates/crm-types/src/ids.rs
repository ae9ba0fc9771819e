//! Type-safe identifier wrappers around [`String`].
//!
//! Every collection has its own id type so a `CompanyId` can never be
//! passed where a `UserId` is expected. Ids stay strings because the
//! fixture data and the GraphQL `ID` scalar both carry them as strings
//! (`"1"`, `"42"`, ...).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an existing identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<async_graphql::ID> for $name {
            fn from(id: async_graphql::ID) -> Self {
                Self(id.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Identifier of a CRM user (sales rep, manager, admin).
    UserId
}

define_id! {
    /// Identifier of a company account.
    CompanyId
}

define_id! {
    /// Identifier of a contact person.
    ContactId
}

define_id! {
    /// Identifier of a deal in the sales pipeline.
    DealId
}

define_id! {
    /// Identifier of a pipeline stage that deals move through.
    DealStageId
}

define_id! {
    /// Identifier of a task.
    TaskId
}

define_id! {
    /// Identifier of a kanban column that tasks sit in.
    TaskStageId
}

define_id! {
    /// Identifier of a calendar event.
    EventId
}

define_id! {
    /// Identifier of an audit log record.
    AuditId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = CompanyId::new("7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"7\"");

        let back: CompanyId = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(back.as_str(), "12");
    }

    #[test]
    fn ids_convert_to_graphql_id() {
        let id = UserId::from("3");
        let gql: async_graphql::ID = id.clone().into();
        assert_eq!(gql.0, "3");
        assert_eq!(UserId::from(gql), id);
    }
}
