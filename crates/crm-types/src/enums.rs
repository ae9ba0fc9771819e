//! Enumeration types shared by the store and the GraphQL schema.
//!
//! Wire names are `SCREAMING_SNAKE_CASE` both in the fixture JSON and in
//! the GraphQL schema, so the same enum serves both without mapping.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Permission level of a CRM user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
    async_graphql::Enum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum UserRole {
    /// Full access.
    Admin,
    /// Manages a sales team.
    Manager,
    /// Individual contributor owning accounts and deals.
    SalesPerson,
}

/// Head-count bucket of a company.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
    async_graphql::Enum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum CompanySize {
    /// Enterprise.
    Enterprise,
    /// Large.
    Large,
    /// Medium.
    Medium,
    /// Small.
    Small,
}

/// Funnel stage of a contact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
    async_graphql::Enum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum ContactStage {
    /// Paying customer.
    Customer,
    /// Unqualified lead.
    Lead,
    /// Lead qualified by sales.
    SalesQualifiedLead,
}

/// Engagement status of a contact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
    async_graphql::Enum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum ContactStatus {
    /// Actively engaged.
    Active,
    /// No longer engaged.
    Inactive,
    /// Awaiting a response.
    Pending,
}

/// Kind of change recorded in the audit log.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
    async_graphql::Enum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum AuditAction {
    /// A record was created.
    Create,
    /// A record was modified.
    Update,
    /// A record was removed.
    Delete,
    /// A user signed in.
    Login,
    /// A user signed out.
    Logout,
}

impl AuditAction {
    /// Wire name of the action, as it appears in JSON and GraphQL.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn enums_use_screaming_snake_case() {
        let json = serde_json::to_string(&ContactStage::SalesQualifiedLead).unwrap();
        assert_eq!(json, "\"SALES_QUALIFIED_LEAD\"");

        let role: UserRole = serde_json::from_str("\"SALES_PERSON\"").unwrap();
        assert_eq!(role, UserRole::SalesPerson);
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        let result: Result<CompanySize, _> = serde_json::from_str("\"HUGE\"");
        assert!(result.is_err());
    }

    #[test]
    fn audit_action_wire_name_matches_serde() {
        for action in [
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::Delete,
            AuditAction::Login,
            AuditAction::Logout,
        ] {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
    }
}
