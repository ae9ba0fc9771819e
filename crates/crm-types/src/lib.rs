//! Shared type definitions for the CRM demo server.
//!
//! This crate is the single source of truth for the CRM records used
//! across the workspace. Types flow to `TypeScript` via `ts-rs` for the
//! admin UI, and the enums double as GraphQL enums.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string id wrappers, one per collection
//! - [`enums`] -- Roles, company sizes, contact stages/statuses, audit actions
//! - [`structs`] -- Entity records (users, companies, contacts, deals, ...)

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AuditAction, CompanySize, ContactStage, ContactStatus, UserRole};
pub use ids::{
    AuditId, CompanyId, ContactId, DealId, DealStageId, EventId, TaskId, TaskStageId, UserId,
};
pub use structs::{
    Audit, AuditChanges, Company, Contact, Deal, DealStage, Event, Task, TaskStage, User,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the admin UI.

    #[test]
    fn export_bindings() {
        // Files land in `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::UserId::export_all();
        let _ = crate::ids::CompanyId::export_all();
        let _ = crate::enums::UserRole::export_all();
        let _ = crate::enums::AuditAction::export_all();
        let _ = crate::structs::User::export_all();
        let _ = crate::structs::Company::export_all();
        let _ = crate::structs::Contact::export_all();
        let _ = crate::structs::Deal::export_all();
        let _ = crate::structs::DealStage::export_all();
        let _ = crate::structs::Task::export_all();
        let _ = crate::structs::TaskStage::export_all();
        let _ = crate::structs::Event::export_all();
        let _ = crate::structs::Audit::export_all();
    }
}
