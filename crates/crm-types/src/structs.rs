//! Core entity records of the CRM.
//!
//! Records are flat: relations are expressed as id fields and resolved
//! by the store at query time. Field names serialize in `camelCase` to
//! match the fixture file and the GraphQL schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::enums::{AuditAction, CompanySize, ContactStage, ContactStatus, UserRole};
use crate::ids::{
    AuditId, CompanyId, ContactId, DealId, DealStageId, EventId, TaskId, TaskStageId, UserId,
};

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

/// A CRM user who can sign in and own accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct User {
    /// Unique id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Job title.
    pub job_title: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// IANA timezone name.
    pub timezone: Option<String>,
    /// Permission level.
    pub role: UserRole,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A company account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Company {
    /// Unique id.
    pub id: CompanyId,
    /// Company name.
    pub name: String,
    /// Logo URL.
    pub avatar_url: Option<String>,
    /// Business model, e.g. `B2B`.
    pub business_type: Option<String>,
    /// Head-count bucket.
    pub company_size: Option<CompanySize>,
    /// Industry label.
    pub industry: Option<String>,
    /// Annual revenue.
    pub total_revenue: Option<f64>,
    /// Owning sales user.
    pub sales_owner_id: Option<UserId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A person at a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Contact {
    /// Unique id.
    pub id: ContactId,
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Job title.
    pub job_title: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Funnel stage.
    pub stage: ContactStage,
    /// Engagement status.
    pub status: ContactStatus,
    /// Employer.
    pub company_id: Option<CompanyId>,
    /// Owning sales user.
    pub sales_owner_id: Option<UserId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Sales pipeline
// ---------------------------------------------------------------------------

/// A column of the sales pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DealStage {
    /// Unique id.
    pub id: DealStageId,
    /// Stage title, e.g. `WON`.
    pub title: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A sales opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Deal {
    /// Unique id.
    pub id: DealId,
    /// Deal title.
    pub title: String,
    /// Monetary value. Missing or `null` values load as zero.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub value: f64,
    /// Pipeline stage.
    pub stage_id: Option<DealStageId>,
    /// Counterparty company.
    pub company_id: Option<CompanyId>,
    /// Point of contact.
    pub contact_id: Option<ContactId>,
    /// Owning sales user.
    pub sales_owner_id: Option<UserId>,
    /// Creation time. Used as the close date for monthly aggregation.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tasks and calendar
// ---------------------------------------------------------------------------

/// A column of the task board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TaskStage {
    /// Unique id.
    pub id: TaskStageId,
    /// Column title, e.g. `TODO`.
    pub title: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A to-do item assigned to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Task {
    /// Unique id.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Free-form details.
    pub description: Option<String>,
    /// Deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Whether the task is done. Missing values load as `false`.
    #[serde(default)]
    pub completed: bool,
    /// Board column.
    pub stage_id: Option<TaskStageId>,
    /// Assignee.
    pub assigned_to_id: Option<UserId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Unique id.
    pub id: EventId,
    /// Event title.
    pub title: String,
    /// Start instant.
    pub start_date: DateTime<Utc>,
    /// End instant.
    pub end_date: DateTime<Utc>,
    /// Display colour as a CSS hex string.
    pub color: String,
    /// Attending users.
    #[serde(default)]
    pub participant_ids: Vec<UserId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

/// Field-level description of what an audited action changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct AuditChanges {
    /// Changed field name.
    pub field: Option<String>,
    /// Previous value, rendered as a string.
    pub from: Option<String>,
    /// New value, rendered as a string.
    pub to: Option<String>,
    /// Human-readable summary.
    pub description: Option<String>,
}

/// One entry of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Audit {
    /// Unique id.
    pub id: AuditId,
    /// What happened.
    pub action: AuditAction,
    /// Entity type name, e.g. `Company`.
    pub target_entity: String,
    /// Id of the affected record in its own collection.
    pub target_id: String,
    /// Details of the change.
    pub changes: Option<AuditChanges>,
    /// Acting user, if known.
    pub user_id: Option<UserId>,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}
