//! Remote record shapes and their conversion into fixture records.
//!
//! The remote API nests relations (`salesOwner { id }`) and uses a wider
//! set of enum values than the local schema. Conversion flattens the
//! relations into id fields and maps enum values leniently: anything the
//! local schema does not know falls back to a neutral value with a warning.

use chrono::{DateTime, Utc};
use crm_types::{
    Company, CompanyId, CompanySize, Contact, ContactId, ContactStage, ContactStatus, Deal,
    DealId, DealStage, DealStageId, Task, TaskId, TaskStage, TaskStageId, User, UserId, UserRole,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A nested `{ id }` reference.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRef {
    /// Referenced record id.
    pub id: String,
}

fn ref_id<T: From<String>>(r: Option<RemoteRef>) -> Option<T> {
    r.map(|r| T::from(r.id))
}

/// Parse a wire enum value, or fall back.
fn lenient_enum<T: DeserializeOwned>(raw: Option<&str>, field: &'static str) -> Option<T> {
    let raw = raw?;
    match serde_json::from_value(serde_json::Value::String(raw.to_owned())) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(field, value = raw, "unknown enum value from remote API");
            None
        }
    }
}

/// Remote user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    id: String,
    name: String,
    email: String,
    avatar_url: Option<String>,
    job_title: Option<String>,
    phone: Option<String>,
    timezone: Option<String>,
    role: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl RemoteUser {
    /// Convert into a fixture user. Remote sales roles collapse onto the
    /// local `MANAGER` / `SALES_PERSON` pair.
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        let role = match self.role.as_deref() {
            Some("SALES_MANAGER") => UserRole::Manager,
            Some("SALES_INTERN") => UserRole::SalesPerson,
            other => lenient_enum(other, "role").unwrap_or(UserRole::SalesPerson),
        };
        User {
            id: UserId::from(self.id),
            name: self.name,
            email: self.email,
            avatar_url: self.avatar_url,
            job_title: self.job_title,
            phone: self.phone,
            timezone: self.timezone,
            role,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

/// Remote company.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCompany {
    id: String,
    name: String,
    avatar_url: Option<String>,
    business_type: Option<String>,
    company_size: Option<String>,
    industry: Option<String>,
    total_revenue: Option<f64>,
    sales_owner: Option<RemoteRef>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl RemoteCompany {
    /// Convert into a fixture company.
    pub fn into_company(self, now: DateTime<Utc>) -> Company {
        Company {
            id: CompanyId::from(self.id),
            name: self.name,
            avatar_url: self.avatar_url,
            business_type: self.business_type,
            company_size: lenient_enum::<CompanySize>(self.company_size.as_deref(), "companySize"),
            industry: self.industry,
            total_revenue: self.total_revenue,
            sales_owner_id: ref_id(self.sales_owner),
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

/// Remote contact.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteContact {
    id: String,
    name: String,
    email: String,
    avatar_url: Option<String>,
    job_title: Option<String>,
    phone: Option<String>,
    stage: Option<String>,
    status: Option<String>,
    company: Option<RemoteRef>,
    sales_owner: Option<RemoteRef>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl RemoteContact {
    /// Convert into a fixture contact. Won deals make a customer; other
    /// funnel positions past first contact count as qualified.
    pub fn into_contact(self, now: DateTime<Utc>) -> Contact {
        let stage = match self.stage.as_deref() {
            Some("WON") => ContactStage::Customer,
            Some("QUALIFIED" | "INTERESTED" | "NEGOTIATION") => ContactStage::SalesQualifiedLead,
            other => lenient_enum(other, "stage").unwrap_or(ContactStage::Lead),
        };
        let status = match self.status.as_deref() {
            Some("LOST" | "CHURNED" | "UNQUALIFIED") => ContactStatus::Inactive,
            Some("NEW" | "CONTACTED") => ContactStatus::Pending,
            other => lenient_enum(other, "status").unwrap_or(ContactStatus::Active),
        };
        Contact {
            id: ContactId::from(self.id),
            name: self.name,
            email: self.email,
            avatar_url: self.avatar_url,
            job_title: self.job_title,
            phone: self.phone,
            stage,
            status,
            company_id: ref_id(self.company),
            sales_owner_id: ref_id(self.sales_owner),
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

/// Remote deal or task stage.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStage {
    /// Stage id.
    pub id: String,
    /// Stage title.
    pub title: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl RemoteStage {
    /// Convert into a pipeline stage.
    pub fn into_deal_stage(self, now: DateTime<Utc>) -> DealStage {
        DealStage {
            id: DealStageId::from(self.id),
            title: self.title,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }

    /// Convert into a task board column.
    pub fn into_task_stage(self, now: DateTime<Utc>) -> TaskStage {
        TaskStage {
            id: TaskStageId::from(self.id),
            title: self.title,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

/// Remote deal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDeal {
    id: String,
    title: String,
    value: Option<f64>,
    stage: Option<RemoteRef>,
    company: Option<RemoteRef>,
    contact: Option<RemoteRef>,
    sales_owner: Option<RemoteRef>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl RemoteDeal {
    /// Convert into a fixture deal. A missing value becomes 0.
    pub fn into_deal(self, now: DateTime<Utc>) -> Deal {
        Deal {
            id: DealId::from(self.id),
            title: self.title,
            value: self.value.unwrap_or_default(),
            stage_id: ref_id(self.stage),
            company_id: ref_id(self.company),
            contact_id: ref_id(self.contact),
            sales_owner_id: ref_id(self.sales_owner),
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

/// Remote task.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTask {
    id: String,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    completed: Option<bool>,
    stage: Option<RemoteRef>,
    assigned_to: Option<RemoteRef>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl RemoteTask {
    /// Convert into a fixture task.
    pub fn into_task(self, now: DateTime<Utc>) -> Task {
        Task {
            id: TaskId::from(self.id),
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            completed: self.completed.unwrap_or(false),
            stage_id: ref_id(self.stage),
            assigned_to_id: ref_id(self.assigned_to),
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn nested_refs_are_flattened() {
        let deal: RemoteDeal = serde_json::from_str(
            r#"{
                "id": "7", "title": "Renewal", "value": 4200,
                "stage": { "id": "2" }, "company": { "id": "3" }, "contact": null,
                "salesOwner": { "id": "1" },
                "createdAt": "2024-02-01T00:00:00Z", "updatedAt": "2024-02-02T00:00:00Z"
            }"#,
        )
        .unwrap();
        let deal = deal.into_deal(now());
        assert_eq!(deal.stage_id, Some(DealStageId::from("2")));
        assert_eq!(deal.company_id, Some(CompanyId::from("3")));
        assert!(deal.contact_id.is_none());
        assert_eq!(deal.sales_owner_id, Some(UserId::from("1")));
        assert!((deal.value - 4200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn remote_roles_map_onto_local_roles() {
        let user = |role: &str| -> RemoteUser {
            serde_json::from_value(serde_json::json!({
                "id": "1", "name": "A", "email": "a@refine.dev", "role": role
            }))
            .unwrap()
        };
        assert_eq!(user("ADMIN").into_user(now()).role, UserRole::Admin);
        assert_eq!(user("SALES_MANAGER").into_user(now()).role, UserRole::Manager);
        assert_eq!(user("SALES_INTERN").into_user(now()).role, UserRole::SalesPerson);
        assert_eq!(user("WIZARD").into_user(now()).role, UserRole::SalesPerson);
    }

    #[test]
    fn missing_timestamps_default_to_now() {
        let task: RemoteTask =
            serde_json::from_str(r#"{ "id": "1", "title": "Call back" }"#).unwrap();
        let task = task.into_task(now());
        assert_eq!(task.created_at, now());
        assert!(!task.completed);
        assert!(task.assigned_to_id.is_none());
    }

    #[test]
    fn contact_funnel_values_are_mapped() {
        let contact = |stage: &str, status: &str| -> Contact {
            let remote: RemoteContact = serde_json::from_value(serde_json::json!({
                "id": "1", "name": "B", "email": "b@x.test",
                "stage": stage, "status": status, "company": { "id": "4" }
            }))
            .unwrap();
            remote.into_contact(now())
        };
        let won = contact("WON", "ACTIVE");
        assert_eq!(won.stage, ContactStage::Customer);
        assert_eq!(won.status, ContactStatus::Active);
        assert_eq!(won.company_id, Some(CompanyId::from("4")));

        let lost = contact("LOST", "CHURNED");
        assert_eq!(lost.stage, ContactStage::Lead);
        assert_eq!(lost.status, ContactStatus::Inactive);
    }
}
