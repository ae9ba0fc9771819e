//! The in-memory CRM state.
//!
//! [`CrmStore`] owns every collection plus the session map. It is plain
//! data: the server wraps it in a lock, and tests drive it directly.
//! Relation lookups are linear scans; the data set is a demo fixture.

use async_graphql::MaybeUndefined;
use chrono::{DateTime, Utc};
use crm_types::{
    Audit, AuditAction, AuditChanges, AuditId, Company, CompanyId, Contact, ContactId, Deal,
    DealId, DealStage, DealStageId, Event, EventId, Task, TaskId, TaskStage, TaskStageId, User,
    UserId,
};
use serde::Serialize;

use crate::error::StoreError;
use crate::fixture::{Fixture, default_audits};
use crate::input::{CompanyCreateInput, CompanyUpdateInput, LoginInput};
use crate::session::SessionStore;

/// A record addressable by its string id.
pub trait Record {
    /// Entity type name used in errors and audit entries.
    const ENTITY: &'static str;

    /// The record's id.
    fn record_id(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Record for $ty {
                const ENTITY: &'static str = $name;

                fn record_id(&self) -> &str {
                    self.id.as_str()
                }
            }
        )*
    };
}

impl_record! {
    User => "User",
    Company => "Company",
    Contact => "Contact",
    Deal => "Deal",
    DealStage => "DealStage",
    Task => "Task",
    TaskStage => "TaskStage",
    Event => "Event",
    Audit => "Audit",
}

/// Find a record by id.
pub fn find<'a, R: Record>(records: &'a [R], id: &str) -> Option<&'a R> {
    records.iter().find(|r| r.record_id() == id)
}

/// Next free id: one past the largest numeric id, `"1"` for an empty
/// collection. Non-numeric ids are ignored.
pub fn next_id<R: Record>(records: &[R]) -> String {
    records
        .iter()
        .filter_map(|r| r.record_id().parse::<u64>().ok())
        .max()
        .map_or(1, |max| max.saturating_add(1))
        .to_string()
}

/// Per-collection record counts, reported by the health route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCounts {
    /// Users.
    pub users: usize,
    /// Companies.
    pub companies: usize,
    /// Contacts.
    pub contacts: usize,
    /// Deal stages.
    pub deal_stages: usize,
    /// Deals.
    pub deals: usize,
    /// Task stages.
    pub task_stages: usize,
    /// Tasks.
    pub tasks: usize,
    /// Events.
    pub events: usize,
    /// Audit entries.
    pub audits: usize,
    /// Open sessions.
    pub sessions: usize,
}

/// Result of a successful `login`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    /// Bearer token for later requests.
    pub token: String,
    /// The signed-in user.
    pub user: User,
}

/// What is left of a deleted company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedCompany {
    /// Id the company had.
    pub id: CompanyId,
    /// Name the company had.
    pub name: String,
}

/// All CRM collections and the active sessions.
#[derive(Debug, Default)]
pub struct CrmStore {
    /// CRM users.
    pub users: Vec<User>,
    /// Company accounts.
    pub companies: Vec<Company>,
    /// Contacts.
    pub contacts: Vec<Contact>,
    /// Sales pipeline columns.
    pub deal_stages: Vec<DealStage>,
    /// Deals.
    pub deals: Vec<Deal>,
    /// Task board columns.
    pub task_stages: Vec<TaskStage>,
    /// Tasks.
    pub tasks: Vec<Task>,
    /// Calendar events.
    pub events: Vec<Event>,
    /// Activity log, oldest first.
    pub audits: Vec<Audit>,
    sessions: SessionStore,
}

impl CrmStore {
    /// Build the store from a loaded fixture. A fixture without an `audits`
    /// key gets the default sample log.
    pub fn from_fixture(fixture: Fixture, now: DateTime<Utc>) -> Self {
        let audits = fixture.audits.unwrap_or_else(|| default_audits(now));
        Self {
            users: fixture.users,
            companies: fixture.companies,
            contacts: fixture.contacts,
            deal_stages: fixture.deal_stages,
            deals: fixture.deals,
            task_stages: fixture.task_stages,
            tasks: fixture.tasks,
            events: fixture.events,
            audits,
            sessions: SessionStore::default(),
        }
    }

    /// Record counts of every collection.
    pub fn counts(&self) -> CollectionCounts {
        CollectionCounts {
            users: self.users.len(),
            companies: self.companies.len(),
            contacts: self.contacts.len(),
            deal_stages: self.deal_stages.len(),
            deals: self.deals.len(),
            task_stages: self.task_stages.len(),
            tasks: self.tasks.len(),
            events: self.events.len(),
            audits: self.audits.len(),
            sessions: self.sessions.len(),
        }
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// User by id.
    pub fn user(&self, id: &UserId) -> Option<&User> {
        find(&self.users, id.as_str())
    }

    /// Company by id.
    pub fn company(&self, id: &CompanyId) -> Option<&Company> {
        find(&self.companies, id.as_str())
    }

    /// Contact by id.
    pub fn contact(&self, id: &ContactId) -> Option<&Contact> {
        find(&self.contacts, id.as_str())
    }

    /// Deal by id.
    pub fn deal(&self, id: &DealId) -> Option<&Deal> {
        find(&self.deals, id.as_str())
    }

    /// Deal stage by id.
    pub fn deal_stage(&self, id: &DealStageId) -> Option<&DealStage> {
        find(&self.deal_stages, id.as_str())
    }

    /// Task by id.
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        find(&self.tasks, id.as_str())
    }

    /// Task stage by id.
    pub fn task_stage(&self, id: &TaskStageId) -> Option<&TaskStage> {
        find(&self.task_stages, id.as_str())
    }

    /// Event by id.
    pub fn event(&self, id: &EventId) -> Option<&Event> {
        find(&self.events, id.as_str())
    }

    /// Audit entry by id.
    pub fn audit(&self, id: &AuditId) -> Option<&Audit> {
        find(&self.audits, id.as_str())
    }

    // -----------------------------------------------------------------------
    // Relations
    // -----------------------------------------------------------------------

    /// Contacts employed by a company.
    pub fn contacts_of_company<'a>(
        &'a self,
        id: &'a CompanyId,
    ) -> impl Iterator<Item = &'a Contact> + 'a {
        self.contacts
            .iter()
            .filter(move |c| c.company_id.as_ref() == Some(id))
    }

    /// Deals with a company.
    pub fn deals_of_company<'a>(&'a self, id: &'a CompanyId) -> impl Iterator<Item = &'a Deal> + 'a {
        self.deals
            .iter()
            .filter(move |d| d.company_id.as_ref() == Some(id))
    }

    /// Deals whose point of contact is a contact.
    pub fn deals_of_contact<'a>(&'a self, id: &'a ContactId) -> impl Iterator<Item = &'a Deal> + 'a {
        self.deals
            .iter()
            .filter(move |d| d.contact_id.as_ref() == Some(id))
    }

    /// Deals in a pipeline stage.
    pub fn deals_in_stage<'a>(
        &'a self,
        id: &'a DealStageId,
    ) -> impl Iterator<Item = &'a Deal> + 'a {
        self.deals
            .iter()
            .filter(move |d| d.stage_id.as_ref() == Some(id))
    }

    /// Tasks in a board column.
    pub fn tasks_in_stage<'a>(
        &'a self,
        id: &'a TaskStageId,
    ) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks
            .iter()
            .filter(move |t| t.stage_id.as_ref() == Some(id))
    }

    /// Users attending an event, in user collection order.
    pub fn participants<'a>(&'a self, event: &'a Event) -> impl Iterator<Item = &'a User> + 'a {
        self.users
            .iter()
            .filter(move |u| event.participant_ids.contains(&u.id))
    }

    // -----------------------------------------------------------------------
    // Company mutations
    // -----------------------------------------------------------------------

    /// Insert a new company with the next free id.
    pub fn create_company(
        &mut self,
        input: CompanyCreateInput,
        actor: Option<&UserId>,
        now: DateTime<Utc>,
    ) -> Result<Company, StoreError> {
        if input.name.trim().is_empty() {
            return Err(StoreError::MissingField("name"));
        }

        let company = Company {
            id: CompanyId::new(next_id(&self.companies)),
            name: input.name,
            avatar_url: input.avatar_url,
            business_type: input.business_type,
            company_size: input.company_size,
            industry: input.industry,
            total_revenue: input.total_revenue,
            sales_owner_id: input.sales_owner_id.map(UserId::from),
            created_at: now,
            updated_at: now,
        };
        self.companies.push(company.clone());

        tracing::info!(company_id = %company.id, name = %company.name, "company created");
        self.record_audit(
            AuditAction::Create,
            "Company",
            company.id.as_str(),
            AuditChanges {
                field: Some(String::from("name")),
                from: None,
                to: Some(company.name.clone()),
                description: Some(format!("Created new company: {}", company.name)),
            },
            actor,
            now,
        );
        Ok(company)
    }

    /// Apply a partial update to a company.
    ///
    /// Omitted fields are kept, explicit `null` clears a nullable field, and
    /// `updatedAt` is always bumped.
    pub fn update_company(
        &mut self,
        id: &CompanyId,
        update: CompanyUpdateInput,
        actor: Option<&UserId>,
        now: DateTime<Utc>,
    ) -> Result<Company, StoreError> {
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(StoreError::MissingField("name"));
        }

        let company = self
            .companies
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: Company::ENTITY,
                id: id.to_string(),
            })?;

        let mut changed: Vec<&'static str> = Vec::new();
        if let Some(name) = update.name {
            company.name = name;
            changed.push("name");
        }
        if patch(&mut company.avatar_url, update.avatar_url) {
            changed.push("avatarUrl");
        }
        if patch(&mut company.business_type, update.business_type) {
            changed.push("businessType");
        }
        if patch(&mut company.company_size, update.company_size) {
            changed.push("companySize");
        }
        if patch(&mut company.industry, update.industry) {
            changed.push("industry");
        }
        if patch(&mut company.total_revenue, update.total_revenue) {
            changed.push("totalRevenue");
        }
        let owner = update.sales_owner_id.map_value(UserId::from);
        if patch(&mut company.sales_owner_id, owner) {
            changed.push("salesOwnerId");
        }
        company.updated_at = now;
        let company = company.clone();

        tracing::info!(company_id = %company.id, fields = ?changed, "company updated");
        self.record_audit(
            AuditAction::Update,
            "Company",
            company.id.as_str(),
            AuditChanges {
                field: Some(changed.join(",")),
                from: None,
                to: None,
                description: Some(format!("Updated company: {}", company.name)),
            },
            actor,
            now,
        );
        Ok(company)
    }

    /// Remove a company. Related contacts and deals keep their dangling
    /// `companyId`, which resolves to `null`.
    pub fn delete_company(
        &mut self,
        id: &CompanyId,
        actor: Option<&UserId>,
        now: DateTime<Utc>,
    ) -> Result<DeletedCompany, StoreError> {
        let index = self
            .companies
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: Company::ENTITY,
                id: id.to_string(),
            })?;
        let company = self.companies.remove(index);

        tracing::info!(company_id = %company.id, name = %company.name, "company deleted");
        self.record_audit(
            AuditAction::Delete,
            "Company",
            company.id.as_str(),
            AuditChanges {
                field: None,
                from: Some(company.name.clone()),
                to: None,
                description: Some(format!("Deleted company: {}", company.name)),
            },
            actor,
            now,
        );
        Ok(DeletedCompany {
            id: company.id,
            name: company.name,
        })
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    /// Sign in by email. Any non-empty password is accepted.
    pub fn login(
        &mut self,
        input: &LoginInput,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, StoreError> {
        let user = self
            .users
            .iter()
            .find(|u| u.email == input.email)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: User::ENTITY,
                id: input.email.clone(),
            })?;
        if input.password.is_empty() {
            return Err(StoreError::MissingField("Password"));
        }

        let token = self.sessions.open(&user.id);
        tracing::info!(user_id = %user.id, "user logged in");
        self.record_audit(
            AuditAction::Login,
            "User",
            user.id.as_str(),
            AuditChanges {
                field: Some(String::from("lastLogin")),
                from: None,
                to: Some(now.to_rfc3339()),
                description: Some(String::from("User logged in")),
            },
            Some(&user.id),
            now,
        );
        Ok(LoginOutcome { token, user })
    }

    /// The user behind a session token.
    pub fn session_user(&self, token: &str) -> Option<&User> {
        self.sessions.resolve(token).and_then(|id| self.user(id))
    }

    /// End a session. Returns whether the token was active.
    pub fn logout(&mut self, token: &str, now: DateTime<Utc>) -> bool {
        let Some(user_id) = self.sessions.close(token) else {
            return false;
        };

        tracing::info!(user_id = %user_id, "user logged out");
        self.record_audit(
            AuditAction::Logout,
            "User",
            user_id.as_str(),
            AuditChanges {
                description: Some(String::from("User logged out")),
                ..AuditChanges::default()
            },
            Some(&user_id),
            now,
        );
        true
    }

    fn record_audit(
        &mut self,
        action: AuditAction,
        target_entity: &str,
        target_id: &str,
        changes: AuditChanges,
        actor: Option<&UserId>,
        now: DateTime<Utc>,
    ) {
        let audit = Audit {
            id: AuditId::new(next_id(&self.audits)),
            action,
            target_entity: target_entity.to_owned(),
            target_id: target_id.to_owned(),
            changes: Some(changes),
            user_id: actor.cloned(),
            created_at: now,
        };
        tracing::debug!(
            audit_id = %audit.id,
            action = action.as_str(),
            target_entity,
            target_id,
            "audit recorded"
        );
        self.audits.push(audit);
    }
}

/// Apply one nullable field of a patch. Returns whether the field was
/// present in the input.
fn patch<T>(slot: &mut Option<T>, value: MaybeUndefined<T>) -> bool {
    match value {
        MaybeUndefined::Undefined => false,
        MaybeUndefined::Null => {
            *slot = None;
            true
        }
        MaybeUndefined::Value(v) => {
            *slot = Some(v);
            true
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_graphql::ID;
    use crm_types::{CompanySize, UserRole};

    use super::*;

    fn now() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    fn later() -> DateTime<Utc> {
        "2024-06-02T08:30:00Z".parse().unwrap()
    }

    fn store() -> CrmStore {
        let mut fixture = Fixture::minimal(now());
        fixture.audits = Some(Vec::new());
        fixture.companies.push(Company {
            id: CompanyId::from("7"),
            name: String::from("Acme Corp"),
            avatar_url: None,
            business_type: Some(String::from("B2B")),
            company_size: Some(CompanySize::Large),
            industry: Some(String::from("Manufacturing")),
            total_revenue: Some(1_000_000.0),
            sales_owner_id: Some(UserId::from("1")),
            created_at: now(),
            updated_at: now(),
        });
        CrmStore::from_fixture(fixture, now())
    }

    #[test]
    fn next_id_is_one_past_numeric_max() {
        let s = store();
        assert_eq!(next_id(&s.companies), "8");
        let empty: Vec<Company> = Vec::new();
        assert_eq!(next_id(&empty), "1");
    }

    #[test]
    fn missing_audits_key_seeds_defaults() {
        let s = CrmStore::from_fixture(Fixture::minimal(now()), now());
        assert_eq!(s.audits.len(), 5);
        assert_eq!(s.counts().audits, 5);
        assert_eq!(s.counts().users, 1);
    }

    #[test]
    fn create_assigns_id_and_timestamps() {
        let mut s = store();
        let input = CompanyCreateInput {
            name: String::from("Globex"),
            company_size: Some(CompanySize::Small),
            sales_owner_id: Some(ID::from("1")),
            ..Default::default()
        };
        let created = s
            .create_company(input, Some(&UserId::from("1")), later())
            .unwrap();

        assert_eq!(created.id.as_str(), "8");
        assert_eq!(created.created_at, later());
        assert_eq!(created.updated_at, later());
        assert_eq!(created.sales_owner_id, Some(UserId::from("1")));
        assert_eq!(s.companies.len(), 2);

        let audit = s.audits.last().unwrap();
        assert_eq!(audit.action, AuditAction::Create);
        assert_eq!(audit.target_id, "8");
        assert_eq!(audit.user_id, Some(UserId::from("1")));
    }

    #[test]
    fn create_rejects_blank_name() {
        let mut s = store();
        let input = CompanyCreateInput {
            name: String::from("  "),
            ..Default::default()
        };
        let err = s.create_company(input, None, later()).unwrap_err();
        assert_eq!(err.code(), "BAD_USER_INPUT");
        assert_eq!(s.companies.len(), 1);
    }

    #[test]
    fn update_merges_only_provided_fields() {
        let mut s = store();
        let update = CompanyUpdateInput {
            name: Some(String::from("Acme Holdings")),
            industry: MaybeUndefined::Null,
            total_revenue: MaybeUndefined::Value(2_500_000.0),
            ..Default::default()
        };
        let updated = s
            .update_company(&CompanyId::from("7"), update, None, later())
            .unwrap();

        assert_eq!(updated.name, "Acme Holdings");
        assert!(updated.industry.is_none());
        assert!(
            updated
                .total_revenue
                .is_some_and(|r| (r - 2_500_000.0).abs() < f64::EPSILON)
        );
        assert_eq!(updated.business_type.as_deref(), Some("B2B"));
        assert_eq!(updated.company_size, Some(CompanySize::Large));
        assert_eq!(updated.created_at, now());
        assert_eq!(updated.updated_at, later());

        let audit = s.audits.last().unwrap();
        assert_eq!(audit.action, AuditAction::Update);
        let changes = audit.changes.as_ref().unwrap();
        assert_eq!(changes.field.as_deref(), Some("name,industry,totalRevenue"));
        assert!(audit.user_id.is_none());
    }

    #[test]
    fn update_unknown_company_is_not_found() {
        let mut s = store();
        let err = s
            .update_company(
                &CompanyId::from("99"),
                CompanyUpdateInput::default(),
                None,
                later(),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "Company not found");
        assert!(s.audits.is_empty());
    }

    #[test]
    fn delete_returns_id_and_name() {
        let mut s = store();
        let deleted = s
            .delete_company(&CompanyId::from("7"), None, later())
            .unwrap();
        assert_eq!(deleted.id.as_str(), "7");
        assert_eq!(deleted.name, "Acme Corp");
        assert!(s.companies.is_empty());
        assert!(s.delete_company(&CompanyId::from("7"), None, later()).is_err());
    }

    #[test]
    fn login_opens_a_session() {
        let mut s = store();
        let input = LoginInput {
            email: String::from("john@refine.dev"),
            password: String::from("demodemo"),
        };
        let outcome = s.login(&input, later()).unwrap();
        assert!(outcome.token.starts_with("token-1-"));
        assert_eq!(outcome.user.role, UserRole::Admin);
        assert_eq!(
            s.session_user(&outcome.token).map(|u| u.name.as_str()),
            Some("John Doe")
        );
        assert_eq!(s.counts().sessions, 1);
        assert_eq!(s.audits.last().unwrap().action, AuditAction::Login);

        assert!(s.logout(&outcome.token, later()));
        assert!(s.session_user(&outcome.token).is_none());
        assert!(!s.logout(&outcome.token, later()));
        assert_eq!(s.audits.last().unwrap().action, AuditAction::Logout);
    }

    #[test]
    fn login_errors() {
        let mut s = store();
        let unknown = LoginInput {
            email: String::from("nobody@refine.dev"),
            password: String::from("x"),
        };
        assert_eq!(
            s.login(&unknown, later()).unwrap_err().to_string(),
            "User not found"
        );

        let empty = LoginInput {
            email: String::from("john@refine.dev"),
            password: String::new(),
        };
        assert_eq!(
            s.login(&empty, later()).unwrap_err().to_string(),
            "Password is required"
        );
    }

    #[test]
    fn relations_follow_id_fields() {
        let mut s = store();
        let acme = CompanyId::from("7");
        s.contacts.push(Contact {
            id: ContactId::from("1"),
            name: String::from("Jane"),
            email: String::from("jane@acme.test"),
            avatar_url: None,
            job_title: None,
            phone: None,
            stage: crm_types::ContactStage::Lead,
            status: crm_types::ContactStatus::Active,
            company_id: Some(acme.clone()),
            sales_owner_id: None,
            created_at: now(),
            updated_at: now(),
        });
        assert_eq!(s.contacts_of_company(&acme).count(), 1);
        assert_eq!(s.contacts_of_company(&CompanyId::from("8")).count(), 0);
        assert_eq!(s.deals_of_company(&acme).count(), 0);
    }
}
