//! The `demo-data.json` fixture file.
//!
//! The server reads it once at startup; the seed tool writes it. A missing
//! file is not fatal: the server falls back to [`Fixture::minimal`] so it can
//! always boot with at least one user to sign in as.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use crm_types::{
    Audit, AuditAction, AuditChanges, AuditId, Company, Contact, Deal, DealStage, Event, Task,
    TaskStage, User, UserId, UserRole,
};
use serde::{Deserialize, Serialize};

use crate::error::FixtureError;

/// Serialized shape of the fixture file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    /// CRM users.
    #[serde(default)]
    pub users: Vec<User>,
    /// Company accounts.
    #[serde(default)]
    pub companies: Vec<Company>,
    /// Contacts.
    #[serde(default)]
    pub contacts: Vec<Contact>,
    /// Sales pipeline columns.
    #[serde(default)]
    pub deal_stages: Vec<DealStage>,
    /// Deals.
    #[serde(default)]
    pub deals: Vec<Deal>,
    /// Task board columns.
    #[serde(default)]
    pub task_stages: Vec<TaskStage>,
    /// Tasks.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Calendar events.
    #[serde(default)]
    pub events: Vec<Event>,
    /// Activity log. `None` when the file has no `audits` key, in which case
    /// the store seeds [`default_audits`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audits: Option<Vec<Audit>>,
}

impl Fixture {
    /// Load the fixture at `path`.
    ///
    /// A missing file yields [`Fixture::minimal`] with a warning. Any other
    /// read failure, or malformed JSON, is an error.
    pub fn load(path: &Path, now: DateTime<Utc>) -> Result<Self, FixtureError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %path.display(),
                    "fixture file not found, starting with a minimal data set"
                );
                return Ok(Self::minimal(now));
            }
            Err(source) => {
                return Err(FixtureError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let fixture = Self::parse(&raw)?;
        tracing::info!(
            path = %path.display(),
            users = fixture.users.len(),
            companies = fixture.companies.len(),
            contacts = fixture.contacts.len(),
            deals = fixture.deals.len(),
            tasks = fixture.tasks.len(),
            events = fixture.events.len(),
            "fixture loaded"
        );
        Ok(fixture)
    }

    /// Parse fixture JSON.
    pub fn parse(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the fixture as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), FixtureError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// One admin user and nothing else.
    pub fn minimal(now: DateTime<Utc>) -> Self {
        Self {
            users: vec![User {
                id: UserId::from("1"),
                name: String::from("John Doe"),
                email: String::from("john@refine.dev"),
                avatar_url: Some(String::from("https://i.pravatar.cc/150?img=1")),
                job_title: Some(String::from("Sales Manager")),
                phone: Some(String::from("+1-555-0123")),
                timezone: Some(String::from("America/New_York")),
                role: UserRole::Admin,
                created_at: now,
                updated_at: now,
            }],
            ..Self::default()
        }
    }
}

/// Sample activity log used when the fixture carries none.
pub fn default_audits(now: DateTime<Utc>) -> Vec<Audit> {
    fn change(field: &str, from: Option<&str>, to: &str, description: &str) -> AuditChanges {
        AuditChanges {
            field: Some(field.to_owned()),
            from: from.map(str::to_owned),
            to: Some(to.to_owned()),
            description: Some(description.to_owned()),
        }
    }

    let entries = [
        (
            AuditAction::Create,
            "Deal",
            change("title", None, "Product Demo", "Created new deal: Product Demo"),
            "1",
            Duration::days(1),
        ),
        (
            AuditAction::Update,
            "Company",
            change(
                "totalRevenue",
                Some("500000"),
                "750000",
                "Updated company revenue from $500K to $750K",
            ),
            "2",
            Duration::days(2),
        ),
        (
            AuditAction::Create,
            "Contact",
            change("name", None, "John Smith", "Added new contact: John Smith"),
            "1",
            Duration::days(3),
        ),
        (
            AuditAction::Login,
            "User",
            change("lastLogin", None, &now.to_rfc3339(), "User logged in"),
            "1",
            Duration::hours(1),
        ),
        (
            AuditAction::Update,
            "Task",
            change("completed", Some("false"), "true", "Marked task as completed"),
            "2",
            Duration::hours(2),
        ),
    ];

    entries
        .into_iter()
        .zip(1_u32..)
        .map(|((action, target, changes, user, age), n)| Audit {
            id: AuditId::new(n.to_string()),
            action,
            target_entity: target.to_owned(),
            target_id: String::from("1"),
            changes: Some(changes),
            user_id: Some(UserId::from(user)),
            created_at: now.checked_sub_signed(age).unwrap_or(now),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn empty_object_is_a_valid_fixture() {
        let fixture = Fixture::parse("{}").unwrap();
        assert!(fixture.users.is_empty());
        assert!(fixture.deal_stages.is_empty());
        assert!(fixture.audits.is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Fixture::parse("{\"users\": ["),
            Err(FixtureError::Json(_))
        ));
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        let json = r#"{"users": [{
            "id": "1", "name": "A", "email": "a@x.dev", "role": "USER",
            "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"
        }]}"#;
        assert!(Fixture::parse(json).is_err());
    }

    #[test]
    fn missing_file_falls_back_to_minimal() {
        let path = std::env::temp_dir().join("crm-store-no-such-fixture.json");
        let fixture = Fixture::load(&path, now()).unwrap();
        assert_eq!(fixture.users.len(), 1);
        let user = fixture.users.first().unwrap();
        assert_eq!(user.email, "john@refine.dev");
        assert_eq!(user.role, UserRole::Admin);
        assert!(fixture.companies.is_empty());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "crm-store-fixture-{}.json",
            uuid::Uuid::new_v4().simple()
        ));
        let fixture = Fixture::minimal(now());
        fixture.save(&path).unwrap();
        let loaded = Fixture::load(&path, now()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, fixture);
    }

    #[test]
    fn default_audits_are_relative_to_now() {
        let audits = default_audits(now());
        assert_eq!(audits.len(), 5);

        let ids: Vec<&str> = audits.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5"]);

        let login = audits.get(3).unwrap();
        assert_eq!(login.action, AuditAction::Login);
        assert_eq!(login.target_entity, "User");
        assert_eq!(login.created_at, now() - Duration::hours(1));

        let revenue = audits.get(1).unwrap();
        let changes = revenue.changes.as_ref().unwrap();
        assert_eq!(changes.from.as_deref(), Some("500000"));
        assert_eq!(changes.to.as_deref(), Some("750000"));
        assert_eq!(revenue.user_id, Some(UserId::from("2")));
    }
}
