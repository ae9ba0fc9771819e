//! Entity filters.
//!
//! One filter input per collection. A filter matches a record when every
//! field comparison that is set matches, every filter in `and` matches,
//! and (when `or` is a non-empty list) at least one filter in `or`
//! matches. The empty filter `{}` matches everything.

use async_graphql::InputObject;
use crm_types::{
    Audit, AuditAction, Company, CompanySize, Contact, ContactStage, ContactStatus, Deal,
    DealStage, Event, Task, TaskStage, User, UserRole,
};

use super::comparison::{
    Comparison, DateFieldComparison, EnumFieldComparison, IdFilterComparison,
    NumberFieldComparison, StringFieldComparison,
};

/// A predicate over whole records of type `R`.
pub trait RecordFilter<R> {
    /// Whether `record` passes the filter.
    fn matches(&self, record: &R) -> bool;
}

fn field<C: Comparison<V>, V: ?Sized>(comparison: Option<&C>, value: Option<&V>) -> bool {
    comparison.is_none_or(|c| c.matches(value))
}

fn nested<R, F: RecordFilter<R>>(and: Option<&[F]>, or: Option<&[F]>, record: &R) -> bool {
    and.is_none_or(|all| all.iter().all(|f| f.matches(record)))
        && or.is_none_or(|any| any.is_empty() || any.iter().any(|f| f.matches(record)))
}

/// Filter over users.
#[derive(Debug, Clone, Default, InputObject)]
pub struct UserFilter {
    /// User id.
    pub id: Option<IdFilterComparison>,
    /// Display name.
    pub name: Option<StringFieldComparison>,
    /// Login email.
    pub email: Option<StringFieldComparison>,
    /// Permission level.
    pub role: Option<EnumFieldComparison<UserRole>>,
    /// All of these must match.
    pub and: Option<Vec<UserFilter>>,
    /// At least one of these must match.
    pub or: Option<Vec<UserFilter>>,
}

impl RecordFilter<User> for UserFilter {
    fn matches(&self, user: &User) -> bool {
        field(self.id.as_ref(), Some(user.id.as_str()))
            && field(self.name.as_ref(), Some(user.name.as_str()))
            && field(self.email.as_ref(), Some(user.email.as_str()))
            && field(self.role.as_ref(), Some(&user.role))
            && nested(self.and.as_deref(), self.or.as_deref(), user)
    }
}

/// Filter over companies.
#[derive(Debug, Clone, Default, InputObject)]
pub struct CompanyFilter {
    /// Company id.
    pub id: Option<IdFilterComparison>,
    /// Company name.
    pub name: Option<StringFieldComparison>,
    /// Head-count bucket.
    pub company_size: Option<EnumFieldComparison<CompanySize>>,
    /// Industry label.
    pub industry: Option<StringFieldComparison>,
    /// Annual revenue.
    pub total_revenue: Option<NumberFieldComparison>,
    /// Owning sales user.
    pub sales_owner_id: Option<IdFilterComparison>,
    /// All of these must match.
    pub and: Option<Vec<CompanyFilter>>,
    /// At least one of these must match.
    pub or: Option<Vec<CompanyFilter>>,
}

impl RecordFilter<Company> for CompanyFilter {
    fn matches(&self, company: &Company) -> bool {
        field(self.id.as_ref(), Some(company.id.as_str()))
            && field(self.name.as_ref(), Some(company.name.as_str()))
            && field(self.company_size.as_ref(), company.company_size.as_ref())
            && field(self.industry.as_ref(), company.industry.as_deref())
            && field(self.total_revenue.as_ref(), company.total_revenue.as_ref())
            && field(
                self.sales_owner_id.as_ref(),
                company.sales_owner_id.as_ref().map(|id| id.as_str()),
            )
            && nested(self.and.as_deref(), self.or.as_deref(), company)
    }
}

/// Filter over contacts.
#[derive(Debug, Clone, Default, InputObject)]
pub struct ContactFilter {
    /// Contact id.
    pub id: Option<IdFilterComparison>,
    /// Full name.
    pub name: Option<StringFieldComparison>,
    /// Email address.
    pub email: Option<StringFieldComparison>,
    /// Funnel stage.
    pub stage: Option<EnumFieldComparison<ContactStage>>,
    /// Engagement status.
    pub status: Option<EnumFieldComparison<ContactStatus>>,
    /// Employer.
    pub company_id: Option<IdFilterComparison>,
    /// All of these must match.
    pub and: Option<Vec<ContactFilter>>,
    /// At least one of these must match.
    pub or: Option<Vec<ContactFilter>>,
}

impl RecordFilter<Contact> for ContactFilter {
    fn matches(&self, contact: &Contact) -> bool {
        field(self.id.as_ref(), Some(contact.id.as_str()))
            && field(self.name.as_ref(), Some(contact.name.as_str()))
            && field(self.email.as_ref(), Some(contact.email.as_str()))
            && field(self.stage.as_ref(), Some(&contact.stage))
            && field(self.status.as_ref(), Some(&contact.status))
            && field(
                self.company_id.as_ref(),
                contact.company_id.as_ref().map(|id| id.as_str()),
            )
            && nested(self.and.as_deref(), self.or.as_deref(), contact)
    }
}

/// Filter over deals.
#[derive(Debug, Clone, Default, InputObject)]
pub struct DealFilter {
    /// Deal id.
    pub id: Option<IdFilterComparison>,
    /// Deal title.
    pub title: Option<StringFieldComparison>,
    /// Monetary value.
    pub value: Option<NumberFieldComparison>,
    /// Pipeline stage.
    pub stage_id: Option<IdFilterComparison>,
    /// Counterparty company.
    pub company_id: Option<IdFilterComparison>,
    /// Creation time.
    pub created_at: Option<DateFieldComparison>,
    /// All of these must match.
    pub and: Option<Vec<DealFilter>>,
    /// At least one of these must match.
    pub or: Option<Vec<DealFilter>>,
}

impl RecordFilter<Deal> for DealFilter {
    fn matches(&self, deal: &Deal) -> bool {
        field(self.id.as_ref(), Some(deal.id.as_str()))
            && field(self.title.as_ref(), Some(deal.title.as_str()))
            && field(self.value.as_ref(), Some(&deal.value))
            && field(
                self.stage_id.as_ref(),
                deal.stage_id.as_ref().map(|id| id.as_str()),
            )
            && field(
                self.company_id.as_ref(),
                deal.company_id.as_ref().map(|id| id.as_str()),
            )
            && field(self.created_at.as_ref(), Some(&deal.created_at))
            && nested(self.and.as_deref(), self.or.as_deref(), deal)
    }
}

/// Filter over deal stages.
#[derive(Debug, Clone, Default, InputObject)]
pub struct DealStageFilter {
    /// Stage id.
    pub id: Option<IdFilterComparison>,
    /// Stage title.
    pub title: Option<StringFieldComparison>,
    /// All of these must match.
    pub and: Option<Vec<DealStageFilter>>,
    /// At least one of these must match.
    pub or: Option<Vec<DealStageFilter>>,
}

impl RecordFilter<DealStage> for DealStageFilter {
    fn matches(&self, stage: &DealStage) -> bool {
        field(self.id.as_ref(), Some(stage.id.as_str()))
            && field(self.title.as_ref(), Some(stage.title.as_str()))
            && nested(self.and.as_deref(), self.or.as_deref(), stage)
    }
}

/// Filter over tasks.
#[derive(Debug, Clone, Default, InputObject)]
pub struct TaskFilter {
    /// Task id.
    pub id: Option<IdFilterComparison>,
    /// Task title.
    pub title: Option<StringFieldComparison>,
    /// Board column.
    pub stage_id: Option<IdFilterComparison>,
    /// Deadline.
    pub due_date: Option<DateFieldComparison>,
    /// All of these must match.
    pub and: Option<Vec<TaskFilter>>,
    /// At least one of these must match.
    pub or: Option<Vec<TaskFilter>>,
}

impl RecordFilter<Task> for TaskFilter {
    fn matches(&self, task: &Task) -> bool {
        field(self.id.as_ref(), Some(task.id.as_str()))
            && field(self.title.as_ref(), Some(task.title.as_str()))
            && field(
                self.stage_id.as_ref(),
                task.stage_id.as_ref().map(|id| id.as_str()),
            )
            && field(self.due_date.as_ref(), task.due_date.as_ref())
            && nested(self.and.as_deref(), self.or.as_deref(), task)
    }
}

/// Filter over task stages.
#[derive(Debug, Clone, Default, InputObject)]
pub struct TaskStageFilter {
    /// Stage id.
    pub id: Option<IdFilterComparison>,
    /// Stage title.
    pub title: Option<StringFieldComparison>,
    /// All of these must match.
    pub and: Option<Vec<TaskStageFilter>>,
    /// At least one of these must match.
    pub or: Option<Vec<TaskStageFilter>>,
}

impl RecordFilter<TaskStage> for TaskStageFilter {
    fn matches(&self, stage: &TaskStage) -> bool {
        field(self.id.as_ref(), Some(stage.id.as_str()))
            && field(self.title.as_ref(), Some(stage.title.as_str()))
            && nested(self.and.as_deref(), self.or.as_deref(), stage)
    }
}

/// Filter over calendar events.
#[derive(Debug, Clone, Default, InputObject)]
pub struct EventFilter {
    /// Event id.
    pub id: Option<IdFilterComparison>,
    /// Event title.
    pub title: Option<StringFieldComparison>,
    /// Start instant.
    pub start_date: Option<DateFieldComparison>,
    /// End instant.
    pub end_date: Option<DateFieldComparison>,
    /// All of these must match.
    pub and: Option<Vec<EventFilter>>,
    /// At least one of these must match.
    pub or: Option<Vec<EventFilter>>,
}

impl RecordFilter<Event> for EventFilter {
    fn matches(&self, event: &Event) -> bool {
        field(self.id.as_ref(), Some(event.id.as_str()))
            && field(self.title.as_ref(), Some(event.title.as_str()))
            && field(self.start_date.as_ref(), Some(&event.start_date))
            && field(self.end_date.as_ref(), Some(&event.end_date))
            && nested(self.and.as_deref(), self.or.as_deref(), event)
    }
}

/// Filter over audit log records.
#[derive(Debug, Clone, Default, InputObject)]
pub struct AuditFilter {
    /// Audit id.
    pub id: Option<IdFilterComparison>,
    /// Kind of change.
    pub action: Option<EnumFieldComparison<AuditAction>>,
    /// Entity type name.
    pub target_entity: Option<StringFieldComparison>,
    /// Affected record id.
    pub target_id: Option<IdFilterComparison>,
    /// Acting user.
    pub user_id: Option<IdFilterComparison>,
    /// When the action happened.
    pub created_at: Option<DateFieldComparison>,
    /// All of these must match.
    pub and: Option<Vec<AuditFilter>>,
    /// At least one of these must match.
    pub or: Option<Vec<AuditFilter>>,
}

impl RecordFilter<Audit> for AuditFilter {
    fn matches(&self, audit: &Audit) -> bool {
        field(self.id.as_ref(), Some(audit.id.as_str()))
            && field(self.action.as_ref(), Some(&audit.action))
            && field(self.target_entity.as_ref(), Some(audit.target_entity.as_str()))
            && field(self.target_id.as_ref(), Some(audit.target_id.as_str()))
            && field(
                self.user_id.as_ref(),
                audit.user_id.as_ref().map(|id| id.as_str()),
            )
            && field(self.created_at.as_ref(), Some(&audit.created_at))
            && nested(self.and.as_deref(), self.or.as_deref(), audit)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_graphql::ID;
    use chrono::{TimeZone, Utc};
    use crm_types::{CompanyId, UserId};

    use super::*;

    fn company(id: &str, name: &str, size: Option<CompanySize>, revenue: Option<f64>) -> Company {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Company {
            id: CompanyId::from(id),
            name: String::from(name),
            avatar_url: None,
            business_type: None,
            company_size: size,
            industry: None,
            total_revenue: revenue,
            sales_owner_id: Some(UserId::from("1")),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let acme = company("1", "Acme", None, None);
        assert!(CompanyFilter::default().matches(&acme));
    }

    #[test]
    fn fields_are_conjunctive() {
        let acme = company("1", "Acme", Some(CompanySize::Enterprise), Some(5_000_000.0));
        let filter = CompanyFilter {
            name: Some(StringFieldComparison {
                i_like: Some(String::from("acme")),
                ..Default::default()
            }),
            company_size: Some(EnumFieldComparison {
                eq: Some(CompanySize::Small),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!filter.matches(&acme));
    }

    #[test]
    fn or_needs_one_branch_and_needs_all() {
        let acme = company("1", "Acme", Some(CompanySize::Enterprise), Some(5_000_000.0));
        let by_id = |id: &str| CompanyFilter {
            id: Some(IdFilterComparison {
                eq: Some(ID::from(id)),
                ..Default::default()
            }),
            ..Default::default()
        };

        let either = CompanyFilter {
            or: Some(vec![by_id("9"), by_id("1")]),
            ..Default::default()
        };
        assert!(either.matches(&acme));

        let both = CompanyFilter {
            and: Some(vec![by_id("9"), by_id("1")]),
            ..Default::default()
        };
        assert!(!both.matches(&acme));

        let empty_or = CompanyFilter {
            or: Some(Vec::new()),
            ..Default::default()
        };
        assert!(empty_or.matches(&acme));
    }

    #[test]
    fn null_fields_follow_missing_value_rules() {
        let bare = company("2", "Bare", None, None);
        let revenue = CompanyFilter {
            total_revenue: Some(NumberFieldComparison {
                gte: Some(0.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!revenue.matches(&bare));

        let not_small = CompanyFilter {
            company_size: Some(EnumFieldComparison {
                neq: Some(CompanySize::Small),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(not_small.matches(&bare));
    }
}
