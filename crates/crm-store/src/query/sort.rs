//! Multi-key stable sorting.
//!
//! The first sort key decides; later keys only break ties; records that
//! are still equal keep their collection order. `null` values sort first
//! ascending and last descending.

use std::cmp::Ordering;

use async_graphql::{Enum, InputObject, InputType};
use chrono::{DateTime, Utc};
use crm_types::{Audit, Company, Contact, Deal, DealStage, Event, Task, TaskStage, User};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// One sort key: a field and a direction.
#[derive(Debug, Clone, Copy, InputObject)]
#[graphql(
    concrete(name = "UserSort", params(UserSortFields)),
    concrete(name = "CompanySort", params(CompanySortFields)),
    concrete(name = "ContactSort", params(ContactSortFields)),
    concrete(name = "DealSort", params(DealSortFields)),
    concrete(name = "DealStageSort", params(DealStageSortFields)),
    concrete(name = "TaskSort", params(TaskSortFields)),
    concrete(name = "TaskStageSort", params(TaskStageSortFields)),
    concrete(name = "EventSort", params(EventSortFields)),
    concrete(name = "AuditSort", params(AuditSortFields))
)]
pub struct Sort<F: InputType> {
    /// Field to sort by.
    pub field: F,
    /// Direction to sort in.
    pub direction: SortDirection,
}

impl<F: InputType> Sort<F> {
    /// Ascending sort on `field`.
    pub const fn asc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on `field`.
    pub const fn desc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// A comparable projection of one record field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    /// Field is `null`.
    Null,
    /// Record id; numeric ids compare numerically.
    Id(&'a str),
    /// Free text, compared lexicographically.
    Text(&'a str),
    /// Number.
    Number(f64),
    /// Instant.
    Date(DateTime<Utc>),
}

impl SortValue<'_> {
    fn from_number(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::Number)
    }

    fn from_date(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(Self::Null, Self::Date)
    }

    /// Total order used by the sorter.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Less,
            (_, Self::Null) => Ordering::Greater,
            (Self::Id(a), Self::Id(b)) => compare_ids(a, b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            // One field always yields one variant.
            _ => Ordering::Equal,
        }
    }
}

/// Compare ids numerically when both are integers, else as strings.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

/// A sortable field of records of type `R`.
pub trait SortField<R>: Copy {
    /// Project the field out of `record`.
    fn sort_value(self, record: &R) -> SortValue<'_>;
}

/// Stable in-place sort of `records` by `sorting`. An empty key list is a no-op.
pub fn apply_sorting<R, F>(records: &mut [&R], sorting: &[Sort<F>])
where
    F: SortField<R> + InputType,
{
    if sorting.is_empty() {
        return;
    }

    records.sort_by(|a, b| {
        sorting
            .iter()
            .map(|key| {
                let ordering = key.field.sort_value(a).compare(&key.field.sort_value(b));
                match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

// ---------------------------------------------------------------------------
// Per-collection sort fields
// ---------------------------------------------------------------------------

/// Sortable user fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(rename_items = "camelCase")]
pub enum UserSortFields {
    /// Id.
    Id,
    /// Name.
    Name,
    /// Email.
    Email,
    /// Creation time.
    CreatedAt,
    /// Modification time.
    UpdatedAt,
}

impl SortField<User> for UserSortFields {
    fn sort_value(self, user: &User) -> SortValue<'_> {
        match self {
            Self::Id => SortValue::Id(user.id.as_str()),
            Self::Name => SortValue::Text(&user.name),
            Self::Email => SortValue::Text(&user.email),
            Self::CreatedAt => SortValue::Date(user.created_at),
            Self::UpdatedAt => SortValue::Date(user.updated_at),
        }
    }
}

/// Sortable company fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(rename_items = "camelCase")]
pub enum CompanySortFields {
    /// Id.
    Id,
    /// Name.
    Name,
    /// Annual revenue.
    TotalRevenue,
    /// Creation time.
    CreatedAt,
    /// Modification time.
    UpdatedAt,
}

impl SortField<Company> for CompanySortFields {
    fn sort_value(self, company: &Company) -> SortValue<'_> {
        match self {
            Self::Id => SortValue::Id(company.id.as_str()),
            Self::Name => SortValue::Text(&company.name),
            Self::TotalRevenue => SortValue::from_number(company.total_revenue),
            Self::CreatedAt => SortValue::Date(company.created_at),
            Self::UpdatedAt => SortValue::Date(company.updated_at),
        }
    }
}

/// Sortable contact fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(rename_items = "camelCase")]
pub enum ContactSortFields {
    /// Id.
    Id,
    /// Name.
    Name,
    /// Email.
    Email,
    /// Creation time.
    CreatedAt,
    /// Modification time.
    UpdatedAt,
}

impl SortField<Contact> for ContactSortFields {
    fn sort_value(self, contact: &Contact) -> SortValue<'_> {
        match self {
            Self::Id => SortValue::Id(contact.id.as_str()),
            Self::Name => SortValue::Text(&contact.name),
            Self::Email => SortValue::Text(&contact.email),
            Self::CreatedAt => SortValue::Date(contact.created_at),
            Self::UpdatedAt => SortValue::Date(contact.updated_at),
        }
    }
}

/// Sortable deal fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(rename_items = "camelCase")]
pub enum DealSortFields {
    /// Id.
    Id,
    /// Title.
    Title,
    /// Monetary value.
    Value,
    /// Creation time.
    CreatedAt,
    /// Modification time.
    UpdatedAt,
}

impl SortField<Deal> for DealSortFields {
    fn sort_value(self, deal: &Deal) -> SortValue<'_> {
        match self {
            Self::Id => SortValue::Id(deal.id.as_str()),
            Self::Title => SortValue::Text(&deal.title),
            Self::Value => SortValue::Number(deal.value),
            Self::CreatedAt => SortValue::Date(deal.created_at),
            Self::UpdatedAt => SortValue::Date(deal.updated_at),
        }
    }
}

/// Sortable deal stage fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(rename_items = "camelCase")]
pub enum DealStageSortFields {
    /// Id.
    Id,
    /// Title.
    Title,
    /// Creation time.
    CreatedAt,
    /// Modification time.
    UpdatedAt,
}

impl SortField<DealStage> for DealStageSortFields {
    fn sort_value(self, stage: &DealStage) -> SortValue<'_> {
        match self {
            Self::Id => SortValue::Id(stage.id.as_str()),
            Self::Title => SortValue::Text(&stage.title),
            Self::CreatedAt => SortValue::Date(stage.created_at),
            Self::UpdatedAt => SortValue::Date(stage.updated_at),
        }
    }
}

/// Sortable task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(rename_items = "camelCase")]
pub enum TaskSortFields {
    /// Id.
    Id,
    /// Title.
    Title,
    /// Deadline.
    DueDate,
    /// Creation time.
    CreatedAt,
    /// Modification time.
    UpdatedAt,
}

impl SortField<Task> for TaskSortFields {
    fn sort_value(self, task: &Task) -> SortValue<'_> {
        match self {
            Self::Id => SortValue::Id(task.id.as_str()),
            Self::Title => SortValue::Text(&task.title),
            Self::DueDate => SortValue::from_date(task.due_date),
            Self::CreatedAt => SortValue::Date(task.created_at),
            Self::UpdatedAt => SortValue::Date(task.updated_at),
        }
    }
}

/// Sortable task stage fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(rename_items = "camelCase")]
pub enum TaskStageSortFields {
    /// Id.
    Id,
    /// Title.
    Title,
    /// Creation time.
    CreatedAt,
    /// Modification time.
    UpdatedAt,
}

impl SortField<TaskStage> for TaskStageSortFields {
    fn sort_value(self, stage: &TaskStage) -> SortValue<'_> {
        match self {
            Self::Id => SortValue::Id(stage.id.as_str()),
            Self::Title => SortValue::Text(&stage.title),
            Self::CreatedAt => SortValue::Date(stage.created_at),
            Self::UpdatedAt => SortValue::Date(stage.updated_at),
        }
    }
}

/// Sortable event fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(rename_items = "camelCase")]
pub enum EventSortFields {
    /// Id.
    Id,
    /// Title.
    Title,
    /// Start instant.
    StartDate,
    /// End instant.
    EndDate,
    /// Creation time.
    CreatedAt,
    /// Modification time.
    UpdatedAt,
}

impl SortField<Event> for EventSortFields {
    fn sort_value(self, event: &Event) -> SortValue<'_> {
        match self {
            Self::Id => SortValue::Id(event.id.as_str()),
            Self::Title => SortValue::Text(&event.title),
            Self::StartDate => SortValue::Date(event.start_date),
            Self::EndDate => SortValue::Date(event.end_date),
            Self::CreatedAt => SortValue::Date(event.created_at),
            Self::UpdatedAt => SortValue::Date(event.updated_at),
        }
    }
}

/// Sortable audit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(rename_items = "camelCase")]
pub enum AuditSortFields {
    /// Id.
    Id,
    /// Action name.
    Action,
    /// Entity type name.
    TargetEntity,
    /// Creation time.
    CreatedAt,
}

impl SortField<Audit> for AuditSortFields {
    fn sort_value(self, audit: &Audit) -> SortValue<'_> {
        match self {
            Self::Id => SortValue::Id(audit.id.as_str()),
            Self::Action => SortValue::Text(audit.action.as_str()),
            Self::TargetEntity => SortValue::Text(&audit.target_entity),
            Self::CreatedAt => SortValue::Date(audit.created_at),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use crm_types::{CompanyId, DealId};

    use super::*;

    fn deal(id: &str, title: &str, value: f64) -> Deal {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Deal {
            id: DealId::from(id),
            title: String::from(title),
            value,
            stage_id: None,
            company_id: None,
            contact_id: None,
            sales_owner_id: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn ids(records: &[&Deal]) -> Vec<String> {
        records.iter().map(|d| d.id.to_string()).collect()
    }

    #[test]
    fn empty_sorting_keeps_collection_order() {
        let deals = [deal("3", "c", 1.0), deal("1", "a", 2.0)];
        let mut refs: Vec<&Deal> = deals.iter().collect();
        apply_sorting::<Deal, DealSortFields>(&mut refs, &[]);
        assert_eq!(ids(&refs), ["3", "1"]);
    }

    #[test]
    fn direction_is_respected() {
        let deals = [deal("1", "b", 20.0), deal("2", "a", 10.0), deal("3", "c", 30.0)];
        let mut refs: Vec<&Deal> = deals.iter().collect();

        apply_sorting(&mut refs, &[Sort::asc(DealSortFields::Value)]);
        assert_eq!(ids(&refs), ["2", "1", "3"]);

        apply_sorting(&mut refs, &[Sort::desc(DealSortFields::Title)]);
        assert_eq!(ids(&refs), ["3", "1", "2"]);
    }

    #[test]
    fn ties_keep_original_order_and_later_keys_break_them() {
        let deals = [
            deal("1", "same", 5.0),
            deal("2", "same", 9.0),
            deal("3", "same", 5.0),
        ];
        let mut refs: Vec<&Deal> = deals.iter().collect();

        apply_sorting(&mut refs, &[Sort::asc(DealSortFields::Title)]);
        assert_eq!(ids(&refs), ["1", "2", "3"]);

        apply_sorting(
            &mut refs,
            &[Sort::asc(DealSortFields::Title), Sort::desc(DealSortFields::Value)],
        );
        assert_eq!(ids(&refs), ["2", "1", "3"]);
    }

    #[test]
    fn numeric_ids_sort_numerically() {
        let deals = [deal("10", "a", 0.0), deal("9", "b", 0.0), deal("100", "c", 0.0)];
        let mut refs: Vec<&Deal> = deals.iter().collect();
        apply_sorting(&mut refs, &[Sort::asc(DealSortFields::Id)]);
        assert_eq!(ids(&refs), ["9", "10", "100"]);
        assert_eq!(compare_ids("abc", "abd"), Ordering::Less);
    }

    #[test]
    fn nulls_first_ascending_last_descending() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let company = |id: &str, revenue: Option<f64>| Company {
            id: CompanyId::from(id),
            name: String::from("c"),
            avatar_url: None,
            business_type: None,
            company_size: None,
            industry: None,
            total_revenue: revenue,
            sales_owner_id: None,
            created_at: at,
            updated_at: at,
        };
        let companies = [company("1", Some(5.0)), company("2", None), company("3", Some(1.0))];
        let mut refs: Vec<&Company> = companies.iter().collect();

        apply_sorting(&mut refs, &[Sort::asc(CompanySortFields::TotalRevenue)]);
        let order: Vec<&str> = refs.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, ["2", "3", "1"]);

        apply_sorting(&mut refs, &[Sort::desc(CompanySortFields::TotalRevenue)]);
        let order: Vec<&str> = refs.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, ["1", "3", "2"]);
    }
}
