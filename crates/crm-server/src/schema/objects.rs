//! GraphQL output types.
//!
//! Each record type from `crm-types` is wrapped in a `*Node` newtype so
//! relation fields can resolve against the store at query time. The
//! wrappers publish under the plain entity name (`Company`, `Deal`, ...).

use async_graphql::{Context, ID, Object, OutputType, Result, SimpleObject};
use chrono::{DateTime, Utc};
use crm_store::query::{
    ContactFilter, ContactSortFields, DealFilter, DealSortFields, OffsetPaging, Page, PageInfo,
    RecordFilter, Sort, SortField, TaskFilter, TaskSortFields, run_query,
};
use crm_store::{
    CrmStore, DealAggregate, DeletedCompany, aggregate_deals, aggregate_deals_by_month,
};
use crm_types::{
    Audit, AuditAction, AuditChanges, Company, CompanySize, Contact, ContactStage, ContactStatus,
    Deal, DealStage, Event, Task, TaskStage, User, UserRole,
};
use tokio::sync::RwLockReadGuard;

use crate::state::AppState;

/// Read guard over the store for the duration of one resolver.
pub(crate) async fn read_store<'a>(ctx: &Context<'a>) -> Result<RwLockReadGuard<'a, CrmStore>> {
    let state = ctx.data::<AppState>()?;
    Ok(state.store.read().await)
}

/// Run the list pipeline and wrap every node.
pub(crate) fn connection<'a, R, Flt, F, T>(
    records: impl IntoIterator<Item = &'a R>,
    filter: Option<&Flt>,
    sorting: Option<&[Sort<F>]>,
    paging: Option<&OffsetPaging>,
    wrap: impl Fn(R) -> T,
) -> Connection<T>
where
    R: Clone + 'a,
    Flt: RecordFilter<R>,
    F: SortField<R> + async_graphql::InputType,
    T: OutputType,
{
    let page = run_query(records, filter, sorting.unwrap_or_default(), paging);
    Connection::from(page.map(|r| wrap(r.clone())))
}

// ---------------------------------------------------------------------------
// Connections
// ---------------------------------------------------------------------------

/// A page of nodes with the total match count.
#[derive(SimpleObject)]
#[graphql(
    concrete(name = "UserConnection", params(UserNode)),
    concrete(name = "CompanyConnection", params(CompanyNode)),
    concrete(name = "ContactConnection", params(ContactNode)),
    concrete(name = "DealConnection", params(DealNode)),
    concrete(name = "DealStageConnection", params(DealStageNode)),
    concrete(name = "TaskConnection", params(TaskNode)),
    concrete(name = "TaskStageConnection", params(TaskStageNode)),
    concrete(name = "EventConnection", params(EventNode)),
    concrete(name = "AuditConnection", params(AuditNode))
)]
pub struct Connection<T: OutputType> {
    /// Nodes on this page.
    pub nodes: Vec<T>,
    /// Matches across all pages.
    pub total_count: usize,
    /// Navigation flags.
    pub page_info: PageInfo,
}

impl<T: OutputType> From<Page<T>> for Connection<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            nodes: page.nodes,
            total_count: page.total_count,
            page_info: page.page_info,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

macro_rules! aggregate_value {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("`", stringify!($name), "` wrapper around a single value.")]
            #[derive(Debug, Clone, Copy, SimpleObject)]
            pub struct $name {
                /// The aggregated value.
                pub value: $ty,
            }
        )*
    };
}

aggregate_value! {
    DealSumAggregate: f64,
    DealAvgAggregate: f64,
    DealCountAggregate: usize,
    DealMinAggregate: f64,
    DealMaxAggregate: f64,
}

/// Group key of a monthly aggregate.
#[derive(Debug, Clone, Copy, SimpleObject)]
pub struct DealGroupBy {
    /// Month, 1 through 12.
    pub close_date_month: Option<u32>,
    /// Calendar year.
    pub close_date_year: Option<i32>,
}

/// Aggregates over one group of deals.
#[derive(Debug, Clone, Copy, SimpleObject)]
pub struct DealAggregateResponse {
    /// Sum of values.
    pub sum: DealSumAggregate,
    /// Mean value.
    pub avg: DealAvgAggregate,
    /// Number of deals.
    pub count: DealCountAggregate,
    /// Smallest value.
    pub min: DealMinAggregate,
    /// Largest value.
    pub max: DealMaxAggregate,
    /// Group key, absent for ungrouped results.
    pub group_by: Option<DealGroupBy>,
}

impl From<DealAggregate> for DealAggregateResponse {
    fn from(agg: DealAggregate) -> Self {
        Self {
            sum: DealSumAggregate { value: agg.sum },
            avg: DealAvgAggregate { value: agg.avg },
            count: DealCountAggregate { value: agg.count },
            min: DealMinAggregate { value: agg.min },
            max: DealMaxAggregate { value: agg.max },
            group_by: agg.close_month.map(|m| DealGroupBy {
                close_date_month: Some(m.month),
                close_date_year: Some(m.year),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Mutation payloads
// ---------------------------------------------------------------------------

/// Result of `login`.
#[derive(SimpleObject)]
pub struct AuthResponse {
    /// Bearer token for the `Authorization` header.
    pub access_token: String,
    /// The signed-in user.
    pub user: UserNode,
}

/// Result of `deleteOneCompany` and payload of `companyDeleted`.
#[derive(Debug, Clone, SimpleObject)]
pub struct CompanyDeleteResponse {
    /// Id of the removed company.
    pub id: Option<ID>,
    /// Name of the removed company.
    pub name: Option<String>,
}

impl From<DeletedCompany> for CompanyDeleteResponse {
    fn from(deleted: DeletedCompany) -> Self {
        Self {
            id: Some(deleted.id.into()),
            name: Some(deleted.name),
        }
    }
}

// ---------------------------------------------------------------------------
// Entity nodes
// ---------------------------------------------------------------------------

/// GraphQL view of a [`User`].
#[derive(Debug, Clone)]
pub struct UserNode(pub User);

#[Object(name = "User")]
impl UserNode {
    async fn id(&self) -> ID {
        self.0.id.clone().into()
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn avatar_url(&self) -> Option<&str> {
        self.0.avatar_url.as_deref()
    }

    async fn job_title(&self) -> Option<&str> {
        self.0.job_title.as_deref()
    }

    async fn phone(&self) -> Option<&str> {
        self.0.phone.as_deref()
    }

    async fn timezone(&self) -> Option<&str> {
        self.0.timezone.as_deref()
    }

    async fn role(&self) -> UserRole {
        self.0.role
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

/// GraphQL view of a [`Company`].
#[derive(Debug, Clone)]
pub struct CompanyNode(pub Company);

#[Object(name = "Company")]
impl CompanyNode {
    async fn id(&self) -> ID {
        self.0.id.clone().into()
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn avatar_url(&self) -> Option<&str> {
        self.0.avatar_url.as_deref()
    }

    async fn business_type(&self) -> Option<&str> {
        self.0.business_type.as_deref()
    }

    async fn company_size(&self) -> Option<CompanySize> {
        self.0.company_size
    }

    async fn industry(&self) -> Option<&str> {
        self.0.industry.as_deref()
    }

    async fn total_revenue(&self) -> Option<f64> {
        self.0.total_revenue
    }

    async fn sales_owner(&self, ctx: &Context<'_>) -> Result<Option<UserNode>> {
        let store = read_store(ctx).await?;
        Ok(self
            .0
            .sales_owner_id
            .as_ref()
            .and_then(|id| store.user(id))
            .cloned()
            .map(UserNode))
    }

    /// Contacts employed by this company.
    async fn contacts(
        &self,
        ctx: &Context<'_>,
        paging: Option<OffsetPaging>,
        filter: Option<ContactFilter>,
        sorting: Option<Vec<Sort<ContactSortFields>>>,
    ) -> Result<Connection<ContactNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            store.contacts_of_company(&self.0.id),
            filter.as_ref(),
            sorting.as_deref(),
            paging.as_ref(),
            ContactNode,
        ))
    }

    /// Deals with this company.
    async fn deals(
        &self,
        ctx: &Context<'_>,
        paging: Option<OffsetPaging>,
        filter: Option<DealFilter>,
        sorting: Option<Vec<Sort<DealSortFields>>>,
    ) -> Result<Connection<DealNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            store.deals_of_company(&self.0.id),
            filter.as_ref(),
            sorting.as_deref(),
            paging.as_ref(),
            DealNode,
        ))
    }

    /// One ungrouped aggregate over this company's deals.
    async fn deals_aggregate(
        &self,
        ctx: &Context<'_>,
        filter: Option<DealFilter>,
    ) -> Result<Vec<DealAggregateResponse>> {
        let store = read_store(ctx).await?;
        let deals = store
            .deals_of_company(&self.0.id)
            .filter(|d| filter.as_ref().is_none_or(|f| f.matches(d)));
        Ok(vec![aggregate_deals(deals).into()])
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

/// GraphQL view of a [`Contact`].
#[derive(Debug, Clone)]
pub struct ContactNode(pub Contact);

#[Object(name = "Contact")]
impl ContactNode {
    async fn id(&self) -> ID {
        self.0.id.clone().into()
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn avatar_url(&self) -> Option<&str> {
        self.0.avatar_url.as_deref()
    }

    async fn job_title(&self) -> Option<&str> {
        self.0.job_title.as_deref()
    }

    async fn phone(&self) -> Option<&str> {
        self.0.phone.as_deref()
    }

    async fn stage(&self) -> ContactStage {
        self.0.stage
    }

    async fn status(&self) -> ContactStatus {
        self.0.status
    }

    async fn company(&self, ctx: &Context<'_>) -> Result<Option<CompanyNode>> {
        let store = read_store(ctx).await?;
        Ok(self
            .0
            .company_id
            .as_ref()
            .and_then(|id| store.company(id))
            .cloned()
            .map(CompanyNode))
    }

    async fn sales_owner(&self, ctx: &Context<'_>) -> Result<Option<UserNode>> {
        let store = read_store(ctx).await?;
        Ok(self
            .0
            .sales_owner_id
            .as_ref()
            .and_then(|id| store.user(id))
            .cloned()
            .map(UserNode))
    }

    /// Deals where this contact is the point of contact.
    async fn deals(
        &self,
        ctx: &Context<'_>,
        paging: Option<OffsetPaging>,
        filter: Option<DealFilter>,
        sorting: Option<Vec<Sort<DealSortFields>>>,
    ) -> Result<Connection<DealNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            store.deals_of_contact(&self.0.id),
            filter.as_ref(),
            sorting.as_deref(),
            paging.as_ref(),
            DealNode,
        ))
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

/// GraphQL view of a [`DealStage`].
#[derive(Debug, Clone)]
pub struct DealStageNode(pub DealStage);

#[Object(name = "DealStage")]
impl DealStageNode {
    async fn id(&self) -> ID {
        self.0.id.clone().into()
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    /// Deals in this stage.
    async fn deals(
        &self,
        ctx: &Context<'_>,
        paging: Option<OffsetPaging>,
        filter: Option<DealFilter>,
        sorting: Option<Vec<Sort<DealSortFields>>>,
    ) -> Result<Connection<DealNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            store.deals_in_stage(&self.0.id),
            filter.as_ref(),
            sorting.as_deref(),
            paging.as_ref(),
            DealNode,
        ))
    }

    /// This stage's deals grouped by close month, oldest first.
    async fn deals_aggregate(
        &self,
        ctx: &Context<'_>,
        filter: Option<DealFilter>,
    ) -> Result<Vec<DealAggregateResponse>> {
        let store = read_store(ctx).await?;
        let deals = store
            .deals_in_stage(&self.0.id)
            .filter(|d| filter.as_ref().is_none_or(|f| f.matches(d)));
        Ok(aggregate_deals_by_month(deals)
            .into_iter()
            .map(DealAggregateResponse::from)
            .collect())
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

/// GraphQL view of a [`Deal`].
#[derive(Debug, Clone)]
pub struct DealNode(pub Deal);

#[Object(name = "Deal")]
impl DealNode {
    async fn id(&self) -> ID {
        self.0.id.clone().into()
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn value(&self) -> f64 {
        self.0.value
    }

    async fn stage(&self, ctx: &Context<'_>) -> Result<Option<DealStageNode>> {
        let store = read_store(ctx).await?;
        Ok(self
            .0
            .stage_id
            .as_ref()
            .and_then(|id| store.deal_stage(id))
            .cloned()
            .map(DealStageNode))
    }

    async fn company(&self, ctx: &Context<'_>) -> Result<Option<CompanyNode>> {
        let store = read_store(ctx).await?;
        Ok(self
            .0
            .company_id
            .as_ref()
            .and_then(|id| store.company(id))
            .cloned()
            .map(CompanyNode))
    }

    async fn contact(&self, ctx: &Context<'_>) -> Result<Option<ContactNode>> {
        let store = read_store(ctx).await?;
        Ok(self
            .0
            .contact_id
            .as_ref()
            .and_then(|id| store.contact(id))
            .cloned()
            .map(ContactNode))
    }

    async fn sales_owner(&self, ctx: &Context<'_>) -> Result<Option<UserNode>> {
        let store = read_store(ctx).await?;
        Ok(self
            .0
            .sales_owner_id
            .as_ref()
            .and_then(|id| store.user(id))
            .cloned()
            .map(UserNode))
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

/// GraphQL view of a [`TaskStage`].
#[derive(Debug, Clone)]
pub struct TaskStageNode(pub TaskStage);

#[Object(name = "TaskStage")]
impl TaskStageNode {
    async fn id(&self) -> ID {
        self.0.id.clone().into()
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    /// Tasks in this column.
    async fn tasks(
        &self,
        ctx: &Context<'_>,
        paging: Option<OffsetPaging>,
        filter: Option<TaskFilter>,
        sorting: Option<Vec<Sort<TaskSortFields>>>,
    ) -> Result<Connection<TaskNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            store.tasks_in_stage(&self.0.id),
            filter.as_ref(),
            sorting.as_deref(),
            paging.as_ref(),
            TaskNode,
        ))
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

/// GraphQL view of a [`Task`].
#[derive(Debug, Clone)]
pub struct TaskNode(pub Task);

#[Object(name = "Task")]
impl TaskNode {
    async fn id(&self) -> ID {
        self.0.id.clone().into()
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    async fn due_date(&self) -> Option<DateTime<Utc>> {
        self.0.due_date
    }

    async fn completed(&self) -> bool {
        self.0.completed
    }

    async fn stage(&self, ctx: &Context<'_>) -> Result<Option<TaskStageNode>> {
        let store = read_store(ctx).await?;
        Ok(self
            .0
            .stage_id
            .as_ref()
            .and_then(|id| store.task_stage(id))
            .cloned()
            .map(TaskStageNode))
    }

    async fn stage_id(&self) -> Option<ID> {
        self.0.stage_id.clone().map(ID::from)
    }

    async fn assigned_to(&self, ctx: &Context<'_>) -> Result<Option<UserNode>> {
        let store = read_store(ctx).await?;
        Ok(self
            .0
            .assigned_to_id
            .as_ref()
            .and_then(|id| store.user(id))
            .cloned()
            .map(UserNode))
    }

    /// The assignee as a zero- or one-element list.
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserNode>> {
        let store = read_store(ctx).await?;
        Ok(self
            .0
            .assigned_to_id
            .as_ref()
            .and_then(|id| store.user(id))
            .cloned()
            .map(UserNode)
            .into_iter()
            .collect())
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

/// GraphQL view of an [`Event`].
#[derive(Debug, Clone)]
pub struct EventNode(pub Event);

#[Object(name = "Event")]
impl EventNode {
    async fn id(&self) -> ID {
        self.0.id.clone().into()
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn start_date(&self) -> DateTime<Utc> {
        self.0.start_date
    }

    async fn end_date(&self) -> DateTime<Utc> {
        self.0.end_date
    }

    async fn color(&self) -> &str {
        &self.0.color
    }

    async fn participants(&self, ctx: &Context<'_>) -> Result<Vec<UserNode>> {
        let store = read_store(ctx).await?;
        Ok(store
            .participants(&self.0)
            .cloned()
            .map(UserNode)
            .collect())
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

/// GraphQL view of [`AuditChanges`].
#[derive(Debug, Clone)]
pub struct AuditChangesNode(pub AuditChanges);

#[Object(name = "AuditChanges")]
impl AuditChangesNode {
    async fn field(&self) -> Option<&str> {
        self.0.field.as_deref()
    }

    async fn from(&self) -> Option<&str> {
        self.0.from.as_deref()
    }

    async fn to(&self) -> Option<&str> {
        self.0.to.as_deref()
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }
}

/// GraphQL view of an [`Audit`] entry.
#[derive(Debug, Clone)]
pub struct AuditNode(pub Audit);

#[Object(name = "Audit")]
impl AuditNode {
    async fn id(&self) -> ID {
        self.0.id.clone().into()
    }

    async fn action(&self) -> AuditAction {
        self.0.action
    }

    async fn target_entity(&self) -> &str {
        &self.0.target_entity
    }

    async fn target_id(&self) -> ID {
        ID(self.0.target_id.clone())
    }

    async fn changes(&self) -> Option<AuditChangesNode> {
        self.0.changes.clone().map(AuditChangesNode)
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<Option<UserNode>> {
        let store = read_store(ctx).await?;
        Ok(self
            .0
            .user_id
            .as_ref()
            .and_then(|id| store.user(id))
            .cloned()
            .map(UserNode))
    }

    async fn user_id(&self) -> Option<ID> {
        self.0.user_id.clone().map(ID::from)
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }
}
