//! Root `Query` type.
//!
//! Every collection gets a list field (`users`, `companies`, ...) that
//! runs filter, sort, and paging, plus a single-record lookup by id.

use async_graphql::{Context, ID, Object, Result};
use crm_store::query::{
    AuditFilter, AuditSortFields, CompanyFilter, CompanySortFields, ContactFilter,
    ContactSortFields, DealFilter, DealSortFields, DealStageFilter, DealStageSortFields,
    EventFilter, EventSortFields, OffsetPaging, Sort, TaskFilter, TaskSortFields,
    TaskStageFilter, TaskStageSortFields, UserFilter, UserSortFields,
};
use crm_types::{
    AuditId, CompanyId, ContactId, DealId, DealStageId, EventId, TaskId, TaskStageId, UserId,
};

use super::SessionToken;
use super::objects::{
    AuditNode, CompanyNode, Connection, ContactNode, DealNode, DealStageNode, EventNode,
    TaskNode, TaskStageNode, UserNode, connection, read_store,
};

/// Read-only entry points.
#[derive(Debug, Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The user behind the request's bearer token, if any.
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<UserNode>> {
        let Some(SessionToken(token)) = ctx.data_opt::<SessionToken>() else {
            return Ok(None);
        };
        let store = read_store(ctx).await?;
        Ok(store.session_user(token).cloned().map(UserNode))
    }

    async fn users(
        &self,
        ctx: &Context<'_>,
        filter: UserFilter,
        sorting: Option<Vec<Sort<UserSortFields>>>,
        paging: Option<OffsetPaging>,
    ) -> Result<Connection<UserNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            &store.users,
            Some(&filter),
            sorting.as_deref(),
            paging.as_ref(),
            UserNode,
        ))
    }

    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<UserNode>> {
        let store = read_store(ctx).await?;
        Ok(store.user(&UserId::from(id)).cloned().map(UserNode))
    }

    async fn companies(
        &self,
        ctx: &Context<'_>,
        filter: CompanyFilter,
        sorting: Option<Vec<Sort<CompanySortFields>>>,
        paging: Option<OffsetPaging>,
    ) -> Result<Connection<CompanyNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            &store.companies,
            Some(&filter),
            sorting.as_deref(),
            paging.as_ref(),
            CompanyNode,
        ))
    }

    async fn company(&self, ctx: &Context<'_>, id: ID) -> Result<Option<CompanyNode>> {
        let store = read_store(ctx).await?;
        Ok(store.company(&CompanyId::from(id)).cloned().map(CompanyNode))
    }

    async fn contacts(
        &self,
        ctx: &Context<'_>,
        filter: ContactFilter,
        sorting: Option<Vec<Sort<ContactSortFields>>>,
        paging: Option<OffsetPaging>,
    ) -> Result<Connection<ContactNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            &store.contacts,
            Some(&filter),
            sorting.as_deref(),
            paging.as_ref(),
            ContactNode,
        ))
    }

    async fn contact(&self, ctx: &Context<'_>, id: ID) -> Result<Option<ContactNode>> {
        let store = read_store(ctx).await?;
        Ok(store.contact(&ContactId::from(id)).cloned().map(ContactNode))
    }

    async fn deals(
        &self,
        ctx: &Context<'_>,
        filter: DealFilter,
        sorting: Option<Vec<Sort<DealSortFields>>>,
        paging: Option<OffsetPaging>,
    ) -> Result<Connection<DealNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            &store.deals,
            Some(&filter),
            sorting.as_deref(),
            paging.as_ref(),
            DealNode,
        ))
    }

    async fn deal(&self, ctx: &Context<'_>, id: ID) -> Result<Option<DealNode>> {
        let store = read_store(ctx).await?;
        Ok(store.deal(&DealId::from(id)).cloned().map(DealNode))
    }

    async fn deal_stages(
        &self,
        ctx: &Context<'_>,
        filter: DealStageFilter,
        sorting: Option<Vec<Sort<DealStageSortFields>>>,
        paging: Option<OffsetPaging>,
    ) -> Result<Connection<DealStageNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            &store.deal_stages,
            Some(&filter),
            sorting.as_deref(),
            paging.as_ref(),
            DealStageNode,
        ))
    }

    async fn deal_stage(&self, ctx: &Context<'_>, id: ID) -> Result<Option<DealStageNode>> {
        let store = read_store(ctx).await?;
        Ok(store
            .deal_stage(&DealStageId::from(id))
            .cloned()
            .map(DealStageNode))
    }

    async fn tasks(
        &self,
        ctx: &Context<'_>,
        filter: TaskFilter,
        sorting: Option<Vec<Sort<TaskSortFields>>>,
        paging: Option<OffsetPaging>,
    ) -> Result<Connection<TaskNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            &store.tasks,
            Some(&filter),
            sorting.as_deref(),
            paging.as_ref(),
            TaskNode,
        ))
    }

    async fn task(&self, ctx: &Context<'_>, id: ID) -> Result<Option<TaskNode>> {
        let store = read_store(ctx).await?;
        Ok(store.task(&TaskId::from(id)).cloned().map(TaskNode))
    }

    async fn task_stages(
        &self,
        ctx: &Context<'_>,
        filter: TaskStageFilter,
        sorting: Option<Vec<Sort<TaskStageSortFields>>>,
        paging: Option<OffsetPaging>,
    ) -> Result<Connection<TaskStageNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            &store.task_stages,
            Some(&filter),
            sorting.as_deref(),
            paging.as_ref(),
            TaskStageNode,
        ))
    }

    async fn task_stage(&self, ctx: &Context<'_>, id: ID) -> Result<Option<TaskStageNode>> {
        let store = read_store(ctx).await?;
        Ok(store
            .task_stage(&TaskStageId::from(id))
            .cloned()
            .map(TaskStageNode))
    }

    async fn events(
        &self,
        ctx: &Context<'_>,
        filter: EventFilter,
        sorting: Option<Vec<Sort<EventSortFields>>>,
        paging: Option<OffsetPaging>,
    ) -> Result<Connection<EventNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            &store.events,
            Some(&filter),
            sorting.as_deref(),
            paging.as_ref(),
            EventNode,
        ))
    }

    async fn event(&self, ctx: &Context<'_>, id: ID) -> Result<Option<EventNode>> {
        let store = read_store(ctx).await?;
        Ok(store.event(&EventId::from(id)).cloned().map(EventNode))
    }

    /// Activity log entries.
    async fn audits(
        &self,
        ctx: &Context<'_>,
        filter: AuditFilter,
        sorting: Option<Vec<Sort<AuditSortFields>>>,
        paging: Option<OffsetPaging>,
    ) -> Result<Connection<AuditNode>> {
        let store = read_store(ctx).await?;
        Ok(connection(
            &store.audits,
            Some(&filter),
            sorting.as_deref(),
            paging.as_ref(),
            AuditNode,
        ))
    }

    async fn audit(&self, ctx: &Context<'_>, id: ID) -> Result<Option<AuditNode>> {
        let store = read_store(ctx).await?;
        Ok(store.audit(&AuditId::from(id)).cloned().map(AuditNode))
    }
}
