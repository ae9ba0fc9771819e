//! Root `Mutation` type: sign-in and company CRUD.
//!
//! Each mutation holds the store's write guard only for the state change;
//! the subscription event is published after the guard is dropped.

use async_graphql::{Context, ErrorExtensions, Object, Result};
use chrono::Utc;
use crm_store::{CreateOneCompanyInput, DeleteOneCompanyInput, LoginInput, UpdateOneCompanyInput};
use crm_types::{CompanyId, UserId};

use super::SessionToken;
use super::objects::{AuthResponse, CompanyDeleteResponse, CompanyNode, UserNode};
use crate::state::{AppState, CompanyEvent};

/// State-changing entry points.
#[derive(Debug, Default)]
pub struct MutationRoot;

fn session_token<'a>(ctx: &Context<'a>) -> Option<&'a str> {
    ctx.data_opt::<SessionToken>().map(|t| t.0.as_str())
}

#[Object]
impl MutationRoot {
    /// Sign in by email. Any non-empty password is accepted.
    async fn login(&self, ctx: &Context<'_>, input: LoginInput) -> Result<AuthResponse> {
        let state = ctx.data::<AppState>()?;
        let outcome = state
            .store
            .write()
            .await
            .login(&input, Utc::now())
            .map_err(|e| e.extend())?;
        Ok(AuthResponse {
            access_token: outcome.token,
            user: UserNode(outcome.user),
        })
    }

    /// End the caller's session. Returns whether one was active.
    async fn logout(&self, ctx: &Context<'_>) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let Some(token) = session_token(ctx) else {
            return Ok(false);
        };
        Ok(state.store.write().await.logout(token, Utc::now()))
    }

    async fn create_one_company(
        &self,
        ctx: &Context<'_>,
        input: CreateOneCompanyInput,
    ) -> Result<CompanyNode> {
        let state = ctx.data::<AppState>()?;
        let company = {
            let mut store = state.store.write().await;
            let actor = acting_user(&store, ctx);
            store
                .create_company(input.company, actor.as_ref(), Utc::now())
                .map_err(|e| e.extend())?
        };
        state.publish(CompanyEvent::Created(company.clone()));
        Ok(CompanyNode(company))
    }

    async fn update_one_company(
        &self,
        ctx: &Context<'_>,
        input: UpdateOneCompanyInput,
    ) -> Result<CompanyNode> {
        let state = ctx.data::<AppState>()?;
        let company = {
            let mut store = state.store.write().await;
            let actor = acting_user(&store, ctx);
            store
                .update_company(
                    &CompanyId::from(input.id),
                    input.update,
                    actor.as_ref(),
                    Utc::now(),
                )
                .map_err(|e| e.extend())?
        };
        state.publish(CompanyEvent::Updated(company.clone()));
        Ok(CompanyNode(company))
    }

    async fn delete_one_company(
        &self,
        ctx: &Context<'_>,
        input: DeleteOneCompanyInput,
    ) -> Result<CompanyDeleteResponse> {
        let state = ctx.data::<AppState>()?;
        let deleted = {
            let mut store = state.store.write().await;
            let actor = acting_user(&store, ctx);
            store
                .delete_company(&CompanyId::from(input.id), actor.as_ref(), Utc::now())
                .map_err(|e| e.extend())?
        };
        state.publish(CompanyEvent::Deleted(deleted.clone()));
        Ok(CompanyDeleteResponse::from(deleted))
    }
}

/// The signed-in user making the request, for the audit trail.
fn acting_user(store: &crm_store::CrmStore, ctx: &Context<'_>) -> Option<UserId> {
    session_token(ctx)
        .and_then(|token| store.session_user(token))
        .map(|user| user.id.clone())
}
