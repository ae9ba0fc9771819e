//! Mutation inputs.
//!
//! Update inputs use [`MaybeUndefined`] for nullable fields so a client
//! can tell "leave as is" (field omitted) apart from "clear" (explicit
//! `null`).

use async_graphql::{ID, InputObject, MaybeUndefined};
use crm_types::CompanySize;

/// Sign-in credentials.
#[derive(Debug, Clone, InputObject)]
pub struct LoginInput {
    /// Email of an existing user.
    pub email: String,
    /// Any non-empty password is accepted.
    pub password: String,
}

/// Fields of a new company.
#[derive(Debug, Clone, Default, InputObject)]
pub struct CompanyCreateInput {
    /// Company name.
    pub name: String,
    /// Logo URL.
    pub avatar_url: Option<String>,
    /// Business model.
    pub business_type: Option<String>,
    /// Head-count bucket.
    pub company_size: Option<CompanySize>,
    /// Industry label.
    pub industry: Option<String>,
    /// Annual revenue.
    pub total_revenue: Option<f64>,
    /// Owning sales user.
    pub sales_owner_id: Option<ID>,
}

/// Wrapper input of `createOneCompany`.
#[derive(Debug, Clone, InputObject)]
pub struct CreateOneCompanyInput {
    /// The company to create.
    pub company: CompanyCreateInput,
}

/// Partial update of a company. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, InputObject)]
pub struct CompanyUpdateInput {
    /// New name. `null` is treated as omitted because the name is required.
    pub name: Option<String>,
    /// New logo URL.
    pub avatar_url: MaybeUndefined<String>,
    /// New business model.
    pub business_type: MaybeUndefined<String>,
    /// New head-count bucket.
    pub company_size: MaybeUndefined<CompanySize>,
    /// New industry label.
    pub industry: MaybeUndefined<String>,
    /// New annual revenue.
    pub total_revenue: MaybeUndefined<f64>,
    /// New owning sales user.
    pub sales_owner_id: MaybeUndefined<ID>,
}

/// Wrapper input of `updateOneCompany`.
#[derive(Debug, Clone, InputObject)]
pub struct UpdateOneCompanyInput {
    /// Company to update.
    pub id: ID,
    /// Fields to change.
    pub update: CompanyUpdateInput,
}

/// Wrapper input of `deleteOneCompany`.
#[derive(Debug, Clone, InputObject)]
pub struct DeleteOneCompanyInput {
    /// Company to delete.
    pub id: ID,
}
