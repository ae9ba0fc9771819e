//! In-memory state and query engine for the CRM demo server.
//!
//! # Modules
//!
//! - [`fixture`] -- Reading and writing `demo-data.json`
//! - [`store`] -- The [`CrmStore`] collections, relations, and mutations
//! - [`query`] -- Filter, sort, and offset paging shared by every list field
//! - [`aggregate`] -- Deal value sums, averages, and monthly grouping
//! - [`session`] -- Bearer token sessions
//! - [`input`] -- GraphQL input objects for mutations
//! - [`error`] -- [`StoreError`] and [`FixtureError`]

pub mod aggregate;
pub mod error;
pub mod fixture;
pub mod input;
pub mod query;
pub mod session;
pub mod store;

pub use aggregate::{CloseMonth, DealAggregate, aggregate_deals, aggregate_deals_by_month};
pub use error::{FixtureError, StoreError};
pub use fixture::{Fixture, default_audits};
pub use input::{
    CompanyCreateInput, CompanyUpdateInput, CreateOneCompanyInput, DeleteOneCompanyInput,
    LoginInput, UpdateOneCompanyInput,
};
pub use session::SessionStore;
pub use store::{CollectionCounts, CrmStore, DeletedCompany, LoginOutcome, Record, find, next_id};
