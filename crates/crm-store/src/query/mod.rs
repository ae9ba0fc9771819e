//! The filter -> sort -> page pipeline over in-memory collections.
//!
//! Every list resolver, top-level or nested, runs the same three steps:
//!
//! 1. keep the records the [`RecordFilter`] accepts,
//! 2. stable-sort them by the requested [`Sort`] keys,
//! 3. slice out one page with [`paginate`].
//!
//! `totalCount` is the filtered count before slicing.

pub mod comparison;
pub mod filter;
pub mod paging;
pub mod sort;

pub use comparison::{
    Comparison, DateFieldComparison, EnumFieldComparison, IdFilterComparison,
    NumberFieldComparison, StringFieldComparison, like_match,
};
pub use filter::{
    AuditFilter, CompanyFilter, ContactFilter, DealFilter, DealStageFilter, EventFilter,
    RecordFilter, TaskFilter, TaskStageFilter, UserFilter,
};
pub use paging::{DEFAULT_PAGE_LIMIT, OffsetPaging, Page, PageInfo, paginate};
pub use sort::{
    AuditSortFields, CompanySortFields, ContactSortFields, DealSortFields, DealStageSortFields,
    EventSortFields, Sort, SortDirection, SortField, SortValue, TaskSortFields,
    TaskStageSortFields, UserSortFields, apply_sorting, compare_ids,
};

use async_graphql::InputType;

/// Run the full pipeline over `records`.
///
/// A `None` filter matches everything, an empty `sorting` keeps the
/// collection order, and `None` paging means the first 10 records.
pub fn run_query<'a, R, Flt, F>(
    records: impl IntoIterator<Item = &'a R>,
    filter: Option<&Flt>,
    sorting: &[Sort<F>],
    paging: Option<&OffsetPaging>,
) -> Page<&'a R>
where
    R: 'a,
    Flt: RecordFilter<R>,
    F: SortField<R> + InputType,
{
    let mut matched: Vec<&'a R> = records
        .into_iter()
        .filter(|record| filter.is_none_or(|f| f.matches(record)))
        .collect();

    apply_sorting(&mut matched, sorting);
    paginate(matched, paging)
}
