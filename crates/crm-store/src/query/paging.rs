//! Offset pagination.

use async_graphql::{InputObject, SimpleObject};

/// Page size used when the client sends no (or a non-positive) limit.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Offset/limit paging input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, InputObject)]
pub struct OffsetPaging {
    /// Maximum number of nodes to return. Defaults to 10.
    pub limit: Option<i32>,
    /// Number of nodes to skip. Defaults to 0.
    pub offset: Option<i32>,
}

impl OffsetPaging {
    /// Build paging from a limit and offset.
    pub const fn new(limit: i32, offset: i32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Effective page size.
    pub fn limit(&self) -> usize {
        self.limit
            .and_then(|l| usize::try_from(l).ok())
            .filter(|&l| l > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    /// Effective offset; negative offsets clamp to zero.
    pub fn offset(&self) -> usize {
        self.offset
            .and_then(|o| usize::try_from(o).ok())
            .unwrap_or(0)
    }
}

/// Navigation flags of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SimpleObject)]
#[graphql(name = "OffsetPageInfo")]
pub struct PageInfo {
    /// More nodes exist after this page.
    pub has_next_page: bool,
    /// Nodes exist before this page.
    pub has_previous_page: bool,
}

/// One page of a filtered, sorted collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The nodes on this page.
    pub nodes: Vec<T>,
    /// Number of records that matched the filter, across all pages.
    pub total_count: usize,
    /// Navigation flags.
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    /// Transform every node, keeping counts and flags.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            nodes: self.nodes.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_info: self.page_info,
        }
    }
}

/// Slice `items` according to `paging` and compute the page flags.
///
/// `hasNextPage` is `offset + limit < totalCount` and `hasPreviousPage`
/// is `offset > 0`, independent of how many nodes the slice holds.
pub fn paginate<T>(items: Vec<T>, paging: Option<&OffsetPaging>) -> Page<T> {
    let paging = paging.copied().unwrap_or_default();
    let limit = paging.limit();
    let offset = paging.offset();
    let total_count = items.len();

    let nodes: Vec<T> = items.into_iter().skip(offset).take(limit).collect();

    Page {
        nodes,
        total_count,
        page_info: PageInfo {
            has_next_page: offset.saturating_add(limit) < total_count,
            has_previous_page: offset > 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn defaults_to_first_ten() {
        let page = paginate(numbers(25), None);
        assert_eq!(page.nodes, numbers(10));
        assert_eq!(page.total_count, 25);
        assert!(page.page_info.has_next_page);
        assert!(!page.page_info.has_previous_page);
    }

    #[test]
    fn middle_page_has_both_neighbours() {
        let page = paginate(numbers(25), Some(&OffsetPaging::new(10, 10)));
        assert_eq!(page.nodes, (10..20).collect::<Vec<_>>());
        assert!(page.page_info.has_next_page);
        assert!(page.page_info.has_previous_page);
    }

    #[test]
    fn exact_last_page_has_no_next() {
        let page = paginate(numbers(20), Some(&OffsetPaging::new(10, 10)));
        assert_eq!(page.nodes.len(), 10);
        assert!(!page.page_info.has_next_page);
    }

    #[test]
    fn offset_past_end_keeps_total() {
        let page = paginate(numbers(5), Some(&OffsetPaging::new(10, 50)));
        assert!(page.nodes.is_empty());
        assert_eq!(page.total_count, 5);
        assert!(!page.page_info.has_next_page);
        assert!(page.page_info.has_previous_page);
    }

    #[test]
    fn non_positive_limit_and_negative_offset_fall_back() {
        let paging = OffsetPaging::new(0, -3);
        assert_eq!(paging.limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(paging.offset(), 0);

        let negative = OffsetPaging {
            limit: Some(-1),
            offset: None,
        };
        assert_eq!(negative.limit(), DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn limit_one_reports_total_for_dashboard_counts() {
        let page = paginate(numbers(42), Some(&OffsetPaging::new(1, 0)));
        assert_eq!(page.nodes, vec![0]);
        assert_eq!(page.total_count, 42);
    }
}
