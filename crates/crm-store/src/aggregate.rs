//! Deal value aggregation for the pipeline dashboards.

use std::collections::BTreeMap;

use chrono::Datelike;
use crm_types::Deal;

/// Calendar month a deal was closed in, by its `createdAt` (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CloseMonth {
    /// Calendar year.
    pub year: i32,
    /// Month, 1 through 12.
    pub month: u32,
}

/// `sum`, `avg`, `count`, `min`, `max` over deal values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DealAggregate {
    /// Sum of values.
    pub sum: f64,
    /// Mean value, 0 for an empty group.
    pub avg: f64,
    /// Number of deals.
    pub count: usize,
    /// Smallest value, 0 for an empty group.
    pub min: f64,
    /// Largest value, 0 for an empty group.
    pub max: f64,
    /// The month this group covers, when grouped.
    pub close_month: Option<CloseMonth>,
}

impl DealAggregate {
    fn from_values(values: &[f64], close_month: Option<CloseMonth>) -> Self {
        let count = values.len();
        let sum: f64 = values.iter().sum();
        let (min, max) = if values.is_empty() {
            (0.0, 0.0)
        } else {
            values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };
        #[allow(clippy::cast_precision_loss)]
        let avg = if count == 0 { 0.0 } else { sum / count as f64 };

        Self {
            sum,
            avg,
            count,
            min,
            max,
            close_month,
        }
    }
}

/// Aggregate all `deals` into a single ungrouped result.
pub fn aggregate_deals<'a>(deals: impl IntoIterator<Item = &'a Deal>) -> DealAggregate {
    let values: Vec<f64> = deals.into_iter().map(|d| d.value).collect();
    DealAggregate::from_values(&values, None)
}

/// Aggregate `deals` per close month, oldest month first.
///
/// Returns an empty list when there are no deals.
pub fn aggregate_deals_by_month<'a>(
    deals: impl IntoIterator<Item = &'a Deal>,
) -> Vec<DealAggregate> {
    let mut groups: BTreeMap<CloseMonth, Vec<f64>> = BTreeMap::new();
    for deal in deals {
        let key = CloseMonth {
            year: deal.created_at.year(),
            month: deal.created_at.month(),
        };
        groups.entry(key).or_default().push(deal.value);
    }

    groups
        .into_iter()
        .map(|(month, values)| DealAggregate::from_values(&values, Some(month)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use crm_types::DealId;

    use super::*;

    fn deal(id: &str, value: f64, year: i32, month: u32) -> Deal {
        let at = Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap();
        Deal {
            id: DealId::from(id),
            title: format!("Deal {id}"),
            value,
            stage_id: None,
            company_id: None,
            contact_id: None,
            sales_owner_id: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn empty_aggregate_is_all_zero() {
        let none: [Deal; 0] = [];
        let agg = aggregate_deals(&none);
        assert_eq!(agg.count, 0);
        assert!(agg.sum.abs() < f64::EPSILON);
        assert!(agg.avg.abs() < f64::EPSILON);
        assert!(agg.min.abs() < f64::EPSILON);
        assert!(agg.max.abs() < f64::EPSILON);
    }

    #[test]
    fn aggregate_over_values() {
        let deals = [deal("1", 150_000.0, 2024, 1), deal("2", 25_000.0, 2024, 2)];
        let agg = aggregate_deals(&deals);
        assert_eq!(agg.count, 2);
        assert!((agg.sum - 175_000.0).abs() < f64::EPSILON);
        assert!((agg.avg - 87_500.0).abs() < f64::EPSILON);
        assert!((agg.min - 25_000.0).abs() < f64::EPSILON);
        assert!((agg.max - 150_000.0).abs() < f64::EPSILON);
        assert!(agg.close_month.is_none());
    }

    #[test]
    fn groups_by_month_in_chronological_order() {
        let deals = [
            deal("1", 10.0, 2024, 3),
            deal("2", 30.0, 2023, 12),
            deal("3", 20.0, 2024, 3),
        ];
        let groups = aggregate_deals_by_month(&deals);
        assert_eq!(groups.len(), 2);

        let first = groups.first().unwrap();
        assert_eq!(
            first.close_month,
            Some(CloseMonth {
                year: 2023,
                month: 12
            })
        );
        assert_eq!(first.count, 1);

        let second = groups.get(1).unwrap();
        assert_eq!(
            second.close_month,
            Some(CloseMonth {
                year: 2024,
                month: 3
            })
        );
        assert_eq!(second.count, 2);
        assert!((second.sum - 30.0).abs() < f64::EPSILON);
        assert!((second.avg - 15.0).abs() < f64::EPSILON);
        assert!((second.min - 10.0).abs() < f64::EPSILON);
        assert!((second.max - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn no_deals_no_groups() {
        let none: [Deal; 0] = [];
        assert!(aggregate_deals_by_month(&none).is_empty());
    }
}
