//! Per-field comparison operators.
//!
//! Each comparison input holds a set of optional operators; a value
//! matches when every operator that is set holds. A missing value (a
//! `null` field on the record) fails every positive operator (`eq`,
//! `gt`, `like`, `in`, ...) and passes every negated one (`neq`,
//! `notLike`, `notIn`, ...).

use async_graphql::{ID, InputObject, InputType};
use chrono::{DateTime, Utc};
use crm_types::{AuditAction, CompanySize, ContactStage, ContactStatus, UserRole};

/// A predicate over one field value.
pub trait Comparison<V: ?Sized> {
    /// Whether `value` (or its absence) satisfies every set operator.
    fn matches(&self, value: Option<&V>) -> bool;
}

/// Operator that must hold for a present value.
fn positive<E, V: ?Sized>(expected: Option<&E>, value: Option<&V>, test: impl Fn(&E, &V) -> bool) -> bool {
    expected.is_none_or(|e| value.is_some_and(|v| test(e, v)))
}

/// Negated operator: passes for a missing value.
fn negative<E, V: ?Sized>(expected: Option<&E>, value: Option<&V>, test: impl Fn(&E, &V) -> bool) -> bool {
    expected.is_none_or(|e| value.is_none_or(|v| !test(e, v)))
}

// ---------------------------------------------------------------------------
// IDs
// ---------------------------------------------------------------------------

/// Comparison operators for `ID` fields.
#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "IDFilterComparison")]
pub struct IdFilterComparison {
    /// Equal to.
    pub eq: Option<ID>,
    /// Not equal to.
    pub neq: Option<ID>,
    /// One of.
    #[graphql(name = "in")]
    pub in_list: Option<Vec<ID>>,
    /// None of.
    pub not_in: Option<Vec<ID>>,
}

impl Comparison<str> for IdFilterComparison {
    fn matches(&self, value: Option<&str>) -> bool {
        let same = |e: &ID, v: &str| e.as_str() == v;
        let member = |list: &Vec<ID>, v: &str| list.iter().any(|e| e.as_str() == v);

        positive(self.eq.as_ref(), value, same)
            && negative(self.neq.as_ref(), value, same)
            && positive(self.in_list.as_ref(), value, member)
            && negative(self.not_in.as_ref(), value, member)
    }
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// Comparison operators for `String` fields.
#[derive(Debug, Clone, Default, InputObject)]
pub struct StringFieldComparison {
    /// Equal to.
    pub eq: Option<String>,
    /// Not equal to.
    pub neq: Option<String>,
    /// Lexicographically greater than.
    pub gt: Option<String>,
    /// Lexicographically greater than or equal to.
    pub gte: Option<String>,
    /// Lexicographically less than.
    pub lt: Option<String>,
    /// Lexicographically less than or equal to.
    pub lte: Option<String>,
    /// Case-sensitive LIKE pattern.
    pub like: Option<String>,
    /// Negated case-sensitive LIKE pattern.
    pub not_like: Option<String>,
    /// Case-insensitive LIKE pattern.
    pub i_like: Option<String>,
    /// Negated case-insensitive LIKE pattern.
    pub not_i_like: Option<String>,
    /// One of.
    #[graphql(name = "in")]
    pub in_list: Option<Vec<String>>,
    /// None of.
    pub not_in: Option<Vec<String>>,
}

impl Comparison<str> for StringFieldComparison {
    fn matches(&self, value: Option<&str>) -> bool {
        let same = |e: &String, v: &str| e == v;
        let member = |list: &Vec<String>, v: &str| list.iter().any(|e| e == v);
        let like = |p: &String, v: &str| like_match(p, v, false);
        let ilike = |p: &String, v: &str| like_match(p, v, true);

        positive(self.eq.as_ref(), value, same)
            && negative(self.neq.as_ref(), value, same)
            && positive(self.gt.as_ref(), value, |e, v| v > e.as_str())
            && positive(self.gte.as_ref(), value, |e, v| v >= e.as_str())
            && positive(self.lt.as_ref(), value, |e, v| v < e.as_str())
            && positive(self.lte.as_ref(), value, |e, v| v <= e.as_str())
            && positive(self.like.as_ref(), value, like)
            && negative(self.not_like.as_ref(), value, like)
            && positive(self.i_like.as_ref(), value, ilike)
            && negative(self.not_i_like.as_ref(), value, ilike)
            && positive(self.in_list.as_ref(), value, member)
            && negative(self.not_in.as_ref(), value, member)
    }
}

/// SQL `LIKE` matching: `%` matches any run of characters, `_` exactly one.
///
/// A pattern without wildcards matches as a substring, which is what the
/// admin UI's search boxes send.
pub fn like_match(pattern: &str, text: &str, case_insensitive: bool) -> bool {
    let (pattern, text) = if case_insensitive {
        (pattern.to_lowercase(), text.to_lowercase())
    } else {
        (pattern.to_owned(), text.to_owned())
    };

    if !pattern.contains(['%', '_']) {
        return text.contains(&pattern);
    }

    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    wildcard_match(&pattern, &text)
}

/// Greedy matcher with single-star backtracking.
fn wildcard_match(pattern: &[char], text: &[char]) -> bool {
    let mut p = 0_usize;
    let mut t = 0_usize;
    // Position of the last `%` seen and the text index it is anchored at.
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                star = Some((p, t));
                p = p.saturating_add(1);
            }
            Some(&c) if c == '_' || text.get(t) == Some(&c) => {
                p = p.saturating_add(1);
                t = t.saturating_add(1);
            }
            _ => match star {
                Some((star_p, star_t)) => {
                    let retry = star_t.saturating_add(1);
                    p = star_p.saturating_add(1);
                    t = retry;
                    star = Some((star_p, retry));
                }
                None => return false,
            },
        }
    }

    pattern
        .get(p..)
        .is_some_and(|rest| rest.iter().all(|&c| c == '%'))
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Comparison operators for `Float` fields.
#[derive(Debug, Clone, Default, InputObject)]
pub struct NumberFieldComparison {
    /// Equal to.
    pub eq: Option<f64>,
    /// Not equal to.
    pub neq: Option<f64>,
    /// Greater than.
    pub gt: Option<f64>,
    /// Greater than or equal to.
    pub gte: Option<f64>,
    /// Less than.
    pub lt: Option<f64>,
    /// Less than or equal to.
    pub lte: Option<f64>,
    /// One of.
    #[graphql(name = "in")]
    pub in_list: Option<Vec<f64>>,
    /// None of.
    pub not_in: Option<Vec<f64>>,
}

fn same_number(a: f64, b: f64) -> bool {
    a.total_cmp(&b).is_eq()
}

impl Comparison<f64> for NumberFieldComparison {
    fn matches(&self, value: Option<&f64>) -> bool {
        let same = |e: &f64, v: &f64| same_number(*e, *v);
        let member = |list: &Vec<f64>, v: &f64| list.iter().any(|e| same_number(*e, *v));

        positive(self.eq.as_ref(), value, same)
            && negative(self.neq.as_ref(), value, same)
            && positive(self.gt.as_ref(), value, |e, v| v > e)
            && positive(self.gte.as_ref(), value, |e, v| v >= e)
            && positive(self.lt.as_ref(), value, |e, v| v < e)
            && positive(self.lte.as_ref(), value, |e, v| v <= e)
            && positive(self.in_list.as_ref(), value, member)
            && negative(self.not_in.as_ref(), value, member)
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Comparison operators for `DateTime` fields.
#[derive(Debug, Clone, Default, InputObject)]
pub struct DateFieldComparison {
    /// Same instant.
    pub eq: Option<DateTime<Utc>>,
    /// Different instant.
    pub neq: Option<DateTime<Utc>>,
    /// Strictly after.
    pub gt: Option<DateTime<Utc>>,
    /// At or after.
    pub gte: Option<DateTime<Utc>>,
    /// Strictly before.
    pub lt: Option<DateTime<Utc>>,
    /// At or before.
    pub lte: Option<DateTime<Utc>>,
    /// One of.
    #[graphql(name = "in")]
    pub in_list: Option<Vec<DateTime<Utc>>>,
    /// None of.
    pub not_in: Option<Vec<DateTime<Utc>>>,
}

impl Comparison<DateTime<Utc>> for DateFieldComparison {
    fn matches(&self, value: Option<&DateTime<Utc>>) -> bool {
        let same = |e: &DateTime<Utc>, v: &DateTime<Utc>| e == v;
        let member = |list: &Vec<DateTime<Utc>>, v: &DateTime<Utc>| list.contains(v);

        positive(self.eq.as_ref(), value, same)
            && negative(self.neq.as_ref(), value, same)
            && positive(self.gt.as_ref(), value, |e, v| v > e)
            && positive(self.gte.as_ref(), value, |e, v| v >= e)
            && positive(self.lt.as_ref(), value, |e, v| v < e)
            && positive(self.lte.as_ref(), value, |e, v| v <= e)
            && positive(self.in_list.as_ref(), value, member)
            && negative(self.not_in.as_ref(), value, member)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Comparison operators for enum fields.
#[derive(Debug, Clone, InputObject)]
#[graphql(
    concrete(name = "UserRoleFilterComparison", params(UserRole)),
    concrete(name = "CompanySizeFilterComparison", params(CompanySize)),
    concrete(name = "ContactStageFilterComparison", params(ContactStage)),
    concrete(name = "ContactStatusFilterComparison", params(ContactStatus)),
    concrete(name = "AuditActionFilterComparison", params(AuditAction))
)]
pub struct EnumFieldComparison<T: InputType> {
    /// Equal to.
    pub eq: Option<T>,
    /// Not equal to.
    pub neq: Option<T>,
    /// One of.
    #[graphql(name = "in")]
    pub in_list: Option<Vec<T>>,
    /// None of.
    pub not_in: Option<Vec<T>>,
}

impl<T: InputType> Default for EnumFieldComparison<T> {
    fn default() -> Self {
        Self {
            eq: None,
            neq: None,
            in_list: None,
            not_in: None,
        }
    }
}

impl<T: InputType + PartialEq> Comparison<T> for EnumFieldComparison<T> {
    fn matches(&self, value: Option<&T>) -> bool {
        let same = |e: &T, v: &T| e == v;
        let member = |list: &Vec<T>, v: &T| list.contains(v);

        positive(self.eq.as_ref(), value, same)
            && negative(self.neq.as_ref(), value, same)
            && positive(self.in_list.as_ref(), value, member)
            && negative(self.not_in.as_ref(), value, member)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn like_without_wildcards_is_substring() {
        assert!(like_match("Corp", "Acme Corporation", false));
        assert!(!like_match("corp", "Acme Corporation", false));
        assert!(like_match("corp", "Acme Corporation", true));
    }

    #[test]
    fn like_wildcards_anchor_the_pattern() {
        assert!(like_match("Acme%", "Acme Corporation", false));
        assert!(!like_match("Corp%", "Acme Corporation", false));
        assert!(like_match("%ation", "Acme Corporation", false));
        assert!(like_match("A_me%", "Acme Corporation", false));
        assert!(like_match("%", "", false));
        assert!(like_match("%c%r%", "Acme Corporation", true));
        assert!(!like_match("A_me", "Acme Corporation", false));
    }

    #[test]
    fn string_operators_combine_as_conjunction() {
        let cmp = StringFieldComparison {
            i_like: Some(String::from("%tech%")),
            neq: Some(String::from("TechStart Inc")),
            ..Default::default()
        };
        assert!(cmp.matches(Some("Fintech Labs")));
        assert!(!cmp.matches(Some("TechStart Inc")));
        assert!(!cmp.matches(Some("Acme")));
    }

    #[test]
    fn missing_value_fails_positive_and_passes_negative() {
        let positive = StringFieldComparison {
            eq: Some(String::from("x")),
            ..Default::default()
        };
        let negative = StringFieldComparison {
            neq: Some(String::from("x")),
            not_like: Some(String::from("x")),
            ..Default::default()
        };
        assert!(!positive.matches(None));
        assert!(negative.matches(None));
        assert!(StringFieldComparison::default().matches(None));
    }

    #[test]
    fn string_range_is_lexicographic() {
        let cmp = StringFieldComparison {
            gte: Some(String::from("b")),
            lt: Some(String::from("d")),
            ..Default::default()
        };
        assert!(cmp.matches(Some("b")));
        assert!(cmp.matches(Some("cz")));
        assert!(!cmp.matches(Some("d")));
        assert!(!cmp.matches(Some("a")));
    }

    #[test]
    fn id_in_and_not_in() {
        let cmp = IdFilterComparison {
            in_list: Some(vec![ID::from("1"), ID::from("2")]),
            not_in: Some(vec![ID::from("2")]),
            ..Default::default()
        };
        assert!(cmp.matches(Some("1")));
        assert!(!cmp.matches(Some("2")));
        assert!(!cmp.matches(Some("3")));
        assert!(!cmp.matches(None));
    }

    #[test]
    fn number_bounds() {
        let cmp = NumberFieldComparison {
            gt: Some(100.0),
            lte: Some(500.0),
            ..Default::default()
        };
        assert!(cmp.matches(Some(&500.0)));
        assert!(!cmp.matches(Some(&100.0)));
        assert!(!cmp.matches(Some(&500.5)));

        let exact = NumberFieldComparison {
            in_list: Some(vec![25_000.0, 150_000.0]),
            ..Default::default()
        };
        assert!(exact.matches(Some(&25_000.0)));
        assert!(!exact.matches(Some(&30_000.0)));
    }

    #[test]
    fn date_range() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap();
        let cmp = DateFieldComparison {
            gte: Some(start),
            lte: Some(end),
            ..Default::default()
        };
        let inside = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        assert!(cmp.matches(Some(&start)));
        assert!(cmp.matches(Some(&inside)));
        assert!(!cmp.matches(Some(&before)));
        assert!(!cmp.matches(None));
    }

    #[test]
    fn enum_membership() {
        let cmp = EnumFieldComparison {
            in_list: Some(vec![UserRole::Admin, UserRole::Manager]),
            ..Default::default()
        };
        assert!(cmp.matches(Some(&UserRole::Manager)));
        assert!(!cmp.matches(Some(&UserRole::SalesPerson)));

        let neq = EnumFieldComparison {
            neq: Some(CompanySize::Small),
            ..Default::default()
        };
        assert!(neq.matches(Some(&CompanySize::Large)));
        assert!(!neq.matches(Some(&CompanySize::Small)));
        assert!(neq.matches(None));
    }
}
