//! Filter criteria model and normalization.
//!
//! Raw, possibly-malformed multi-select input is normalized into a
//! [`FilterCriteria`]: per-facet value sets plus optional created/updated
//! date bounds. Normalization is total — every malformed atom degrades to
//! "absent" and nothing here can fail a request.

use crate::model::{IssueRecord, ValueId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Raw parameter value for the null sentinel ("unassigned"/"none").
const NONE_TOKEN: &str = "none";

/// Date format accepted for the four date bound parameters.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One filterable dimension of an issue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Tracker,
    Priority,
    AssignedTo,
    Category,
    FixedVersion,
    Author,
    Subproject,
}

impl Facet {
    /// The fixed facet set, in display order.
    pub const ALL: [Facet; 7] = [
        Facet::Tracker,
        Facet::Priority,
        Facet::AssignedTo,
        Facet::Category,
        Facet::FixedVersion,
        Facet::Author,
        Facet::Subproject,
    ];

    /// Request parameter key for this facet.
    pub fn key(self) -> &'static str {
        match self {
            Facet::Tracker => "tracker_id",
            Facet::Priority => "priority_id",
            Facet::AssignedTo => "assigned_to_id",
            Facet::Category => "category_id",
            Facet::FixedVersion => "fixed_version_id",
            Facet::Author => "author_id",
            Facet::Subproject => "subproject_id",
        }
    }

    /// Whether the underlying issue field can be NULL. Nullable facets get
    /// an "unassigned" candidate bucket in the report.
    pub fn nullable(self) -> bool {
        matches!(
            self,
            Facet::AssignedTo | Facet::Category | Facet::FixedVersion
        )
    }
}

/// A raw request parameter: a single string or a sequence of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    One(String),
    Many(Vec<String>),
}

/// Untyped filter input, keyed by facet parameter name and the four date
/// keys (`created_on_from`, `created_on_to`, `updated_on_from`,
/// `updated_on_to`). Covers both live form submissions and the saved-filter
/// JSON blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFilterParams(pub HashMap<String, RawValue>);

impl RawFilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a multi-value parameter.
    pub fn set_many(&mut self, key: &str, values: Vec<String>) -> &mut Self {
        self.0.insert(key.to_string(), RawValue::Many(values));
        self
    }

    /// Set a single-value parameter.
    pub fn set_one(&mut self, key: &str, value: &str) -> &mut Self {
        self.0
            .insert(key.to_string(), RawValue::One(value.to_string()));
        self
    }

    /// All values for a key, coerced to a sequence.
    fn values(&self, key: &str) -> &[String] {
        match self.0.get(key) {
            Some(RawValue::One(v)) => std::slice::from_ref(v),
            Some(RawValue::Many(vs)) => vs.as_slice(),
            None => &[],
        }
    }

    /// The single value for a key; multi-valued date parameters are ignored
    /// rather than guessed at.
    fn single(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(RawValue::One(v)) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// Inclusive calendar-date bounds applied to a timestamp field.
///
/// `to` covers the whole end day: a timestamp at `to 23:59:59` is inside the
/// bound, one at `to + 1 day 00:00:00` is not. Stores that push the bounds
/// into SQL should anchor `from` at 00:00:00 and `to` at 23:59:59.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateBounds {
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        let day = ts.date_naive();
        if let Some(from) = self.from {
            if day < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if day > to {
                return false;
            }
        }
        true
    }
}

/// Normalized filter criteria: active facet selections plus date bounds.
///
/// Invariant: `selections` never contains an empty value set — an inactive
/// facet is simply absent and can never produce an always-false condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub selections: BTreeMap<Facet, BTreeSet<Option<ValueId>>>,
    pub created: DateBounds,
    pub updated: DateBounds,
}

impl FilterCriteria {
    /// True when no facet and no date bound is active.
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
            && self.created.is_unbounded()
            && self.updated.is_unbounded()
    }

    /// Selected values for a facet, if it is active.
    pub fn selection(&self, facet: Facet) -> Option<&BTreeSet<Option<ValueId>>> {
        self.selections.get(&facet)
    }

    /// The cross-filter for `facet`: every other active facet and both date
    /// bounds retained, `facet`'s own selection removed. Date bounds are not
    /// part of the facet set and are never removed here.
    pub fn without(&self, facet: Facet) -> FilterCriteria {
        let mut cross = self.clone();
        cross.selections.remove(&facet);
        cross
    }

    /// Whether an issue satisfies every active facet selection and both
    /// date bounds.
    pub fn matches(&self, issue: &IssueRecord) -> bool {
        for (facet, values) in &self.selections {
            if !values.contains(&issue.facet_value(*facet)) {
                return false;
            }
        }
        self.created.contains(issue.created_on) && self.updated.contains(issue.updated_on)
    }

    /// Serialize back to the raw parameter shape, the inverse of
    /// [`normalize`] up to normalization: `normalize(&c.to_raw()) == c` for
    /// any `c` produced by `normalize`.
    pub fn to_raw(&self) -> RawFilterParams {
        let mut raw = RawFilterParams::new();
        for (facet, values) in &self.selections {
            let entries = values
                .iter()
                .map(|v| match v {
                    Some(id) => id.to_string(),
                    None => NONE_TOKEN.to_string(),
                })
                .collect();
            raw.set_many(facet.key(), entries);
        }
        let dates = [
            ("created_on_from", self.created.from),
            ("created_on_to", self.created.to),
            ("updated_on_from", self.updated.from),
            ("updated_on_to", self.updated.to),
        ];
        for (key, date) in dates {
            if let Some(date) = date {
                raw.set_one(key, &date.format(DATE_FORMAT).to_string());
            }
        }
        raw
    }
}

/// Normalize raw filter input into a [`FilterCriteria`].
///
/// Blank entries are stripped, non-numeric identifiers are discarded
/// individually, the `none` token becomes the null sentinel, and a facet
/// whose value set ends up empty is omitted entirely. Date values must be a
/// single non-blank `%Y-%m-%d` string; anything else leaves the bound
/// absent. Never fails.
pub fn normalize(raw: &RawFilterParams) -> FilterCriteria {
    let mut criteria = FilterCriteria::default();

    for facet in Facet::ALL {
        let mut values: BTreeSet<Option<ValueId>> = BTreeSet::new();
        for entry in raw.values(facet.key()) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if entry == NONE_TOKEN {
                values.insert(None);
            } else if let Ok(id) = entry.parse::<ValueId>() {
                values.insert(Some(id));
            }
        }
        if !values.is_empty() {
            criteria.selections.insert(facet, values);
        }
    }

    criteria.created = DateBounds {
        from: parse_date(raw.single("created_on_from")),
        to: parse_date(raw.single("created_on_to")),
    };
    criteria.updated = DateBounds {
        from: parse_date(raw.single("updated_on_from")),
        to: parse_date(raw.single("updated_on_to")),
    };

    criteria
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(pairs: &[(&str, &[&str])]) -> RawFilterParams {
        let mut raw = RawFilterParams::new();
        for (key, values) in pairs {
            raw.set_many(key, values.iter().map(|v| v.to_string()).collect());
        }
        raw
    }

    #[test]
    fn test_normalize_parses_ids() {
        let criteria = normalize(&raw(&[("tracker_id", &["1", "3"])]));
        let selection = criteria.selection(Facet::Tracker).unwrap();
        assert_eq!(
            selection.iter().copied().collect::<Vec<_>>(),
            vec![Some(1), Some(3)]
        );
    }

    #[test]
    fn test_normalize_drops_blank_and_junk() {
        let criteria = normalize(&raw(&[("priority_id", &["", "  ", "abc", "4", "-2"])]));
        let selection = criteria.selection(Facet::Priority).unwrap();
        assert_eq!(selection.iter().copied().collect::<Vec<_>>(), vec![Some(4)]);
    }

    #[test]
    fn test_normalize_omits_empty_facet() {
        let criteria = normalize(&raw(&[("category_id", &["", "junk"])]));
        assert!(criteria.selection(Facet::Category).is_none());
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_normalize_none_token() {
        let criteria = normalize(&raw(&[("assigned_to_id", &["none", "7"])]));
        let selection = criteria.selection(Facet::AssignedTo).unwrap();
        assert!(selection.contains(&None));
        assert!(selection.contains(&Some(7)));
    }

    #[test]
    fn test_normalize_single_string_value() {
        let mut raw = RawFilterParams::new();
        raw.set_one("author_id", "12");
        let criteria = normalize(&raw);
        let selection = criteria.selection(Facet::Author).unwrap();
        assert_eq!(selection.iter().copied().collect::<Vec<_>>(), vec![Some(12)]);
    }

    #[test]
    fn test_normalize_dates() {
        let mut raw = RawFilterParams::new();
        raw.set_one("created_on_from", "2024-02-01");
        raw.set_one("created_on_to", "not-a-date");
        raw.set_one("updated_on_to", " 2024-03-15 ");
        let criteria = normalize(&raw);
        assert_eq!(
            criteria.created.from,
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert_eq!(criteria.created.to, None);
        assert_eq!(
            criteria.updated.to,
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn test_normalize_unknown_keys_ignored() {
        let criteria = normalize(&raw(&[("status_id", &["1"]), ("bogus", &["2"])]));
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_date_bounds_inclusive_through_end_of_day() {
        let bounds = DateBounds {
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            to: NaiveDate::from_ymd_opt(2024, 1, 31),
        };
        let inside = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let outside = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert!(bounds.contains(inside));
        assert!(!bounds.contains(outside));
        assert!(!bounds.contains(before));
    }

    #[test]
    fn test_without_removes_only_that_facet() {
        let mut raw = raw(&[("tracker_id", &["1"]), ("priority_id", &["2"])]);
        raw.set_one("updated_on_to", "2024-06-30");
        let criteria = normalize(&raw);

        let cross = criteria.without(Facet::Tracker);
        assert!(cross.selection(Facet::Tracker).is_none());
        assert!(cross.selection(Facet::Priority).is_some());
        assert_eq!(cross.updated.to, NaiveDate::from_ymd_opt(2024, 6, 30));
    }

    #[test]
    fn test_to_raw_round_trip() {
        let mut input = raw(&[
            ("tracker_id", &["2", "1"]),
            ("assigned_to_id", &["none", "5"]),
        ]);
        input.set_one("created_on_from", "2024-04-01");
        let criteria = normalize(&input);
        assert_eq!(normalize(&criteria.to_raw()), criteria);
    }
}
