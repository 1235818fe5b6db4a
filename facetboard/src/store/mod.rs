//! Issue store query seam.
//!
//! The engine never touches issue data directly: it sends declarative
//! [`IssueQuery`] values to an [`IssueStore`] and consumes counts, grouped
//! counts, and pages back. [`IssueQuery::matches`] is the reference
//! predicate; a SQL-backed store would translate the same query into
//! equality/IN/IS-NULL conditions and date-range comparisons instead.

pub mod memory;

use crate::criteria::{Facet, FilterCriteria};
use crate::model::{IssueRecord, StatusId, ValueId};
use crate::scope::Scope;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use memory::MemoryStore;

/// A single read-only query against the issue store: base scope, filter
/// criteria, and an optional pin of one facet to one candidate value.
#[derive(Debug, Clone)]
pub struct IssueQuery {
    pub scope: Scope,
    pub criteria: FilterCriteria,
    /// Restrict to issues whose `facet` value equals the candidate. A `None`
    /// candidate means the field is unset (IS-NULL semantics, never `= 0`).
    pub pin: Option<(Facet, Option<ValueId>)>,
}

impl IssueQuery {
    pub fn new(scope: Scope, criteria: FilterCriteria) -> Self {
        Self {
            scope,
            criteria,
            pin: None,
        }
    }

    pub fn pinned(mut self, facet: Facet, value: Option<ValueId>) -> Self {
        self.pin = Some((facet, value));
        self
    }

    /// Reference semantics of the query, used directly by [`MemoryStore`].
    pub fn matches(&self, issue: &IssueRecord) -> bool {
        if !self.scope.matches(issue) {
            return false;
        }
        if !self.criteria.matches(issue) {
            return false;
        }
        match self.pin {
            Some((facet, value)) => issue.facet_value(facet) == value,
            None => true,
        }
    }
}

/// One group of a status breakdown. `closed` carries the status closed flag
/// in the store's own representation ("t", "true", "1", ...); the engine
/// normalizes it with [`closed_flag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCountRow {
    pub status_id: StatusId,
    pub closed: String,
    pub total: u64,
}

/// Normalize a stored closed flag to a boolean. Matches the legacy report's
/// handling: "t", "true" and "1" are closed, anything else is open.
pub fn closed_flag(raw: &str) -> bool {
    matches!(raw, "t" | "true" | "1")
}

/// Query capability of the host issue store. All methods are read-only and
/// bounded; implementations should serve concurrent queries from a single
/// consistent snapshot where the underlying store supports it.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Number of issues matching the query.
    async fn count(&self, query: &IssueQuery) -> Result<u64>;

    /// Matching issues grouped and counted by `(status_id, closed)`,
    /// ascending by status id. Groups with no matching issues are not
    /// returned.
    async fn count_by_status(&self, query: &IssueQuery) -> Result<Vec<StatusCountRow>>;

    /// Up to `limit` matching issues, most recently updated first; ties
    /// keep insertion order.
    async fn recently_updated(
        &self,
        query: &IssueQuery,
        limit: usize,
    ) -> Result<Vec<IssueRecord>>;
}
