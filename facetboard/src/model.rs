//! Core data types shared across the engine.

use crate::criteria::{Facet, FilterCriteria};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ProjectId = u32;
pub type UserId = u32;
pub type StatusId = u32;

/// Identifier of a facet dimension value (tracker, priority, principal, ...).
pub type ValueId = u32;

/// A single issue as read from the host store. The engine never mutates
/// issue records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub id: u64,
    pub subject: String,
    pub project_id: ProjectId,
    pub tracker_id: ValueId,
    pub status_id: StatusId,
    /// Closed flag of the issue's current status.
    pub closed: bool,
    pub priority_id: ValueId,
    pub category_id: Option<ValueId>,
    pub fixed_version_id: Option<ValueId>,
    pub assigned_to_id: Option<ValueId>,
    pub author_id: ValueId,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl IssueRecord {
    /// The issue's value on a facet dimension. `None` means the field is
    /// unset (only possible on the nullable facets).
    pub fn facet_value(&self, facet: Facet) -> Option<ValueId> {
        match facet {
            Facet::Tracker => Some(self.tracker_id),
            Facet::Priority => Some(self.priority_id),
            Facet::AssignedTo => self.assigned_to_id,
            Facet::Category => self.category_id,
            Facet::FixedVersion => self.fixed_version_id,
            Facet::Author => Some(self.author_id),
            Facet::Subproject => Some(self.project_id),
        }
    }
}

/// One row of the status dimension, used by the presentation layer to lay
/// out the report columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStatus {
    pub id: StatusId,
    pub name: String,
    pub is_closed: bool,
}

/// One aggregated row of a facet's breakdown: issues with facet value
/// `value` (None = unassigned) in status `status_id`. Zero-count buckets are
/// never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    pub value: Option<ValueId>,
    pub status_id: StatusId,
    pub closed: bool,
    pub count: u64,
}

/// The full aggregation bundle for one report request. Built fresh per call
/// and handed to the presentation layer; the active criteria travel inside
/// the bundle rather than through ambient state.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResult {
    pub criteria: FilterCriteria,
    pub statuses: Vec<IssueStatus>,
    pub facets: BTreeMap<Facet, Vec<FacetBucket>>,
    pub matched_issues: Vec<IssueRecord>,
    pub matched_total: u64,
}
