//! Saved filter presets.
//!
//! A saved filter is a named, JSON-encoded criteria blob scoped to a
//! (project, user) pair. Persisting it is a plain CRUD concern owned by the
//! host; this module only defines the record shape and the two conversions,
//! so saved filters and live form submissions share identical parsing
//! semantics.

use crate::criteria::{normalize, FilterCriteria, RawFilterParams};
use crate::model::{ProjectId, UserId};
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFilter {
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub name: String,
    /// JSON-encoded raw filter parameters.
    pub filter_conditions: String,
}

impl SavedFilter {
    pub fn new(
        project_id: ProjectId,
        user_id: UserId,
        name: impl Into<String>,
        criteria: &FilterCriteria,
    ) -> Result<Self> {
        Ok(Self {
            project_id,
            user_id,
            name: name.into(),
            filter_conditions: serde_json::to_string(&criteria.to_raw())?,
        })
    }

    /// Parse the stored blob back through the normalizer. A corrupt blob
    /// degrades to empty criteria — a saved filter that no longer parses
    /// behaves like "no filter applied", it never fails the request.
    pub fn criteria(&self) -> FilterCriteria {
        serde_json::from_str::<RawFilterParams>(&self.filter_conditions)
            .map(|raw| normalize(&raw))
            .unwrap_or_default()
    }
}
