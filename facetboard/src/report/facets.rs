//! Per-facet status-count breakdowns.
//!
//! Each facet is counted under the *cross-filter*: every other active facet
//! and both date bounds apply, the facet's own selection does not. Selecting
//! values in one facet therefore never shrinks that facet's own displayed
//! counts, only every other facet's.

use crate::criteria::{Facet, FilterCriteria};
use crate::model::{FacetBucket, ProjectId, ValueId};
use crate::scope::{ProjectDirectory, Scope};
use crate::store::{closed_flag, IssueQuery, IssueStore};
use crate::Result;
use futures::future;
use std::collections::BTreeMap;

/// Compute the status breakdown of every facet, concurrently.
pub async fn count_facets(
    store: &dyn IssueStore,
    directory: &dyn ProjectDirectory,
    project: ProjectId,
    scope: &Scope,
    criteria: &FilterCriteria,
) -> Result<BTreeMap<Facet, Vec<FacetBucket>>> {
    let tasks = Facet::ALL
        .iter()
        .map(|&facet| count_facet(store, directory, project, scope, criteria, facet));
    let buckets = future::try_join_all(tasks).await?;
    Ok(Facet::ALL.iter().copied().zip(buckets).collect())
}

/// Candidate values for one facet: the project's rolled-up dimension
/// universe, plus the unassigned sentinel where the field is nullable.
fn candidate_values(
    directory: &dyn ProjectDirectory,
    project: ProjectId,
    facet: Facet,
) -> Vec<Option<ValueId>> {
    let mut candidates: Vec<Option<ValueId>> = directory
        .candidates(project, facet)
        .into_iter()
        .map(Some)
        .collect();
    if facet.nullable() {
        candidates.push(None);
    }
    candidates
}

async fn count_facet(
    store: &dyn IssueStore,
    directory: &dyn ProjectDirectory,
    project: ProjectId,
    scope: &Scope,
    criteria: &FilterCriteria,
    facet: Facet,
) -> Result<Vec<FacetBucket>> {
    let cross = criteria.without(facet);
    let mut buckets = Vec::new();

    for value in candidate_values(directory, project, facet) {
        let query = IssueQuery::new(scope.clone(), cross.clone()).pinned(facet, value);
        // An empty row set emits nothing: zero-count buckets are suppressed.
        for row in store.count_by_status(&query).await? {
            buckets.push(FacetBucket {
                value,
                status_id: row.status_id,
                closed: closed_flag(&row.closed),
                count: row.total,
            });
        }
    }

    Ok(buckets)
}
