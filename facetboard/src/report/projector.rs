//! Matching-issue list projection.

use crate::criteria::FilterCriteria;
use crate::model::IssueRecord;
use crate::scope::Scope;
use crate::store::{IssueQuery, IssueStore};
use crate::Result;

/// Maximum number of issues returned for direct display.
pub const ISSUE_PAGE_SIZE: usize = 50;

/// Apply the full criteria set to the base scope and return the most
/// recently updated matching issues plus the true total match count.
///
/// With no active facet and no active date bound the projector returns
/// `(vec![], 0)` without touching the store — an unfiltered report has no
/// use for a full issue dump.
pub async fn project_issues(
    store: &dyn IssueStore,
    scope: &Scope,
    criteria: &FilterCriteria,
) -> Result<(Vec<IssueRecord>, u64)> {
    if criteria.is_empty() {
        return Ok((Vec::new(), 0));
    }

    let query = IssueQuery::new(scope.clone(), criteria.clone());
    let (total, page) = tokio::try_join!(
        store.count(&query),
        store.recently_updated(&query, ISSUE_PAGE_SIZE),
    )?;
    Ok((page, total))
}
