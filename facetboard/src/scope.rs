//! Base issue scope: visibility and project membership.
//!
//! Visibility rules and the project hierarchy are owned by the host; this
//! module only composes the two predicates. The dimension universes used to
//! enumerate facet candidates come through the same [`ProjectDirectory`]
//! seam and are not validated here.

use crate::criteria::Facet;
use crate::model::{IssueRecord, IssueStatus, ProjectId, ValueId};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// "Is this issue visible to the current actor" — supplied by the host's
/// access-control layer.
pub trait VisibilityPolicy: Send + Sync {
    fn is_visible(&self, issue: &IssueRecord) -> bool;
}

/// Grants visibility to every issue.
pub struct AllVisible;

impl VisibilityPolicy for AllVisible {
    fn is_visible(&self, _issue: &IssueRecord) -> bool {
        true
    }
}

/// Host-supplied project hierarchy and per-project dimension universes.
pub trait ProjectDirectory: Send + Sync {
    /// Descendant projects of `project`, excluding `project` itself.
    fn descendants(&self, project: ProjectId) -> Vec<ProjectId>;

    /// Candidate values of a facet dimension rolled up for `project`, in
    /// display order. The null candidate for nullable facets is appended by
    /// the facet counter, not listed here.
    fn candidates(&self, project: ProjectId, facet: Facet) -> Vec<ValueId>;

    /// Statuses rolled up for `project`, used for the report columns.
    fn statuses(&self, project: ProjectId) -> Vec<IssueStatus>;
}

/// The base set of issues an aggregation is allowed to consider: visible to
/// the current actor and belonging to the project (or one of its
/// descendants when subprojects are included).
#[derive(Clone)]
pub struct Scope {
    projects: BTreeSet<ProjectId>,
    visibility: Arc<dyn VisibilityPolicy>,
}

impl Scope {
    /// Resolve the base scope for a report over `project`.
    /// `include_subprojects` is the host-level setting, read once per
    /// aggregation call.
    pub fn resolve(
        project: ProjectId,
        include_subprojects: bool,
        directory: &dyn ProjectDirectory,
        visibility: Arc<dyn VisibilityPolicy>,
    ) -> Scope {
        let mut projects = BTreeSet::new();
        projects.insert(project);
        if include_subprojects {
            projects.extend(directory.descendants(project));
        }
        Scope {
            projects,
            visibility,
        }
    }

    pub fn projects(&self) -> &BTreeSet<ProjectId> {
        &self.projects
    }

    pub fn matches(&self, issue: &IssueRecord) -> bool {
        self.projects.contains(&issue.project_id) && self.visibility.is_visible(issue)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("projects", &self.projects)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use chrono::{TimeZone, Utc};

    struct OwnIssuesOnly(ValueId);

    impl VisibilityPolicy for OwnIssuesOnly {
        fn is_visible(&self, issue: &IssueRecord) -> bool {
            issue.author_id == self.0
        }
    }

    fn issue(id: u64, project_id: ProjectId, author_id: ValueId) -> IssueRecord {
        IssueRecord {
            id,
            subject: format!("issue {id}"),
            project_id,
            tracker_id: 1,
            status_id: 1,
            closed: false,
            priority_id: 1,
            category_id: None,
            fixed_version_id: None,
            assigned_to_id: None,
            author_id,
            created_on: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_on: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn directory() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_project(1, None);
        store.add_project(2, Some(1));
        store.add_project(3, Some(2));
        store.add_project(4, None);
        store
    }

    #[test]
    fn test_scope_with_subprojects() {
        let directory = directory();
        let scope = Scope::resolve(1, true, &directory, Arc::new(AllVisible));
        assert!(scope.projects().contains(&1));
        assert!(scope.projects().contains(&2));
        assert!(scope.projects().contains(&3));
        assert!(!scope.projects().contains(&4));
        assert!(scope.matches(&issue(1, 3, 9)));
        assert!(!scope.matches(&issue(2, 4, 9)));
    }

    #[test]
    fn test_scope_without_subprojects() {
        let directory = directory();
        let scope = Scope::resolve(1, false, &directory, Arc::new(AllVisible));
        assert_eq!(scope.projects().len(), 1);
        assert!(!scope.matches(&issue(1, 2, 9)));
    }

    #[test]
    fn test_scope_composes_visibility() {
        let directory = directory();
        let scope = Scope::resolve(1, true, &directory, Arc::new(OwnIssuesOnly(9)));
        assert!(scope.matches(&issue(1, 1, 9)));
        assert!(!scope.matches(&issue(2, 1, 8)));
    }
}
