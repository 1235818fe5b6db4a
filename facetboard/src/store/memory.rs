//! In-memory issue store.
//!
//! Backs the engine in tests and small embedded deployments. Implements
//! both the [`IssueStore`] query capability and the [`ProjectDirectory`]
//! seam: the project hierarchy comes from registered parent links, facet
//! candidate universes are the distinct values present in the project
//! subtree, and statuses come from the registered status table.

use super::{IssueQuery, IssueStore, StatusCountRow};
use crate::criteria::Facet;
use crate::model::{IssueRecord, IssueStatus, ProjectId, StatusId, ValueId};
use crate::scope::ProjectDirectory;
use crate::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy)]
struct ProjectRow {
    id: ProjectId,
    parent: Option<ProjectId>,
}

#[derive(Default)]
struct Tables {
    projects: Vec<ProjectRow>,
    statuses: Vec<IssueStatus>,
    issues: Vec<IssueRecord>,
}

/// Thread-safe in-memory issue store. All queries read a consistent
/// snapshot under a single read lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_project(&self, id: ProjectId, parent: Option<ProjectId>) {
        self.tables.write().projects.push(ProjectRow { id, parent });
    }

    pub fn add_status(&self, status: IssueStatus) {
        self.tables.write().statuses.push(status);
    }

    pub fn add_issue(&self, issue: IssueRecord) {
        self.tables.write().issues.push(issue);
    }

    /// Storage representation of a status closed flag, as a joined group-by
    /// row would carry it.
    fn closed_repr(tables: &Tables, issue: &IssueRecord) -> String {
        let closed = tables
            .statuses
            .iter()
            .find(|s| s.id == issue.status_id)
            .map(|s| s.is_closed)
            .unwrap_or(issue.closed);
        if closed { "t" } else { "f" }.to_string()
    }

    fn subtree(tables: &Tables, project: ProjectId) -> BTreeSet<ProjectId> {
        let mut tree = BTreeSet::new();
        tree.insert(project);
        tree.extend(descendants_of(tables, project));
        tree
    }
}

fn descendants_of(tables: &Tables, project: ProjectId) -> Vec<ProjectId> {
    let mut found = Vec::new();
    let mut frontier = vec![project];
    while let Some(current) = frontier.pop() {
        for row in &tables.projects {
            if row.parent == Some(current) && !found.contains(&row.id) {
                found.push(row.id);
                frontier.push(row.id);
            }
        }
    }
    found.sort_unstable();
    found
}

#[async_trait]
impl IssueStore for MemoryStore {
    async fn count(&self, query: &IssueQuery) -> Result<u64> {
        let tables = self.tables.read();
        Ok(tables.issues.iter().filter(|i| query.matches(i)).count() as u64)
    }

    async fn count_by_status(&self, query: &IssueQuery) -> Result<Vec<StatusCountRow>> {
        let tables = self.tables.read();
        let mut groups: BTreeMap<(StatusId, String), u64> = BTreeMap::new();
        for issue in tables.issues.iter().filter(|i| query.matches(i)) {
            let key = (issue.status_id, Self::closed_repr(&tables, issue));
            *groups.entry(key).or_insert(0) += 1;
        }
        Ok(groups
            .into_iter()
            .map(|((status_id, closed), total)| StatusCountRow {
                status_id,
                closed,
                total,
            })
            .collect())
    }

    async fn recently_updated(
        &self,
        query: &IssueQuery,
        limit: usize,
    ) -> Result<Vec<IssueRecord>> {
        let tables = self.tables.read();
        let mut matched: Vec<IssueRecord> = tables
            .issues
            .iter()
            .filter(|i| query.matches(i))
            .cloned()
            .collect();
        // Stable sort keeps insertion order between equal timestamps.
        matched.sort_by(|a, b| b.updated_on.cmp(&a.updated_on));
        matched.truncate(limit);
        Ok(matched)
    }
}

impl ProjectDirectory for MemoryStore {
    fn descendants(&self, project: ProjectId) -> Vec<ProjectId> {
        let tables = self.tables.read();
        descendants_of(&tables, project)
    }

    fn candidates(&self, project: ProjectId, facet: Facet) -> Vec<ValueId> {
        let tables = self.tables.read();
        if facet == Facet::Subproject {
            return descendants_of(&tables, project);
        }
        let tree = Self::subtree(&tables, project);
        let values: BTreeSet<ValueId> = tables
            .issues
            .iter()
            .filter(|i| tree.contains(&i.project_id))
            .filter_map(|i| i.facet_value(facet))
            .collect();
        values.into_iter().collect()
    }

    fn statuses(&self, _project: ProjectId) -> Vec<IssueStatus> {
        let mut statuses = self.tables.read().statuses.clone();
        statuses.sort_by_key(|s| s.id);
        statuses
    }
}
