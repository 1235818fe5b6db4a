//! Report aggregation entry points.
//!
//! [`ReportEngine`] is a standalone service the presentation layer calls
//! explicitly — it can always fall back to its default report path instead.
//! One call resolves the base scope once, then runs the seven facet counts
//! and the issue-list projection concurrently and assembles a single
//! [`ReportResult`]; if any of those queries fails, the whole call fails
//! and no partial bundle is returned.

pub mod facets;
pub mod projector;
pub mod telemetry;

pub use facets::count_facets;
pub use projector::{project_issues, ISSUE_PAGE_SIZE};
pub use telemetry::{ReportMetrics, ReportTelemetry};

use crate::config::ReportConfig;
use crate::criteria::{normalize, FilterCriteria, RawFilterParams};
use crate::model::{ProjectId, ReportResult};
use crate::scope::{ProjectDirectory, Scope, VisibilityPolicy};
use crate::store::IssueStore;
use crate::Result;
use std::sync::Arc;
use tracing::debug;

pub struct ReportEngine {
    store: Arc<dyn IssueStore>,
    directory: Arc<dyn ProjectDirectory>,
    config: ReportConfig,
}

impl ReportEngine {
    pub fn new(
        store: Arc<dyn IssueStore>,
        directory: Arc<dyn ProjectDirectory>,
        config: ReportConfig,
    ) -> Self {
        Self {
            store,
            directory,
            config,
        }
    }

    /// Aggregate a report from raw request parameters.
    pub async fn issue_report(
        &self,
        project: ProjectId,
        visibility: Arc<dyn VisibilityPolicy>,
        raw: &RawFilterParams,
    ) -> Result<ReportResult> {
        self.run(project, visibility, normalize(raw)).await
    }

    /// Aggregate a report from already-normalized criteria (e.g. a saved
    /// filter).
    pub async fn run(
        &self,
        project: ProjectId,
        visibility: Arc<dyn VisibilityPolicy>,
        criteria: FilterCriteria,
    ) -> Result<ReportResult> {
        let telemetry = ReportTelemetry::new();
        let scope = Scope::resolve(
            project,
            self.config.include_subprojects,
            &*self.directory,
            visibility,
        );
        debug!(
            project,
            scope_projects = scope.projects().len(),
            active_facets = criteria.selections.len(),
            "Running report aggregation"
        );

        let outcome = tokio::try_join!(
            count_facets(&*self.store, &*self.directory, project, &scope, &criteria),
            project_issues(&*self.store, &scope, &criteria),
        );
        let (facet_counts, (matched_issues, matched_total)) = match outcome {
            Ok(parts) => parts,
            Err(e) => {
                telemetry::log_report_error(project, &e.to_string());
                return Err(e);
            }
        };

        let metrics = telemetry.finish(
            project,
            criteria.selections.len(),
            facet_counts.values().map(Vec::len).sum(),
            matched_total,
        );
        telemetry::log_report_success(&metrics);

        Ok(ReportResult {
            statuses: self.directory.statuses(project),
            facets: facet_counts,
            matched_issues,
            matched_total,
            criteria,
        })
    }
}
