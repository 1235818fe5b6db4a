//! Aggregation telemetry.
//!
//! Diagnostics live here, at the orchestration boundary — the counting and
//! projection functions stay observable purely through their inputs and
//! outputs.

use crate::model::ProjectId;
use serde::Serialize;
use std::time::Instant;
use tracing::{error, info, warn};

const SLOW_REPORT_MS: f64 = 500.0;

/// Metrics collected for one aggregation call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportMetrics {
    pub total_ms: f64,
    pub project: ProjectId,
    pub active_facets: usize,
    pub bucket_count: usize,
    pub matched_total: u64,
}

/// Tracks one aggregation from entry to assembly.
pub struct ReportTelemetry {
    start: Instant,
}

impl ReportTelemetry {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn finish(
        self,
        project: ProjectId,
        active_facets: usize,
        bucket_count: usize,
        matched_total: u64,
    ) -> ReportMetrics {
        ReportMetrics {
            total_ms: self.start.elapsed().as_secs_f64() * 1000.0,
            project,
            active_facets,
            bucket_count,
            matched_total,
        }
    }
}

impl Default for ReportTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

/// Log a completed aggregation.
pub fn log_report_success(metrics: &ReportMetrics) {
    info!(
        project = metrics.project,
        active_facets = metrics.active_facets,
        bucket_count = metrics.bucket_count,
        matched_total = metrics.matched_total,
        total_ms = metrics.total_ms,
        "Report aggregation completed"
    );

    if metrics.total_ms > SLOW_REPORT_MS {
        warn!(
            project = metrics.project,
            total_ms = metrics.total_ms,
            "Slow report aggregation"
        );
    }
}

/// Log a failed aggregation.
pub fn log_report_error(project: ProjectId, error: &str) {
    error!(project = project, error = %error, "Report aggregation failed");
}
