//! Faceted filtering and aggregation engine for issue summary reports.
//!
//! Given a project, a viewer, and raw multi-select filter input, the engine
//! produces per-facet status-count breakdowns (with faceted-search
//! cross-filtering) plus a capped list of the most recently updated matching
//! issues. The issue store, visibility rules, and dimension universes are
//! supplied by the host through traits; an in-memory implementation ships
//! with the crate.

pub mod config;
pub mod criteria;
pub mod error;
pub mod model;
pub mod report;
pub mod saved;
pub mod scope;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
