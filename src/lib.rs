//! Revit Health Scorer
//!
//! Evaluates a building-information model health-check report against a
//! configurable set of organizational standards.
//!
//! Module layout:
//! - `utils/`: Size normalization, year-tolerant key lookup, frame helpers
//! - `standards`: Typed standards document (section → metric → rule)
//! - `schema`: Column mapping for the Files, Checks and Elements tables
//! - `data`: Report loading with Polars
//! - `metrics/`: Per-metric evaluation, family sizes, category totals
//! - `scorer`: Full evaluation pass (sequential and Rayon-parallel)
//!
//! Per-metric failures never abort a pass; see [`errors`].

pub mod errors;
pub mod utils;
pub mod standards;
pub mod schema;
pub mod data;
pub mod metrics;
pub mod scorer;

// Re-export commonly used types
pub use errors::{Diagnostic, HealthCheckError, MetricError};
pub use utils::{lookup, to_megabytes, Lookup, ValueLookup};
pub use standards::{StandardRule, StandardsDocument};
pub use schema::{ColumnRef, ReportSchema};
pub use data::{HealthRecord, ReportHeader};
pub use metrics::*;
pub use scorer::{HealthReport, HealthScorer, MetricOutcome, SectionReport};
