//! Error taxonomy for health-check evaluation
//!
//! Per-metric problems never abort a pass. They are either carried as a
//! [`Diagnostic`] on an otherwise valid result, or as a [`MetricError`] in the
//! slot of the metric that could not be computed. Only [`HealthCheckError`]
//! fails a whole pass.

use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a single metric or aggregate. The rest of the batch proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MetricError {
    /// A column required by this computation is absent from its table.
    #[error("{table} table has no column {column}")]
    SchemaViolation { table: String, column: String },

    /// Polars failed while reading a column that does exist.
    #[error("table read failed: {message}")]
    Table { message: String },
}

impl MetricError {
    pub fn schema_violation(table: &str, column: impl Into<String>) -> Self {
        MetricError::SchemaViolation {
            table: table.to_string(),
            column: column.into(),
        }
    }
}

impl From<PolarsError> for MetricError {
    fn from(err: PolarsError) -> Self {
        MetricError::Table {
            message: err.to_string(),
        }
    }
}

/// Why a metric degraded to an informational result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// No row matched the metric key, even after year substitution.
    KeyNotFound,
    /// A size string could not be normalized to megabytes.
    UnitParseFailure,
    /// The rule entry was not an object, or had unusable fields.
    MalformedStandard,
    /// The section has no rule for this metric title.
    MissingStandard,
    /// The cell held text that is not a number.
    NonNumericValue,
}

/// Failure of a whole ingestion or evaluation pass.
#[derive(Debug, Error)]
pub enum HealthCheckError {
    #[error("required table '{name}' is missing")]
    MissingTable { name: String },

    #[error("unknown dashboard section '{name}'")]
    UnknownSection { name: String },

    #[error("invalid standards document: {message}")]
    InvalidStandards { message: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}
