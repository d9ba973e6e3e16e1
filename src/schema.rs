//! Column mapping for the report tables
//!
//! The Files and Checks sheets have no header row, so their columns are
//! addressed by position; the Elements sheet is addressed by name. A mapping
//! is resolved against a frame once, at the ingestion boundary, and the
//! resolved names are what the lookups and aggregates receive.

use crate::errors::MetricError;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

pub const FILES_TABLE: &str = "Files";
pub const CHECKS_TABLE: &str = "Checks";
pub const ELEMENTS_TABLE: &str = "Elements";

/// Reference to a column by zero-based position or by header name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRef {
    Index(usize),
    Name(String),
}

impl ColumnRef {
    pub fn name(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }

    /// Resolve to the frame's actual column name
    ///
    /// # Errors
    /// `SchemaViolation` if the position is out of range or the name absent.
    pub fn resolve(&self, df: &DataFrame, table: &str) -> Result<String, MetricError> {
        match self {
            ColumnRef::Index(idx) => df
                .get_column_names()
                .get(*idx)
                .map(|name| name.to_string())
                .ok_or_else(|| MetricError::schema_violation(table, format!("#{}", idx))),
            ColumnRef::Name(name) => {
                if df.column(name).is_ok() {
                    Ok(name.clone())
                } else {
                    Err(MetricError::schema_violation(table, name.clone()))
                }
            }
        }
    }
}

/// Files sheet: report date and project path on a fixed row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesSchema {
    pub date: ColumnRef,
    pub project_path: ColumnRef,
    pub header_row: usize,
}

impl Default for FilesSchema {
    fn default() -> Self {
        Self {
            date: ColumnRef::Index(0),
            project_path: ColumnRef::Index(1),
            header_row: 1,
        }
    }
}

/// Checks sheet: metric labels and their values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksSchema {
    /// Metric label keys
    pub key: ColumnRef,
    /// Value for most metrics
    pub value: ColumnRef,
    /// Size string for the "File Size" row
    pub file_size: ColumnRef,
}

impl Default for ChecksSchema {
    fn default() -> Self {
        Self {
            key: ColumnRef::Index(2),
            value: ColumnRef::Index(8),
            file_size: ColumnRef::Index(6),
        }
    }
}

/// Elements sheet: one row per family/type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementsSchema {
    pub name: ColumnRef,
    pub category: ColumnRef,
    pub count: ColumnRef,
    /// Size string ("7,416 KB")
    pub size: ColumnRef,
}

impl Default for ElementsSchema {
    fn default() -> Self {
        Self {
            name: ColumnRef::name("Name"),
            category: ColumnRef::name("Category"),
            count: ColumnRef::name("Count"),
            size: ColumnRef::name("Value"),
        }
    }
}

/// Mapping for all three report tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSchema {
    pub files: FilesSchema,
    pub checks: ChecksSchema,
    pub elements: ElementsSchema,
}

/// Checks columns after resolution; each entry fails independently
#[derive(Debug, Clone)]
pub struct ResolvedChecks {
    pub key: Result<String, MetricError>,
    pub value: Result<String, MetricError>,
    pub file_size: Result<String, MetricError>,
}

impl ChecksSchema {
    pub fn resolve(&self, df: &DataFrame) -> ResolvedChecks {
        ResolvedChecks {
            key: self.key.resolve(df, CHECKS_TABLE),
            value: self.value.resolve(df, CHECKS_TABLE),
            file_size: self.file_size.resolve(df, CHECKS_TABLE),
        }
    }
}
