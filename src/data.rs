//! Report Loading
//!
//! Holds the three tables of one uploaded health-check report. The record is
//! created when a report is loaded and replaced when a new one is; nothing in
//! the crate keeps a reference to it between evaluation passes.
//!
//! Every cell is loaded as text. The sheets mix numbers, sizes, and labels in
//! the same column, so interpretation is left to the metric code.

use crate::errors::HealthCheckError;
use crate::schema::{ColumnRef, FilesSchema, CHECKS_TABLE, ELEMENTS_TABLE, FILES_TABLE};
use crate::utils::cell_text;
use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const FILES_CSV: &str = "files.csv";
pub const CHECKS_CSV: &str = "checks.csv";
pub const ELEMENTS_CSV: &str = "elements.csv";

/// One loaded report
#[derive(Debug, Clone)]
pub struct HealthRecord {
    /// Header-less; report date and project path
    pub files: DataFrame,

    /// Header-less; one row per model check
    pub checks: DataFrame,

    /// With header; one row per family/type
    pub elements: DataFrame,
}

/// Report identification shown above the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHeader {
    pub report_date: Option<String>,
    pub project_name: Option<String>,
}

impl HealthRecord {
    pub fn new(files: DataFrame, checks: DataFrame, elements: DataFrame) -> Self {
        Self { files, checks, elements }
    }

    /// Load `files.csv`, `checks.csv` and `elements.csv` from `dir`
    ///
    /// # Errors
    /// `HealthCheckError::MissingTable` if any of the three files is absent;
    /// CSV read failures with the offending path as context.
    pub fn load_csv_dir(dir: &Path) -> Result<Self> {
        tracing::info!("Loading report tables from {:?}", dir);

        let files = Self::load_table(dir, FILES_CSV, FILES_TABLE, false)?;
        let checks = Self::load_table(dir, CHECKS_CSV, CHECKS_TABLE, false)?;
        let elements = Self::load_table(dir, ELEMENTS_CSV, ELEMENTS_TABLE, true)?;

        tracing::info!(
            "  Files: {} rows, Checks: {} rows, Elements: {} rows",
            files.height(),
            checks.height(),
            elements.height()
        );

        Ok(Self::new(files, checks, elements))
    }

    fn load_table(dir: &Path, file_name: &str, table: &str, has_header: bool) -> Result<DataFrame> {
        let path = dir.join(file_name);
        if !path.is_file() {
            return Err(HealthCheckError::MissingTable {
                name: table.to_string(),
            })
            .with_context(|| format!("Expected {} table at {:?}", table, path));
        }

        CsvReadOptions::default()
            .with_has_header(has_header)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|opts| opts.with_truncate_ragged_lines(true))
            .try_into_reader_with_file_path(Some(path.clone()))
            .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
            .finish()
            .with_context(|| format!("Failed to load {} CSV", table))
    }

    /// Report date and project name from the Files table
    ///
    /// Missing cells or columns leave the field empty.
    pub fn header(&self, schema: &FilesSchema) -> ReportHeader {
        let read = |column: &ColumnRef| -> Option<String> {
            let name = column.resolve(&self.files, FILES_TABLE).ok()?;
            cell_text(&self.files, &name, schema.header_row, FILES_TABLE)
                .ok()
                .flatten()
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty())
        };

        ReportHeader {
            report_date: read(&schema.date),
            project_name: read(&schema.project_path).and_then(|path| project_name(&path)),
        }
    }
}

/// File stem of a project path; `/` and `\` both separate components
pub fn project_name(path: &str) -> Option<String> {
    let file_name = path
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())?;

    let stem = match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(dot) => &file_name[..dot],
    };
    Some(stem.to_string())
}
