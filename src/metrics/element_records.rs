//! Element rows of the report
//!
//! One record per Elements-sheet row. Sizes are normalized to megabytes on
//! construction and the family size (size × count) is derived once. Missing
//! or malformed inputs stay undefined (`None`) and are never read as zero.

use crate::errors::MetricError;
use crate::schema::{ColumnRef, ElementsSchema, ELEMENTS_TABLE};
use crate::utils::{cell_to_megabytes, parse_count, text_cells};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// A single family/type row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub name: Option<String>,
    pub category: Option<String>,
    pub count: Option<i64>,
    pub size_value_raw: Option<String>,
    pub size_value_mb: Option<f64>,
    /// `size_value_mb * count`; undefined if either operand is
    pub family_size: Option<f64>,
}

impl ElementRecord {
    pub fn new(
        name: Option<String>,
        category: Option<String>,
        count: Option<i64>,
        size_value_raw: Option<String>,
    ) -> Self {
        let size_value_mb = cell_to_megabytes(size_value_raw.as_deref());
        let family_size = match (size_value_mb, count) {
            (Some(mb), Some(n)) => Some(mb * n as f64),
            _ => None,
        };

        Self {
            name,
            category,
            count,
            size_value_raw,
            size_value_mb,
            family_size,
        }
    }
}

/// Elements-sheet column a computation depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementField {
    Name,
    Category,
    Count,
    Size,
}

/// Columns for category totals
pub const CATEGORY_FIELDS: &[ElementField] = &[ElementField::Category, ElementField::Count];

/// Columns for the family size breakdown
pub const FAMILY_SIZE_FIELDS: &[ElementField] = &[ElementField::Count, ElementField::Size];

/// Columns for the largest-families ranking
pub const RANKING_FIELDS: &[ElementField] = &[ElementField::Name, ElementField::Count, ElementField::Size];

impl ElementsSchema {
    fn column_for(&self, field: ElementField) -> &ColumnRef {
        match field {
            ElementField::Name => &self.name,
            ElementField::Category => &self.category,
            ElementField::Count => &self.count,
            ElementField::Size => &self.size,
        }
    }
}

/// Check that every field in `required` maps to a column of `df`
///
/// # Errors
/// `SchemaViolation` for the first field whose column is absent.
pub fn require_element_fields(
    df: &DataFrame,
    schema: &ElementsSchema,
    required: &[ElementField],
) -> Result<(), MetricError> {
    for &field in required {
        if let Err(err) = schema.column_for(field).resolve(df, ELEMENTS_TABLE) {
            tracing::warn!("{}", err);
            return Err(err);
        }
    }
    Ok(())
}

/// Read element records from the Elements frame
///
/// Only the `required` columns must exist; other missing columns leave their
/// field undefined on every record.
///
/// # Errors
/// `SchemaViolation` for the first required column that is absent.
pub fn extract_element_records(
    df: &DataFrame,
    schema: &ElementsSchema,
    required: &[ElementField],
) -> Result<Vec<ElementRecord>, MetricError> {
    require_element_fields(df, schema, required)?;

    let read = |field: ElementField| -> Result<Option<Vec<Option<String>>>, MetricError> {
        match schema.column_for(field).resolve(df, ELEMENTS_TABLE) {
            Ok(name) => text_cells(df, &name, ELEMENTS_TABLE).map(Some),
            Err(_) => Ok(None),
        }
    };

    let names = read(ElementField::Name)?;
    let categories = read(ElementField::Category)?;
    let counts = read(ElementField::Count)?;
    let sizes = read(ElementField::Size)?;

    let cell = |column: &Option<Vec<Option<String>>>, idx: usize| -> Option<String> {
        column.as_ref().and_then(|cells| cells.get(idx).cloned().flatten())
    };

    let records = (0..df.height())
        .map(|idx| {
            let count = cell(&counts, idx).and_then(|text| parse_count(&text));
            ElementRecord::new(cell(&names, idx), cell(&categories, idx), count, cell(&sizes, idx))
        })
        .collect();

    Ok(records)
}
