//! DataFrame access helpers with column validation
//!
//! Report sheets mix numbers and text in the same column, so every cell is
//! read as text and interpreted by the lenient parsers here.

use crate::errors::MetricError;
use polars::prelude::*;

/// Check that every required column is present in `df`
///
/// # Errors
/// `SchemaViolation` naming the first missing column.
pub fn require_columns(df: &DataFrame, columns: &[&str], table: &str) -> Result<(), MetricError> {
    for &name in columns {
        if df.column(name).is_err() {
            tracing::warn!(
                "{}: missing expected column '{}'. Available columns: {:?}",
                table,
                name,
                df.get_column_names()
            );
            return Err(MetricError::schema_violation(table, name));
        }
    }
    Ok(())
}

/// Read a whole column as optional text cells
pub fn text_cells(df: &DataFrame, name: &str, table: &str) -> Result<Vec<Option<String>>, MetricError> {
    let column = df
        .column(name)
        .map_err(|_| MetricError::schema_violation(table, name))?;
    let as_text = column.cast(&DataType::String)?;

    Ok(as_text
        .str()?
        .into_iter()
        .map(|opt| opt.map(|s| s.to_string()))
        .collect())
}

/// Read a single cell as text; `None` for null or out-of-range rows
pub fn cell_text(df: &DataFrame, name: &str, row: usize, table: &str) -> Result<Option<String>, MetricError> {
    if row >= df.height() {
        return Ok(None);
    }
    let cells = text_cells(df, name, table)?;
    Ok(cells.into_iter().nth(row).flatten())
}

/// Parse a numeric cell: trims, drops thousands separators
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse an integer-like count; fractional values are not counts
pub fn parse_count(text: &str) -> Option<i64> {
    let n = parse_number(text)?;
    // i64::MAX as f64 rounds up to 2^63, which no i64 can hold
    if n.fract() != 0.0 || n.abs() >= i64::MAX as f64 {
        tracing::debug!("Count '{}' is not a whole number", text);
        return None;
    }
    Some(n as i64)
}
