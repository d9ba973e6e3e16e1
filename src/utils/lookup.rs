//! Year-tolerant metric lookup over a labeled table
//!
//! Report labels embed the product year ("Total Model Elements Revit 2024")
//! and the year moves with every report version. A key that does not match
//! exactly is retried with every embedded `20xx` replaced by each year from
//! 2022 onward, so standards written against one year keep resolving.

use crate::errors::MetricError;
use crate::utils::frame_helpers::{require_columns, text_cells};
use polars::prelude::DataFrame;
use regex::{NoExpand, Regex};
use rustc_hash::FxHashMap;
use std::ops::Range;
use std::sync::LazyLock;

/// Years tried when the exact key is absent. Open-ended in practice.
pub const YEAR_RANGE: Range<u32> = 2022..3000;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20[0-9]{2}").expect("year pattern is valid"));

/// Outcome of resolving a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The key row exists; its value cell may still be empty.
    Found(Option<&'a str>),
    NotFound,
}

impl<'a> Lookup<'a> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Cell text, or `None` when missing or not found
    pub fn cell(self) -> Option<&'a str> {
        match self {
            Lookup::Found(cell) => cell,
            Lookup::NotFound => None,
        }
    }
}

/// Key column → value column index built once per table
///
/// Keeps the first row for each key, matching a top-down scan.
#[derive(Debug, Clone)]
pub struct ValueLookup {
    first_row: FxHashMap<String, usize>,
    values: Vec<Option<String>>,
}

impl ValueLookup {
    /// Index `key_column` of `df` against `value_column`
    ///
    /// # Errors
    /// `SchemaViolation` if either column is absent.
    pub fn new(
        df: &DataFrame,
        key_column: &str,
        value_column: &str,
        table: &str,
    ) -> Result<Self, MetricError> {
        require_columns(df, &[key_column, value_column], table)?;
        let keys = text_cells(df, key_column, table)?;
        let values = text_cells(df, value_column, table)?;
        Ok(Self::from_cells(keys, values))
    }

    /// Build from already-extracted cells (row-aligned)
    pub fn from_cells(keys: Vec<Option<String>>, values: Vec<Option<String>>) -> Self {
        let mut first_row = FxHashMap::default();
        for (idx, key) in keys.into_iter().enumerate() {
            if let Some(key) = key {
                first_row.entry(key).or_insert(idx);
            }
        }
        Self { first_row, values }
    }

    fn exact(&self, key: &str) -> Option<Lookup<'_>> {
        self.first_row
            .get(key)
            .map(|&idx| Lookup::Found(self.values.get(idx).and_then(|v| v.as_deref())))
    }

    /// Resolve `key`: exact match first, then year substitution
    pub fn lookup(&self, key: &str) -> Lookup<'_> {
        if let Some(found) = self.exact(key) {
            return found;
        }

        // Keys without a year go through the loop unchanged and miss every time.
        for year in YEAR_RANGE {
            let year = year.to_string();
            let alt_key = YEAR_PATTERN.replace_all(key, NoExpand(year.as_str()));
            if let Some(found) = self.exact(&alt_key) {
                tracing::debug!("Key '{}' resolved as '{}'", key, alt_key);
                return found;
            }
        }

        tracing::debug!("Key '{}' not found", key);
        Lookup::NotFound
    }
}

/// One-shot lookup of `key` in `df`
///
/// `None` when no row matches, `Some(None)` when the row exists with an empty
/// value cell. Builds a throwaway index; prefer [`ValueLookup`] for repeated keys.
pub fn lookup(
    df: &DataFrame,
    key: &str,
    key_column: &str,
    value_column: &str,
    table: &str,
) -> Result<Option<Option<String>>, MetricError> {
    let index = ValueLookup::new(df, key_column, value_column, table)?;
    Ok(match index.lookup(key) {
        Lookup::Found(cell) => Some(cell.map(str::to_string)),
        Lookup::NotFound => None,
    })
}
