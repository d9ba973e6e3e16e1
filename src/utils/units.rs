//! Size-string normalization
//!
//! Converts human-written sizes such as `"7,416 KB"` into megabytes.
//! Scaling is decimal (1 MB = 1000 KB, 1 GB = 1000 MB).

use regex::Regex;
use std::sync::LazyLock;

static SIZE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([0-9,.]+)\s*(KB|MB|GB)\s*$").expect("size pattern is valid")
});

/// Size unit recognized in report strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Kilobytes,
    Megabytes,
    Gigabytes,
}

impl SizeUnit {
    fn parse(unit: &str) -> Option<Self> {
        match unit.to_ascii_uppercase().as_str() {
            "KB" => Some(SizeUnit::Kilobytes),
            "MB" => Some(SizeUnit::Megabytes),
            "GB" => Some(SizeUnit::Gigabytes),
            _ => None,
        }
    }

    /// Scale a value in this unit to megabytes
    pub fn to_megabytes(self, value: f64) -> f64 {
        match self {
            SizeUnit::Kilobytes => value / 1000.0,
            SizeUnit::Megabytes => value,
            SizeUnit::Gigabytes => value * 1000.0,
        }
    }
}

/// Convert `"<number> <KB|MB|GB>"` to megabytes
///
/// Returns `None` for anything that does not match: a missing unit,
/// non-numeric text, an empty string. Malformed sizes are common in
/// reports, so this never errors.
pub fn to_megabytes(text: &str) -> Option<f64> {
    let Some(caps) = SIZE_PATTERN.captures(text) else {
        tracing::debug!("Size '{}' has no KB/MB/GB unit", text);
        return None;
    };

    let number: f64 = match caps[1].replace(',', "").parse() {
        Ok(n) => n,
        Err(_) => {
            tracing::debug!("Size '{}' has an unparseable number", text);
            return None;
        }
    };

    SizeUnit::parse(&caps[2]).map(|unit| unit.to_megabytes(number))
}

/// [`to_megabytes`] over an optional cell
pub fn cell_to_megabytes(cell: Option<&str>) -> Option<f64> {
    cell.and_then(to_megabytes)
}
