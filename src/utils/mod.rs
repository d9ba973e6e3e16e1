//! Utility modules for health-check evaluation
//!
//! Leaf functionality shared by the metrics and the scorer:
//! - Units: size-string normalization to megabytes
//! - Lookup: year-tolerant key → value resolution over a labeled table
//! - Frame helpers: column validation and text-cell extraction

pub mod frame_helpers;
pub mod lookup;
pub mod units;

// Re-export commonly used items
pub use frame_helpers::{cell_text, parse_count, parse_number, require_columns, text_cells};
pub use lookup::{lookup, Lookup, ValueLookup, YEAR_RANGE};
pub use units::{cell_to_megabytes, to_megabytes, SizeUnit};
