//! Element counts per category
//!
//! Groups element rows by category and sums their counts. Unreadable counts
//! add nothing to their group; rows without a category are dropped.

use crate::metrics::element_records::ElementRecord;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Number of categories reported
pub const TOP_CATEGORIES: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_count: i64,
}

/// Categories by total count, largest first, at most [`TOP_CATEGORIES`]
///
/// Ties keep the order in which categories first appear.
pub fn aggregate_categories(elements: &[ElementRecord]) -> Vec<CategoryTotal> {
    let mut totals = aggregate_all_categories(elements);
    totals.truncate(TOP_CATEGORIES);
    totals
}

/// Every category by total count, largest first
pub fn aggregate_all_categories(elements: &[ElementRecord]) -> Vec<CategoryTotal> {
    let mut position: FxHashMap<&str, usize> = FxHashMap::default();
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for element in elements {
        let Some(category) = element.category.as_deref() else {
            continue;
        };
        let idx = *position.entry(category).or_insert_with(|| {
            totals.push(CategoryTotal {
                category: category.to_string(),
                total_count: 0,
            });
            totals.len() - 1
        });
        let total = &mut totals[idx].total_count;
        *total = total.saturating_add(element.count.unwrap_or(0));
    }

    // Stable sort keeps first-seen order among equal totals
    totals.sort_by(|a, b| b.total_count.cmp(&a.total_count));
    totals
}
