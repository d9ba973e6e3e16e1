//! FAMILY SIZE BREAKDOWN
//!
//! Buckets element family sizes (size MB × count) into four fixed ranges,
//! totals them, and ranks elements by size for the largest-families list.
//!
//! Rows with an undefined family size are kept out of every bucket and the
//! total, and rank after all defined rows.

use crate::metrics::element_records::ElementRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Family size range used for the size histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeBucket {
    /// > 5 MB
    Over5Mb,
    /// (2, 5] MB
    From2To5Mb,
    /// (1, 2] MB
    From1To2Mb,
    /// <= 1 MB
    AtMost1Mb,
}

impl SizeBucket {
    pub const ALL: [SizeBucket; 4] = [
        SizeBucket::Over5Mb,
        SizeBucket::From2To5Mb,
        SizeBucket::From1To2Mb,
        SizeBucket::AtMost1Mb,
    ];

    /// Bucket for a defined family size
    pub fn classify(family_size_mb: f64) -> Self {
        match family_size_mb {
            s if s > 5.0 => SizeBucket::Over5Mb,
            s if s > 2.0 => SizeBucket::From2To5Mb,
            s if s > 1.0 => SizeBucket::From1To2Mb,
            _ => SizeBucket::AtMost1Mb,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeBucket::Over5Mb => "> 5 MB",
            SizeBucket::From2To5Mb => "2-5 MB",
            SizeBucket::From1To2Mb => "1-2 MB",
            SizeBucket::AtMost1Mb => "< 1 MB",
        }
    }
}

/// Element counts per size bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeBuckets {
    pub over_5mb: usize,
    pub from_2_to_5mb: usize,
    pub from_1_to_2mb: usize,
    pub at_most_1mb: usize,
}

impl SizeBuckets {
    pub fn get(&self, bucket: SizeBucket) -> usize {
        match bucket {
            SizeBucket::Over5Mb => self.over_5mb,
            SizeBucket::From2To5Mb => self.from_2_to_5mb,
            SizeBucket::From1To2Mb => self.from_1_to_2mb,
            SizeBucket::AtMost1Mb => self.at_most_1mb,
        }
    }

    fn increment(&mut self, bucket: SizeBucket) {
        match bucket {
            SizeBucket::Over5Mb => self.over_5mb += 1,
            SizeBucket::From2To5Mb => self.from_2_to_5mb += 1,
            SizeBucket::From1To2Mb => self.from_1_to_2mb += 1,
            SizeBucket::AtMost1Mb => self.at_most_1mb += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.over_5mb + self.from_2_to_5mb + self.from_1_to_2mb + self.at_most_1mb
    }

    /// (label, count) pairs in histogram order
    pub fn labeled(&self) -> Vec<(&'static str, usize)> {
        SizeBucket::ALL.iter().map(|&b| (b.label(), self.get(b))).collect()
    }
}

/// Result of the family size breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilySizeSummary {
    pub buckets: SizeBuckets,
    /// Sum of defined family sizes (MB)
    pub total_mb: f64,
    /// Rows with a defined family size
    pub defined_count: usize,
    /// Rows excluded for missing count or unreadable size
    pub undefined_count: usize,
    /// All rows, largest family size first; undefined rows last
    pub ranked: Vec<ElementRecord>,
}

/// Entry of the largest-families list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFamily {
    /// 1-based
    pub rank: usize,
    pub name: Option<String>,
    pub family_size_mb: f64,
}

impl FamilySizeSummary {
    /// The `n` largest families; fewer when not enough rows are defined
    pub fn top(&self, n: usize) -> &[ElementRecord] {
        let end = n.min(self.defined_count);
        &self.ranked[..end]
    }

    /// Name and size of the `n` largest families
    pub fn largest(&self, n: usize) -> Vec<RankedFamily> {
        self.top(n)
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| {
                record.family_size.map(|family_size_mb| RankedFamily {
                    rank: idx + 1,
                    name: record.name.clone(),
                    family_size_mb,
                })
            })
            .collect()
    }

    /// Number of families larger than 5 MB
    pub fn families_over_5mb(&self) -> usize {
        self.buckets.over_5mb
    }
}

/// Descending by family size, undefined last
fn by_family_size_desc(a: &ElementRecord, b: &ElementRecord) -> Ordering {
    match (a.family_size, b.family_size) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Bucket, total and rank element family sizes
pub fn classify_family_sizes(elements: &[ElementRecord]) -> FamilySizeSummary {
    let mut buckets = SizeBuckets::default();
    let mut total_mb = 0.0;
    let mut defined_count = 0;

    for family_size in elements.iter().filter_map(|e| e.family_size) {
        buckets.increment(SizeBucket::classify(family_size));
        total_mb += family_size;
        defined_count += 1;
    }

    let undefined_count = elements.len() - defined_count;
    if undefined_count > 0 {
        tracing::debug!("{} element rows have no family size", undefined_count);
    }

    // Stable sort: ties keep report order
    let mut ranked = elements.to_vec();
    ranked.sort_by(by_family_size_desc);

    FamilySizeSummary {
        buckets,
        total_mb,
        defined_count,
        undefined_count,
        ranked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn element(name: &str, count: Option<i64>, size: &str) -> ElementRecord {
        ElementRecord::new(Some(name.to_string()), Some("Generic".into()), count, Some(size.to_string()))
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(SizeBucket::classify(5.0001), SizeBucket::Over5Mb);
        assert_eq!(SizeBucket::classify(5.0), SizeBucket::From2To5Mb);
        assert_eq!(SizeBucket::classify(2.0), SizeBucket::From1To2Mb);
        assert_eq!(SizeBucket::classify(1.0), SizeBucket::AtMost1Mb);
        assert_eq!(SizeBucket::classify(0.0), SizeBucket::AtMost1Mb);
    }

    #[test]
    fn test_buckets_cover_all_defined_rows() {
        let elements = vec![
            element("a", Some(1), "6 MB"),
            element("b", Some(2), "2 MB"),
            element("c", Some(3), "500 KB"),
            element("d", Some(1), "0.2 MB"),
            element("e", Some(10), "1 GB"),
        ];
        let summary = classify_family_sizes(&elements);

        assert_eq!(summary.buckets.total(), elements.len());
        assert_eq!(summary.buckets.over_5mb, 2);
        assert_eq!(summary.buckets.from_2_to_5mb, 1);
        assert_eq!(summary.buckets.from_1_to_2mb, 1);
        assert_eq!(summary.buckets.at_most_1mb, 1);
        assert_relative_eq!(summary.total_mb, 6.0 + 4.0 + 1.5 + 0.2 + 10_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_undefined_rows_excluded() {
        let elements = vec![
            element("no_count", None, "3 MB"),
            element("no_unit", Some(2), "300"),
            element("tiny", Some(1), "10 KB"),
        ];
        let summary = classify_family_sizes(&elements);

        // Undefined rows do not fall into "<= 1 MB"
        assert_eq!(summary.buckets.at_most_1mb, 1);
        assert_eq!(summary.buckets.total(), 1);
        assert_eq!(summary.undefined_count, 2);
        assert_relative_eq!(summary.total_mb, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_ranking_stable_descending_undefined_last() {
        let elements = vec![
            element("undefined_first", None, "9 MB"),
            element("small", Some(1), "1 MB"),
            element("tie_a", Some(2), "2 MB"),
            element("big", Some(1), "20 MB"),
            element("tie_b", Some(4), "1 MB"),
        ];
        let summary = classify_family_sizes(&elements);

        let names: Vec<&str> = summary
            .ranked
            .iter()
            .map(|r| r.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["big", "tie_a", "tie_b", "small", "undefined_first"]);
    }

    #[test]
    fn test_top_n() {
        let elements = vec![
            element("a", Some(1), "3 MB"),
            element("b", None, "3 MB"),
            element("c", Some(1), "1 MB"),
        ];
        let summary = classify_family_sizes(&elements);

        assert_eq!(summary.top(1).len(), 1);
        assert_eq!(summary.top(1)[0].name.as_deref(), Some("a"));
        // Only two defined rows
        assert_eq!(summary.top(12).len(), 2);
        assert!(summary.top(12).iter().all(|r| r.family_size.is_some()));

        let largest = summary.largest(12);
        assert_eq!(largest.len(), 2);
        assert_eq!(largest[1].rank, 2);
        assert_eq!(largest[1].name.as_deref(), Some("c"));
        assert_relative_eq!(largest[1].family_size_mb, 1.0);
    }

    #[test]
    fn test_empty_input() {
        let summary = classify_family_sizes(&[]);
        assert_eq!(summary.buckets.total(), 0);
        assert_eq!(summary.total_mb, 0.0);
        assert!(summary.top(5).is_empty());
        assert_eq!(summary.buckets.labeled()[0], ("> 5 MB", 0));
    }
}
