//! Metric modules for the health check
//!
//! Single-metric evaluation against a rule, element-level summaries, and the
//! dashboard section catalogs that tie metric titles to report keys.

pub mod category_totals;
pub mod element_records;
pub mod evaluation;
pub mod family_size;
pub mod sections;

pub use category_totals::{aggregate_all_categories, aggregate_categories, CategoryTotal, TOP_CATEGORIES};
pub use element_records::{
    extract_element_records, require_element_fields, ElementField, ElementRecord, CATEGORY_FIELDS,
    FAMILY_SIZE_FIELDS, RANKING_FIELDS,
};
pub use evaluation::{evaluate, format_number, EvaluationResult, Indicator, MetricValue, Status};
pub use family_size::{classify_family_sizes, FamilySizeSummary, RankedFamily, SizeBucket, SizeBuckets};
pub use sections::{section_catalog, MetricSource, MetricSpec, SectionCatalog, FILE_SIZE_KEY, SECTIONS};
