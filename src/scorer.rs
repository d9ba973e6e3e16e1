//! Health Scorer - Main coordinator for evaluating a report
//!
//! Resolves every dashboard metric from the Checks table, evaluates it
//! against the standards, and computes the element-level summaries.
//! Includes both sequential and parallel (Rayon) implementations.
//!
//! Failures are isolated per metric: a missing column turns that one entry
//! into an `Err` and the rest of the pass continues.

use crate::data::{HealthRecord, ReportHeader};
use crate::errors::{Diagnostic, HealthCheckError, MetricError};
use crate::metrics::*;
use crate::schema::{ReportSchema, CHECKS_TABLE};
use crate::standards::StandardsDocument;
use crate::utils::{to_megabytes, Lookup, ValueLookup};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub const CATEGORY_TOTALS: &str = "Category Totals";
pub const FAMILY_SIZES: &str = "Family Sizes";
pub const LARGEST_FAMILIES_LIST: &str = "Largest Families";

/// Main health scorer
#[derive(Debug, Clone)]
pub struct HealthScorer {
    standards: StandardsDocument,
    schema: ReportSchema,
}

/// Outcome of one metric; `Err` when the metric could not be computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricOutcome {
    pub title: String,
    pub result: Result<EvaluationResult, MetricError>,
}

/// Evaluated metrics of one dashboard section, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub name: String,
    pub metrics: Vec<MetricOutcome>,
}

impl SectionReport {
    pub fn metric(&self, title: &str) -> Option<&MetricOutcome> {
        self.metrics.iter().find(|m| m.title == title)
    }
}

/// Full evaluation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub header: ReportHeader,
    pub sections: Vec<SectionReport>,
    pub category_totals: Result<Vec<CategoryTotal>, MetricError>,
    pub family_sizes: Result<FamilySizeSummary, MetricError>,
    pub largest_families: Result<Vec<RankedFamily>, MetricError>,
}

impl HealthReport {
    pub fn section(&self, name: &str) -> Option<&SectionReport> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Titles of every entry that could not be computed
    pub fn failed_metrics(&self) -> Vec<String> {
        let mut failed: Vec<String> = self
            .sections
            .iter()
            .flat_map(|section| section.metrics.iter())
            .filter(|metric| metric.result.is_err())
            .map(|metric| metric.title.clone())
            .collect();

        if self.category_totals.is_err() {
            failed.push(CATEGORY_TOTALS.to_string());
        }
        if self.family_sizes.is_err() {
            failed.push(FAMILY_SIZES.to_string());
        }
        if self.largest_families.is_err() {
            failed.push(LARGEST_FAMILIES_LIST.to_string());
        }
        failed
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Per-pass lookups, built once and shared by every section
struct PassContext {
    checks: Result<ValueLookup, MetricError>,
    file_sizes: Result<ValueLookup, MetricError>,
    family_sizes: Result<FamilySizeSummary, MetricError>,
}

impl HealthScorer {
    /// Scorer with the default report column mapping
    pub fn new(standards: StandardsDocument) -> Self {
        Self::with_schema(standards, ReportSchema::default())
    }

    pub fn with_schema(standards: StandardsDocument, schema: ReportSchema) -> Self {
        Self { standards, schema }
    }

    pub fn standards(&self) -> &StandardsDocument {
        &self.standards
    }

    pub fn schema(&self) -> &ReportSchema {
        &self.schema
    }

    /// Evaluate every section and element summary
    ///
    /// # Errors
    /// `MissingTable` if the Checks table has no columns at all.
    pub fn evaluate(&self, record: &HealthRecord) -> Result<HealthReport, HealthCheckError> {
        let context = self.prepare(record)?;

        let sections: Vec<SectionReport> = SECTIONS
            .iter()
            .map(|catalog| self.evaluate_catalog(catalog, &context))
            .collect();

        Ok(self.assemble(record, sections, context))
    }

    /// Evaluate the report with sections computed IN PARALLEL
    ///
    /// Same result as [`HealthScorer::evaluate`]. Lookups are shared
    /// read-only across the Rayon pool.
    pub fn evaluate_parallel(&self, record: &HealthRecord) -> Result<HealthReport, HealthCheckError> {
        let context = self.prepare(record)?;

        let sections: Vec<SectionReport> = SECTIONS
            .par_iter()
            .map(|catalog| self.evaluate_catalog(catalog, &context))
            .collect();

        Ok(self.assemble(record, sections, context))
    }

    /// Evaluate a single dashboard section by name
    pub fn evaluate_section(&self, record: &HealthRecord, section: &str) -> Result<SectionReport, HealthCheckError> {
        let catalog = section_catalog(section).ok_or_else(|| HealthCheckError::UnknownSection {
            name: section.to_string(),
        })?;
        let context = self.prepare(record)?;
        Ok(self.evaluate_catalog(catalog, &context))
    }

    fn prepare(&self, record: &HealthRecord) -> Result<PassContext, HealthCheckError> {
        if record.checks.width() == 0 {
            return Err(HealthCheckError::MissingTable {
                name: CHECKS_TABLE.to_string(),
            });
        }

        let resolved = self.schema.checks.resolve(&record.checks);
        let index = |value_column: &Result<String, MetricError>| -> Result<ValueLookup, MetricError> {
            let key = resolved.key.clone()?;
            let value = value_column.clone()?;
            ValueLookup::new(&record.checks, &key, &value, CHECKS_TABLE)
        };
        let checks = index(&resolved.value);
        let file_sizes = index(&resolved.file_size);

        for err in [&checks, &file_sizes].into_iter().filter_map(|r| r.as_ref().err()) {
            tracing::warn!("{}", err);
        }

        let family_sizes = self.element_records(record, FAMILY_SIZE_FIELDS).map(|records| classify_family_sizes(&records));

        Ok(PassContext {
            checks,
            file_sizes,
            family_sizes,
        })
    }

    fn element_records(&self, record: &HealthRecord, required: &[ElementField]) -> Result<Vec<ElementRecord>, MetricError> {
        extract_element_records(&record.elements, &self.schema.elements, required)
    }

    fn evaluate_catalog(&self, catalog: &SectionCatalog, context: &PassContext) -> SectionReport {
        let metrics = catalog
            .metrics
            .iter()
            .map(|spec| {
                let result = self.resolve(spec.source, context).map(|(value, diagnostic)| {
                    evaluate(spec.title, value, self.standards.rule(catalog.name, spec.title))
                        .with_value_diagnostic(diagnostic)
                });
                if let Err(err) = &result {
                    tracing::debug!("{} / {} unavailable: {}", catalog.name, spec.title, err);
                }
                MetricOutcome {
                    title: spec.title.to_string(),
                    result,
                }
            })
            .collect();

        SectionReport {
            name: catalog.name.to_string(),
            metrics,
        }
    }

    /// Value of one metric, with the reason it degraded if it did
    fn resolve(&self, source: MetricSource, context: &PassContext) -> Result<(MetricValue, Option<Diagnostic>), MetricError> {
        match source {
            MetricSource::CheckKey(key) => {
                let checks = context.checks.as_ref().map_err(Clone::clone)?;
                Ok(match checks.lookup(key) {
                    Lookup::Found(cell) => (MetricValue::from_cell(cell), None),
                    Lookup::NotFound => (MetricValue::Undefined, Some(Diagnostic::KeyNotFound)),
                })
            }
            MetricSource::FileSizeCell => {
                let file_sizes = context.file_sizes.as_ref().map_err(Clone::clone)?;
                Ok(match file_sizes.lookup(FILE_SIZE_KEY) {
                    Lookup::Found(Some(text)) if !text.trim().is_empty() => match to_megabytes(text) {
                        Some(mb) => (MetricValue::Number(mb), None),
                        None => (MetricValue::Text(text.trim().to_string()), Some(Diagnostic::UnitParseFailure)),
                    },
                    Lookup::Found(_) => (MetricValue::Undefined, None),
                    Lookup::NotFound => (MetricValue::Undefined, Some(Diagnostic::KeyNotFound)),
                })
            }
            MetricSource::FamiliesOver5Mb => {
                let summary = context.family_sizes.as_ref().map_err(Clone::clone)?;
                Ok((MetricValue::Number(summary.families_over_5mb() as f64), None))
            }
            MetricSource::TotalFamilyMb => {
                let summary = context.family_sizes.as_ref().map_err(Clone::clone)?;
                Ok((MetricValue::Number(summary.total_mb), None))
            }
        }
    }

    fn assemble(&self, record: &HealthRecord, sections: Vec<SectionReport>, context: PassContext) -> HealthReport {
        let category_totals = self
            .element_records(record, CATEGORY_FIELDS)
            .map(|records| aggregate_categories(&records));

        let n_largest = self.standards.largest_families_count();
        let largest_families = require_element_fields(&record.elements, &self.schema.elements, RANKING_FIELDS)
            .and_then(|()| context.family_sizes.clone())
            .map(|summary| summary.largest(n_largest));

        let report = HealthReport {
            header: record.header(&self.schema.files),
            sections,
            category_totals,
            family_sizes: context.family_sizes,
            largest_families,
        };

        let n_metrics: usize = report.sections.iter().map(|s| s.metrics.len()).sum();
        let failed = report.failed_metrics();
        tracing::info!(
            "Evaluated {} metrics across {} sections ({} unavailable)",
            n_metrics,
            report.sections.len(),
            failed.len()
        );

        report
    }
}
