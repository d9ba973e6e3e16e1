// Health Check Integration Tests
//
// Purpose: Evaluate exported CSV reports end to end against a standards file
// Run with: cargo test --test health_check_integration_tests

use approx::assert_relative_eq;
use revit_health_scorer::{
    Diagnostic, EvaluationResult, HealthCheckError, HealthRecord, HealthReport, HealthScorer, Indicator,
    MetricValue, StandardRule, StandardsDocument, Status,
};
use std::path::{Path, PathBuf};

fn manifest_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn standards() -> StandardsDocument {
    StandardsDocument::load(&manifest_path("data/standards.json")).expect("standards file loads")
}

fn fixture_report() -> HealthReport {
    let record = HealthRecord::load_csv_dir(&manifest_path("tests/fixtures/report")).expect("fixture loads");
    HealthScorer::new(standards()).evaluate(&record).expect("evaluation succeeds")
}

fn metric<'a>(report: &'a HealthReport, section: &str, title: &str) -> &'a EvaluationResult {
    report
        .section(section)
        .and_then(|s| s.metric(title))
        .and_then(|m| m.result.as_ref().ok())
        .unwrap_or_else(|| panic!("{} / {} should be evaluated", section, title))
}

// =========================================================================
// Section 1: Ingestion
// =========================================================================

#[test]
fn test_header_from_files_table() {
    let report = fixture_report();

    assert_eq!(report.header.report_date.as_deref(), Some("2025-02-14"));
    assert_eq!(report.header.project_name.as_deref(), Some("Harbor_Clinic_ARCH"));
}

#[test]
fn test_missing_elements_file_is_fatal() {
    let err = HealthRecord::load_csv_dir(&manifest_path("tests/fixtures/missing_elements")).unwrap_err();

    match err.downcast_ref::<HealthCheckError>() {
        Some(HealthCheckError::MissingTable { name }) => assert_eq!(name, "Elements"),
        other => panic!("expected MissingTable, got {:?}", other),
    }
}

// =========================================================================
// Section 2: Dashboard sections
// =========================================================================

#[test]
fn test_file_size_normalized_to_megabytes() {
    let report = fixture_report();
    let file_size = metric(&report, "General Statistics", "File Size");

    assert_relative_eq!(file_size.value.as_number().unwrap(), 286.512, epsilon = 1e-9);
    assert_eq!(file_size.status, Status::WithinStandard);
    assert_eq!(file_size.indicator, Indicator::Favorable);
    assert_eq!(file_size.delta_text.as_deref(), Some("Goal: 300"));
}

#[test]
fn test_year_tolerant_keys() {
    let report = fixture_report();

    // Catalog keys say 2024; the report labels say 2025
    let total = metric(&report, "General Statistics", "Total Element Count");
    assert_eq!(total.value, MetricValue::Number(412_907.0));

    let annotative = metric(&report, "General Statistics", "Annotative Elements");
    assert_eq!(annotative.value, MetricValue::Number(24_787.0));
    assert_eq!(annotative.status, Status::Informational);
}

#[test]
fn test_threshold_classification() {
    let report = fixture_report();

    let warnings = metric(&report, "Performance Impacts", "Errors & Warnings");
    assert_eq!(warnings.status, Status::ExceedsStandard);
    assert_eq!(warnings.indicator, Indicator::Warning);
    assert_eq!(warnings.delta_text.as_deref(), Some("Goal: 500"));

    let duplicates = metric(&report, "Performance Impacts", "Duplicate Modeled Elements");
    assert_eq!(duplicates.status, Status::WithinStandard);
    assert_eq!(duplicates.indicator, Indicator::None);

    let styles = metric(&report, "Building Systems", "Non-native Object Styles");
    assert_eq!(styles.status, Status::Informational);
    assert_eq!(styles.delta_text, None);
}

#[test]
fn test_non_numeric_value_degrades() {
    let report = fixture_report();
    let electrical = metric(&report, "Building Systems", "Unconnected Electrical");

    assert_eq!(electrical.value, MetricValue::Text("N/A".into()));
    assert_eq!(electrical.status, Status::Informational);
    assert_eq!(electrical.diagnostic, Some(Diagnostic::NonNumericValue));
}

#[test]
fn test_every_catalog_metric_reported() {
    let report = fixture_report();

    let sizes: Vec<usize> = report.sections.iter().map(|s| s.metrics.len()).collect();
    assert_eq!(sizes, vec![11, 7, 5, 4]);
    assert!(report.failed_metrics().is_empty());
}

// =========================================================================
// Section 3: Element summaries
// =========================================================================

#[test]
fn test_family_size_breakdown() {
    let report = fixture_report();
    let summary = report.family_sizes.as_ref().unwrap();

    assert_eq!(summary.buckets.over_5mb, 2);
    assert_eq!(summary.buckets.from_2_to_5mb, 1);
    assert_eq!(summary.buckets.from_1_to_2mb, 1);
    assert_eq!(summary.buckets.at_most_1mb, 1);
    assert_eq!(summary.undefined_count, 2);
    assert_relative_eq!(summary.total_mb, 18.266, epsilon = 1e-9);

    let over_5 = metric(&report, "File Size Breakthrough", "Families over 5 MB");
    assert_eq!(over_5.value, MetricValue::Number(2.0));
    assert_eq!(over_5.status, Status::ExceedsStandard);

    let total_mb = metric(&report, "File Size Breakthrough", "Total MB of Families");
    assert_eq!(total_mb.indicator, Indicator::Favorable);
}

#[test]
fn test_largest_families_ranking() {
    let report = fixture_report();
    let largest = report.largest_families.as_ref().unwrap();

    // Twelve requested, five rows have a defined size
    let names: Vec<&str> = largest.iter().filter_map(|f| f.name.as_deref()).collect();
    assert_eq!(
        names,
        vec!["Entry Canopy", "Reception Desk", "Task Chair", "Door - Single Flush", "Window - Fixed"]
    );
    assert_relative_eq!(largest[0].family_size_mb, 7.416, epsilon = 1e-9);
}

#[test]
fn test_largest_families_count_from_standards() {
    let record = HealthRecord::load_csv_dir(&manifest_path("tests/fixtures/report")).unwrap();
    let mut standards = standards();
    standards.set_rule("File Size Breakthrough", "Largest Families", StandardRule::new(3.0, false));

    let report = HealthScorer::new(standards).evaluate(&record).unwrap();
    assert_eq!(report.largest_families.unwrap().len(), 3);
}

#[test]
fn test_category_totals() {
    let report = fixture_report();
    let totals = report.category_totals.as_ref().unwrap();

    let pairs: Vec<(&str, i64)> = totals.iter().map(|t| (t.category.as_str(), t.total_count)).collect();
    assert_eq!(
        pairs,
        vec![("Furniture", 12), ("Doors", 5), ("Windows", 4), ("Site", 3), ("Generic Models", 1)]
    );
}

// =========================================================================
// Section 4: Output
// =========================================================================

#[test]
fn test_json_output() {
    let report = fixture_report();
    let json = report.to_json_pretty().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["header"]["project_name"], "Harbor_Clinic_ARCH");
    assert_eq!(value["sections"].as_array().unwrap().len(), 4);
    assert!(value["category_totals"]["Ok"].is_array());
    assert_eq!(value["sections"][1]["metrics"][0]["result"]["Ok"]["status"], "ExceedsStandard");
}

#[test]
fn test_parallel_evaluation_matches() {
    let record = HealthRecord::load_csv_dir(&manifest_path("tests/fixtures/report")).unwrap();
    let scorer = HealthScorer::new(standards());

    assert_eq!(scorer.evaluate(&record).unwrap(), scorer.evaluate_parallel(&record).unwrap());
}
