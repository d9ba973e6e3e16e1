// Health Check Binary Entry Point
//
// Purpose: Evaluate one exported report directory against a standards file
// Usage: REPORT_DIR=data/sample_report cargo run --bin health_check

use anyhow::{Context, Result};
use revit_health_scorer::{
    EvaluationResult, HealthRecord, HealthReport, HealthScorer, Indicator, MetricError, StandardsDocument,
};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "revit_health_scorer=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Configuration from environment variables
    let report_dir = std::env::var("REPORT_DIR").unwrap_or_else(|_| "data/sample_report".to_string());
    let standards_path = std::env::var("STANDARDS_PATH").unwrap_or_else(|_| "data/standards.json".to_string());
    let format = std::env::var("REPORT_FORMAT").unwrap_or_else(|_| "text".to_string());

    tracing::info!("Configuration:");
    tracing::info!("  REPORT_DIR: {}", report_dir);
    tracing::info!("  STANDARDS_PATH: {}", standards_path);
    tracing::info!("  REPORT_FORMAT: {}", format);

    let standards = StandardsDocument::load(Path::new(&standards_path))?;
    let record = HealthRecord::load_csv_dir(Path::new(&report_dir))?;

    let scorer = HealthScorer::new(standards);
    let report = scorer
        .evaluate_parallel(&record)
        .with_context(|| format!("Failed to evaluate report in {}", report_dir))?;

    match format.as_str() {
        "json" => println!("{}", report.to_json_pretty()?),
        "text" => print_text(&report, scorer.standards().largest_families_count()),
        other => anyhow::bail!("Unknown REPORT_FORMAT '{}' (expected text or json)", other),
    }

    Ok(())
}

fn print_text(report: &HealthReport, n_largest: usize) {
    println!("================================================================================");
    println!(
        "Model Health Check: {}  ({})",
        report.header.project_name.as_deref().unwrap_or("unknown project"),
        report.header.report_date.as_deref().unwrap_or("undated")
    );
    println!("================================================================================");

    for section in &report.sections {
        println!("\n{}", section.name);
        println!("{}", "-".repeat(section.name.len()));
        for metric in &section.metrics {
            match &metric.result {
                Ok(result) => println!("  {}", metric_line(result)),
                Err(err) => println!("  {:<34} unavailable ({})", metric.title, err),
            }
        }
    }

    println!("\nFamily Sizes");
    println!("------------");
    match &report.family_sizes {
        Ok(summary) => {
            for (label, count) in summary.buckets.labeled() {
                println!("  {:<8} {:>6}", label, count);
            }
            println!("  Total: {:.2} MB ({} rows without a size)", summary.total_mb, summary.undefined_count);
        }
        Err(err) => print_unavailable(err),
    }

    println!("\n{} Largest Families", n_largest);
    println!("--------------------");
    match &report.largest_families {
        Ok(families) => {
            for family in families {
                println!(
                    "  {:>2}. {:<40} {:>10.2} MB",
                    family.rank,
                    family.name.as_deref().unwrap_or("(unnamed)"),
                    family.family_size_mb
                );
            }
        }
        Err(err) => print_unavailable(err),
    }

    println!("\nElements by Category");
    println!("--------------------");
    match &report.category_totals {
        Ok(totals) => {
            for total in totals {
                println!("  {:<40} {:>8}", total.category, total.total_count);
            }
        }
        Err(err) => print_unavailable(err),
    }

    let failed = report.failed_metrics();
    if !failed.is_empty() {
        println!("\nUnavailable: {}", failed.join(", "));
    }
}

fn metric_line(result: &EvaluationResult) -> String {
    let marker = match result.indicator {
        Indicator::Warning => "▲",
        Indicator::Favorable => "▼",
        Indicator::None => " ",
    };
    let goal = result.delta_text.as_deref().unwrap_or("");
    format!("{:<34} {:>12} {} {}", result.title, result.value.to_string(), marker, goal)
}

fn print_unavailable(err: &MetricError) {
    println!("  unavailable ({})", err);
}
