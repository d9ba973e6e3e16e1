//! Standards evaluation for a single metric
//!
//! Compares a resolved metric value against its rule. The direction is
//! fixed: above the threshold is bad, at or below is within standard, and
//! strictly below is flagged as favorable. This holds for every metric,
//! including counts where more might be harmless.

use crate::errors::Diagnostic;
use crate::standards::StandardRule;
use crate::utils::parse_number;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved value of a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetricValue {
    Number(f64),
    /// Present but not numeric; shown as-is, never compared
    Text(String),
    Undefined,
}

impl MetricValue {
    /// Interpret a table cell: numbers (thousands separators allowed) or text
    pub fn from_cell(cell: Option<&str>) -> Self {
        match cell {
            None => MetricValue::Undefined,
            Some(text) if text.trim().is_empty() => MetricValue::Undefined,
            Some(text) => match parse_number(text) {
                Some(n) => MetricValue::Number(n),
                None => MetricValue::Text(text.trim().to_string()),
            },
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, MetricValue::Undefined)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => f.write_str(&format_number(*n)),
            MetricValue::Text(text) => f.write_str(text),
            MetricValue::Undefined => f.write_str("n/a"),
        }
    }
}

/// Whole numbers without a fractional part, others to two decimals
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        format!("{:.2}", n)
    }
}

/// Classification against the standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// No comparison performed
    Informational,
    WithinStandard,
    ExceedsStandard,
}

/// Display hint accompanying the status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Indicator {
    None,
    /// Above the goal: warning styling, upward arrow
    Warning,
    /// Below the goal: favorable styling, downward arrow
    Favorable,
}

/// Evaluation of one metric against its rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub title: String,
    pub value: MetricValue,
    /// Threshold from the rule, if it has one
    pub standard: Option<f64>,
    pub status: Status,
    pub indicator: Indicator,
    /// "Goal: {standard}" whenever a comparison was made
    pub delta_text: Option<String>,
    pub diagnostic: Option<Diagnostic>,
}

impl EvaluationResult {
    fn informational(title: &str, value: MetricValue, standard: Option<f64>, diagnostic: Option<Diagnostic>) -> Self {
        Self {
            title: title.to_string(),
            value,
            standard,
            status: Status::Informational,
            indicator: Indicator::None,
            delta_text: None,
            diagnostic,
        }
    }

    /// Record why the value itself degraded; takes precedence over rule notes
    pub fn with_value_diagnostic(mut self, diagnostic: Option<Diagnostic>) -> Self {
        if diagnostic.is_some() {
            self.diagnostic = diagnostic;
        }
        self
    }

    pub fn is_compared(&self) -> bool {
        self.status != Status::Informational
    }
}

/// Evaluate `value` against `rule`
///
/// Never fails: undefined or non-numeric values, missing rules, and malformed
/// rules all produce an informational result.
pub fn evaluate(title: &str, value: MetricValue, rule: Option<&StandardRule>) -> EvaluationResult {
    let Some(rule) = rule else {
        tracing::debug!("No standard configured for '{}'", title);
        return EvaluationResult::informational(title, value, None, Some(Diagnostic::MissingStandard));
    };

    if rule.malformed {
        return EvaluationResult::informational(title, value, rule.value, Some(Diagnostic::MalformedStandard));
    }

    let Some(threshold) = rule.active_threshold() else {
        // Consider set without a Value: nothing to compare against
        let diagnostic = rule.consider.then_some(Diagnostic::MalformedStandard);
        return EvaluationResult::informational(title, value, rule.value, diagnostic);
    };

    let raw = match &value {
        MetricValue::Number(n) => *n,
        MetricValue::Text(text) => {
            tracing::debug!("'{}' has non-numeric value '{}'", title, text);
            return EvaluationResult::informational(title, value, Some(threshold), Some(Diagnostic::NonNumericValue));
        }
        MetricValue::Undefined => {
            return EvaluationResult::informational(title, value, Some(threshold), None);
        }
    };

    // Whole-number comparison, both sides truncated (in f64, no i64 saturation)
    let raw_whole = raw.trunc();
    let goal_whole = threshold.trunc();

    let (status, indicator) = if raw_whole == goal_whole {
        (Status::WithinStandard, Indicator::None)
    } else if raw_whole > goal_whole {
        (Status::ExceedsStandard, Indicator::Warning)
    } else {
        (Status::WithinStandard, Indicator::Favorable)
    };

    EvaluationResult {
        title: title.to_string(),
        value,
        standard: Some(threshold),
        status,
        indicator,
        delta_text: Some(format!("Goal: {}", format_number_plain(threshold))),
        diagnostic: None,
    }
}

/// Threshold as written in the standards: whole values without decimals
fn format_number_plain(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
