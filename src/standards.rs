//! Organizational standards configuration
//!
//! Persisted as JSON: section → metric title → `{"Value": n, "Consider": b}`.
//! Rules are read leniently. A rule that cannot be understood becomes
//! informational (`consider = false`) instead of failing the document.

use crate::errors::HealthCheckError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const GENERAL_STATISTICS: &str = "General Statistics";
pub const PERFORMANCE_IMPACTS: &str = "Performance Impacts";
pub const BUILDING_SYSTEMS: &str = "Building Systems";
pub const FILE_SIZE_BREAKTHROUGH: &str = "File Size Breakthrough";

/// Rule title holding the length of the largest-families list
pub const LARGEST_FAMILIES: &str = "Largest Families";

/// Length of the largest-families list when the standards leave it unset
pub const DEFAULT_LARGEST_FAMILIES: usize = 12;

/// Threshold rule for one metric
///
/// `consider = false` makes the metric informational. With `consider = true`
/// the metric is compared against `value`; exceeding it is bad.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct StandardRule {
    pub value: Option<f64>,
    pub consider: bool,
    /// Set when the persisted entry was unusable
    pub malformed: bool,
    /// Entry as read, kept for malformed rules so export writes it back unchanged
    pub raw: Option<Value>,
}

impl StandardRule {
    pub fn new(value: f64, consider: bool) -> Self {
        Self {
            value: Some(value),
            consider,
            malformed: false,
            raw: None,
        }
    }

    /// Threshold to compare against, if comparison is active
    pub fn active_threshold(&self) -> Option<f64> {
        if self.consider {
            self.value
        } else {
            None
        }
    }
}

fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => crate::utils::parse_number(s),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn lenient_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" | "" => Some(false),
            _ => None,
        },
        Value::Null => Some(false),
        _ => None,
    }
}

impl From<Value> for StandardRule {
    fn from(raw: Value) -> Self {
        let Value::Object(fields) = &raw else {
            tracing::debug!("Standards entry is not an object: {}", raw);
            return Self {
                value: None,
                consider: false,
                malformed: true,
                raw: Some(raw),
            };
        };

        let mut malformed = false;

        let value = match fields.get("Value") {
            None | Some(Value::Null) => None,
            Some(v) => {
                let parsed = lenient_number(v);
                if parsed.is_none() {
                    tracing::debug!("Standards 'Value' is not numeric: {}", v);
                    malformed = true;
                }
                parsed
            }
        };

        let consider = match fields.get("Consider") {
            None => false,
            Some(v) => lenient_bool(v).unwrap_or_else(|| {
                tracing::debug!("Standards 'Consider' is not a flag: {}", v);
                malformed = true;
                false
            }),
        };

        Self {
            value,
            consider,
            malformed,
            raw: malformed.then_some(raw),
        }
    }
}

impl Serialize for StandardRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let (true, Some(raw)) = (self.malformed, &self.raw) {
            return raw.serialize(serializer);
        }

        let mut fields = Map::new();
        let value = match self.value {
            // Whole thresholds persist as integers, as the standards editor writes them
            Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Value::from(v as i64),
            Some(v) => Value::from(v),
            None => Value::Null,
        };
        fields.insert("Value".to_string(), value);
        fields.insert("Consider".to_string(), Value::Bool(self.consider));
        Value::Object(fields).serialize(serializer)
    }
}

/// Metric title → rule for one dashboard section
pub type SectionStandards = BTreeMap<String, StandardRule>;

/// All sections' standards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardsDocument {
    #[serde(flatten)]
    sections: BTreeMap<String, SectionStandards>,
}

impl StandardsDocument {
    /// Load standards from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read standards file: {:?}", path))?;

        Self::from_json_str(&contents)
            .with_context(|| format!("Failed to parse standards file: {:?}", path))
    }

    /// Parse standards from JSON text (an uploaded document)
    pub fn from_json_str(json: &str) -> Result<Self, HealthCheckError> {
        serde_json::from_str(json).map_err(|e| HealthCheckError::InvalidStandards {
            message: e.to_string(),
        })
    }

    /// Persisted form, pretty-printed for download
    pub fn to_json_pretty(&self) -> Result<String, HealthCheckError> {
        serde_json::to_string_pretty(self).map_err(|e| HealthCheckError::InvalidStandards {
            message: e.to_string(),
        })
    }

    pub fn section(&self, section: &str) -> Option<&SectionStandards> {
        self.sections.get(section)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn rule(&self, section: &str, title: &str) -> Option<&StandardRule> {
        self.sections.get(section)?.get(title)
    }

    /// Insert or replace a rule, creating the section if needed
    pub fn set_rule(&mut self, section: &str, title: &str, rule: StandardRule) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(title.to_string(), rule);
    }

    /// Number of families in the largest-families ranking
    pub fn largest_families_count(&self) -> usize {
        match self
            .rule(FILE_SIZE_BREAKTHROUGH, LARGEST_FAMILIES)
            .and_then(|rule| rule.value)
        {
            Some(n) if n >= 1.0 => n as usize,
            _ => DEFAULT_LARGEST_FAMILIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "General Statistics": {
            "File Size": {"Value": 300, "Consider": true},
            "Number of Levels": {"Value": 12, "Consider": false}
        },
        "Performance Impacts": {
            "Errors & Warnings": {"Value": "1,000", "Consider": 1},
            "Purgeable Elements": {"Consider": true},
            "Unplaced Rooms": {"Value": 0}
        },
        "File Size Breakthrough": {
            "Largest Families": {"Value": 8, "Consider": false}
        }
    }"#;

    #[test]
    fn test_parse_rules() {
        let doc = StandardsDocument::from_json_str(SAMPLE).unwrap();

        assert_eq!(
            doc.rule(GENERAL_STATISTICS, "File Size"),
            Some(&StandardRule::new(300.0, true))
        );
        assert_eq!(
            doc.rule(PERFORMANCE_IMPACTS, "Errors & Warnings"),
            Some(&StandardRule::new(1000.0, true))
        );
    }

    #[test]
    fn test_missing_keys_default() {
        let doc = StandardsDocument::from_json_str(SAMPLE).unwrap();

        // Missing Value: comparison is skipped even though Consider is set
        let purgeable = doc.rule(PERFORMANCE_IMPACTS, "Purgeable Elements").unwrap();
        assert!(purgeable.consider);
        assert_eq!(purgeable.active_threshold(), None);

        // Missing Consider defaults to false
        let unplaced = doc.rule(PERFORMANCE_IMPACTS, "Unplaced Rooms").unwrap();
        assert!(!unplaced.consider);
        assert!(!unplaced.malformed);
    }

    #[test]
    fn test_malformed_entries_never_fail() {
        let json = r#"{
            "Building Systems": {
                "Mirrored Elements": 5,
                "Unconnected Pipe": {"Value": "lots", "Consider": true},
                "Unconnected Ducts": {"Value": 3, "Consider": "maybe"}
            }
        }"#;
        let doc = StandardsDocument::from_json_str(json).unwrap();

        let mirrored = doc.rule(BUILDING_SYSTEMS, "Mirrored Elements").unwrap();
        assert!(mirrored.malformed);
        assert!(!mirrored.consider);

        let pipe = doc.rule(BUILDING_SYSTEMS, "Unconnected Pipe").unwrap();
        assert!(pipe.malformed);
        assert_eq!(pipe.active_threshold(), None);

        let ducts = doc.rule(BUILDING_SYSTEMS, "Unconnected Ducts").unwrap();
        assert!(ducts.malformed);
        assert!(!ducts.consider);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = StandardsDocument::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, HealthCheckError::InvalidStandards { .. }));
    }

    #[test]
    fn test_round_trip_persisted_form() {
        let doc = StandardsDocument::from_json_str(SAMPLE).unwrap();
        let json = doc.to_json_pretty().unwrap();

        assert!(json.contains("\"Consider\": true"));
        assert!(json.contains("\"Value\": 300"));

        let reparsed = StandardsDocument::from_json_str(&json).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_malformed_entries_export_unchanged() {
        let json = r#"{
            "Building Systems": {
                "Mirrored Elements": 5,
                "Unconnected Ducts": {"Value": 3, "Consider": "maybe"}
            }
        }"#;
        let doc = StandardsDocument::from_json_str(json).unwrap();
        let exported = doc.to_json_pretty().unwrap();
        assert!(exported.contains("\"Consider\": \"maybe\""));

        let reloaded = StandardsDocument::from_json_str(&exported).unwrap();
        assert!(reloaded.rule(BUILDING_SYSTEMS, "Mirrored Elements").unwrap().malformed);
        assert!(reloaded.rule(BUILDING_SYSTEMS, "Unconnected Ducts").unwrap().malformed);
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn test_set_rule_and_largest_families() {
        let mut doc = StandardsDocument::default();
        assert_eq!(doc.largest_families_count(), DEFAULT_LARGEST_FAMILIES);

        doc.set_rule(FILE_SIZE_BREAKTHROUGH, LARGEST_FAMILIES, StandardRule::new(5.0, false));
        assert_eq!(doc.largest_families_count(), 5);

        doc.set_rule(FILE_SIZE_BREAKTHROUGH, LARGEST_FAMILIES, StandardRule::new(0.0, false));
        assert_eq!(doc.largest_families_count(), DEFAULT_LARGEST_FAMILIES);

        let from_sample = StandardsDocument::from_json_str(SAMPLE).unwrap();
        assert_eq!(from_sample.largest_families_count(), 8);
        assert_eq!(from_sample.section_names().count(), 3);
    }
}
