//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they
//! can be:
//!
//! - assembled in-memory during collection/validation
//! - sent to and received from the scoring service as JSON
//! - rendered by either front-end without further conversion

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A typed value collected from one form control.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Number(v) => serializer.serialize_f64(*v),
            FieldValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// One applicant's complete set of typed field values.
///
/// `values` is schema-ordered; serialization emits a single JSON object whose
/// key set is the schema keys plus `loan_id`, numeric fields as JSON numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct BorrowerRecord {
    pub loan_id: String,
    pub values: Vec<(String, FieldValue)>,
}

impl BorrowerRecord {
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

impl Serialize for BorrowerRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("loan_id", &self.loan_id)?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A single scored prediction, index-aligned with the submitted batch.
///
/// The service echoes extra keys (the borrower, the caller identity); they
/// are ignored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub default_probability: f64,
    pub risk_level: String,
    pub recommended_action: String,
}

/// Risk bucket derived from the free-text risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskClass {
    Low,
    Medium,
    High,
}

impl RiskClass {
    /// Case-insensitive substring classification.
    ///
    /// Anything that mentions neither "low" nor "medium" lands in `High`;
    /// that arm doubles as the fallback for unknown labels.
    pub fn classify(risk_level: &str) -> Self {
        let lower = risk_level.to_lowercase();
        if lower.contains("low") {
            RiskClass::Low
        } else if lower.contains("medium") {
            RiskClass::Medium
        } else {
            RiskClass::High
        }
    }

    /// Stylistic label for display surfaces.
    pub fn display_name(self) -> &'static str {
        match self {
            RiskClass::Low => "low",
            RiskClass::Medium => "medium",
            RiskClass::High => "high",
        }
    }
}

/// One historical prediction as returned by the log backend.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    /// Server-assigned, display-only; never parsed.
    pub timestamp: String,
    #[serde(default)]
    pub borrower: Option<BorrowerSnapshot>,
    pub default_probability: f64,
    pub risk_level: String,
    pub recommended_action: String,
}

/// Partial borrower echo stored alongside a logged prediction.
///
/// Only the identifier is consumed; anything else the backend stored is
/// dropped on deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BorrowerSnapshot {
    #[serde(default)]
    pub loan_id: Option<String>,
}
