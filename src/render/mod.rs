//! View-model construction for results and history.
//!
//! These builders are the render-target boundary: they turn raw service
//! payloads into display-ready rows/cards, and the two surfaces (`report`
//! strings, `tui` widgets) consume them without further interpretation.
//! Each call replaces prior view state wholesale.

use serde::Serialize;

use crate::domain::{LogEntry, Prediction, RiskClass};

/// Placeholder shown when a log entry has no usable borrower identifier.
pub const MISSING_ID: &str = "-";

/// One display card per scored borrower, index-aligned with the submitted
/// batch (`borrower_no` is 1-based; there is no identifier reconciliation).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCard {
    pub borrower_no: usize,
    pub default_probability: f64,
    pub risk_level: String,
    pub recommended_action: String,
    pub class: RiskClass,
}

/// Map predictions to display cards in submission order.
pub fn build_result_cards(predictions: &[Prediction]) -> Vec<ResultCard> {
    predictions
        .iter()
        .enumerate()
        .map(|(i, p)| ResultCard {
            borrower_no: i + 1,
            default_probability: p.default_probability,
            risk_level: p.risk_level.clone(),
            recommended_action: p.recommended_action.clone(),
            class: RiskClass::classify(&p.risk_level),
        })
        .collect()
}

/// One table row per historical prediction, in server-provided order.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    pub timestamp: String,
    pub loan_id: String,
    pub default_probability: f64,
    pub risk_level: String,
    pub recommended_action: String,
    pub class: RiskClass,
}

/// Map log entries to rows, substituting a placeholder when the borrower
/// snapshot or its identifier is absent.
pub fn build_log_rows(entries: &[LogEntry]) -> Vec<LogRow> {
    entries
        .iter()
        .map(|entry| LogRow {
            timestamp: entry.timestamp.clone(),
            loan_id: entry
                .borrower
                .as_ref()
                .and_then(|b| b.loan_id.clone())
                .unwrap_or_else(|| MISSING_ID.to_string()),
            default_probability: entry.default_probability,
            risk_level: entry.risk_level.clone(),
            recommended_action: entry.recommended_action.clone(),
            class: RiskClass::classify(&entry.risk_level),
        })
        .collect()
}
