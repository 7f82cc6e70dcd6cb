//! Terminal formatting for the non-interactive front-end.
//!
//! Formatting lives in one place so output changes stay localized and the
//! pipeline code never touches presentation.

use crate::form::BorrowerForm;
use crate::render::{LogRow, ResultCard};
use crate::schema::{Registry, ValueKind};

/// Format one block per result card, in submitted order.
pub fn format_result_cards(cards: &[ResultCard]) -> String {
    let mut out = String::new();

    out.push_str("=== creditpath — batch results ===\n");
    for card in cards {
        out.push_str(&format!(
            "Borrower {} [{}]\n",
            card.borrower_no,
            card.class.display_name()
        ));
        out.push_str(&format!(
            "- default probability: {:.3}\n",
            card.default_probability
        ));
        out.push_str(&format!("- risk level: {}\n", card.risk_level));
        out.push_str(&format!("- recommended action: {}\n", card.recommended_action));
        out.push('\n');
    }

    out
}

/// Format the history table, one row per entry in server order.
pub fn format_log_table(rows: &[LogRow]) -> String {
    let mut out = String::new();

    out.push_str("=== creditpath — prediction history ===\n");
    if rows.is_empty() {
        out.push_str("(no entries)\n");
        return out;
    }

    out.push_str(&format!(
        "{:<20} {:<12} {:>6}  {:<12} {}\n",
        "timestamp", "loan_id", "prob", "risk", "action"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:<20} {:<12} {:>6.3}  {:<12} {}\n",
            row.timestamp, row.loan_id, row.default_probability, row.risk_level,
            row.recommended_action
        ));
    }

    out
}

/// Format the field catalog in layout order.
pub fn format_fields(registry: &Registry) -> String {
    let mut out = String::new();

    out.push_str("=== creditpath — field catalog ===\n");
    out.push_str(&format!(
        "{:<22} {:<8} {:<18} {}\n",
        "field", "kind", "default", "domain"
    ));
    for def in registry.fields() {
        let kind = match def.kind {
            ValueKind::Numeric => "number",
            ValueKind::Text => "text",
        };
        let domain = def
            .domain
            .map(|d| d.join(" | "))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<22} {:<8} {:<18} {domain}\n",
            def.name,
            kind,
            def.default.render()
        ));
    }

    out
}

/// List the controls that failed validation, per borrower.
pub fn format_invalid_controls(forms: &[BorrowerForm]) -> String {
    let mut out = String::new();

    for form in forms {
        let names: Vec<&str> = form
            .controls
            .iter()
            .filter(|c| c.invalid)
            .map(|c| c.name.as_str())
            .collect();
        if !names.is_empty() {
            out.push_str(&format!("borrower {}: {}\n", form.index, names.join(", ")));
        }
    }

    out
}
