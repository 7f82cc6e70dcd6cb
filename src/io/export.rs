//! Export rendered result cards to JSON.
//!
//! The export is the portable record of one batch outcome: per-borrower
//! probability, risk level, recommended action, and derived class, in
//! submitted order. Meant to be easy to consume in spreadsheets or
//! downstream scripts.

use std::fs::File;
use std::path::Path;

use crate::error::AppError;
use crate::render::ResultCard;

/// Write the result cards to a pretty-printed JSON file.
pub fn write_results_json(path: &Path, cards: &[ResultCard]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create results JSON '{}': {e}",
            path.display()
        ))
    })?;

    serde_json::to_writer_pretty(file, cards)
        .map_err(|e| AppError::usage(format!("Failed to write results JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskClass;

    #[test]
    fn written_file_round_trips_as_json_array() {
        let cards = vec![ResultCard {
            borrower_no: 1,
            default_probability: 0.123,
            risk_level: "Low risk".to_string(),
            recommended_action: "Send reminder".to_string(),
            class: RiskClass::Low,
        }];

        let dir = std::env::temp_dir();
        let path = dir.join("creditpath_export_test.json");
        write_results_json(&path, &cards).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let array = value.as_array().expect("export should be a JSON array");
        assert_eq!(array.len(), 1);
        assert_eq!(array[0]["borrower_no"], 1);
        assert_eq!(array[0]["class"], "low");

        let _ = std::fs::remove_file(&path);
    }
}
