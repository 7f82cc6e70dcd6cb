//! Typed collection and batch validation of rendered sub-forms.
//!
//! The scan never aborts early: every control of every sub-form is visited so
//! that all offending controls get marked, not just the first. Validation is
//! all-or-nothing at the batch level; one bad control anywhere blocks the
//! whole submission.

use crate::domain::{BorrowerRecord, FieldValue};

use super::{BorrowerForm, LOAN_ID_FIELD, Widget};

/// Single user-visible summary shown when validation blocks a batch.
pub const VALIDATION_MESSAGE: &str =
    "Please fill in the highlighted fields; all fields are required.";

/// Result of scanning every control of every sub-form.
#[derive(Debug, Clone)]
pub struct CollectOutcome {
    /// Index-aligned with the sub-forms. Present even when invalid, but a
    /// flagged batch must never be submitted.
    pub records: Vec<BorrowerRecord>,
    /// Raised if any control anywhere failed validation.
    pub invalid: bool,
}

/// Read the current state of each sub-form into a typed record.
///
/// Per control, in layout order: trim the textual value; an empty value marks
/// the control invalid and raises the batch flag. Numeric-classified values
/// must parse to a finite float; everything else is kept as text.
pub fn collect_records(forms: &mut [BorrowerForm]) -> CollectOutcome {
    let mut invalid = false;
    let mut records = Vec::with_capacity(forms.len());

    for form in forms.iter_mut() {
        let mut loan_id = String::new();
        let mut values = Vec::with_capacity(form.controls.len().saturating_sub(1));

        for control in form.controls.iter_mut() {
            let trimmed = control.value.trim();
            if trimmed.is_empty() {
                control.invalid = true;
                invalid = true;
                continue;
            }

            if matches!(control.widget, Widget::Numeric { .. }) {
                match trimmed.parse::<f64>() {
                    Ok(v) if v.is_finite() => {
                        control.invalid = false;
                        values.push((control.name.clone(), FieldValue::Number(v)));
                    }
                    _ => {
                        control.invalid = true;
                        invalid = true;
                    }
                }
            } else if control.name == LOAN_ID_FIELD {
                control.invalid = false;
                loan_id = trimmed.to_string();
            } else {
                control.invalid = false;
                values.push((control.name.clone(), FieldValue::Text(trimmed.to_string())));
            }
        }

        records.push(BorrowerRecord { loan_id, values });
    }

    CollectOutcome { records, invalid }
}
