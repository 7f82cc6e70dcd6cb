//! Shared submission/history pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! collect/validate -> submit batch -> build view models
//!
//! The front-ends then focus on presentation (printing vs widgets).

use crate::api::{ScoringError, ScoringService};
use crate::form::BorrowerForm;
use crate::form::collect::{VALIDATION_MESSAGE, collect_records};
use crate::render::{LogRow, ResultCard, build_log_rows, build_result_cards};

/// Generic text shown on transport failure; diagnostic detail goes to the
/// structured log instead.
pub const TRANSPORT_MESSAGE: &str =
    "Could not reach the scoring service. Please try again.";

/// Outcome of one submission attempt. The batch is atomic: it fully
/// succeeds, is fully blocked before the network, or fully fails.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Blocked before the network; the marked controls show what to fix.
    Validation { message: String },
    /// The request never yielded a usable response. No automatic retry.
    Transport { message: String },
    /// The service reported a structured error; shown verbatim.
    Service { message: String },
    /// Order-aligned display cards, one per submitted borrower.
    Success { cards: Vec<ResultCard> },
}

/// Collect, validate, and (when clean) submit the batch.
///
/// Validation failure marks the offending controls in `forms` and never
/// reaches the service.
pub fn run_submission<S: ScoringService>(
    service: &S,
    identity: &str,
    forms: &mut [BorrowerForm],
) -> SubmitOutcome {
    let outcome = collect_records(forms);
    if outcome.invalid {
        return SubmitOutcome::Validation {
            message: VALIDATION_MESSAGE.to_string(),
        };
    }

    match service.submit_batch(identity, &outcome.records) {
        Ok(predictions) => SubmitOutcome::Success {
            cards: build_result_cards(&predictions),
        },
        Err(ScoringError::Service(message)) => SubmitOutcome::Service { message },
        Err(ScoringError::Transport(detail)) => {
            tracing::warn!(detail = %detail, "submission failed at the transport layer");
            SubmitOutcome::Transport {
                message: TRANSPORT_MESSAGE.to_string(),
            }
        }
    }
}

/// Fetch history rows; independent of any submission state.
pub fn run_log_fetch<S: ScoringService>(
    service: &S,
    identity: &str,
    limit: usize,
) -> Result<Vec<LogRow>, ScoringError> {
    let entries = service.fetch_logs(identity, limit)?;
    Ok(build_log_rows(&entries))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::domain::{BorrowerRecord, LogEntry, Prediction, RiskClass};
    use crate::form::{LOAN_ID_FIELD, generate_forms};
    use crate::schema::Registry;

    /// In-memory stand-in for the scoring service; counts calls and captures
    /// the submitted batch.
    struct FakeService {
        calls: RefCell<usize>,
        submitted: RefCell<Vec<BorrowerRecord>>,
        response: Result<Vec<Prediction>, ScoringError>,
    }

    impl FakeService {
        fn returning(response: Result<Vec<Prediction>, ScoringError>) -> Self {
            Self {
                calls: RefCell::new(0),
                submitted: RefCell::new(Vec::new()),
                response,
            }
        }
    }

    impl ScoringService for FakeService {
        fn submit_batch(
            &self,
            _identity: &str,
            records: &[BorrowerRecord],
        ) -> Result<Vec<Prediction>, ScoringError> {
            *self.calls.borrow_mut() += 1;
            *self.submitted.borrow_mut() = records.to_vec();
            self.response.clone()
        }

        fn fetch_logs(
            &self,
            _identity: &str,
            _limit: usize,
        ) -> Result<Vec<LogEntry>, ScoringError> {
            *self.calls.borrow_mut() += 1;
            Ok(Vec::new())
        }
    }

    fn prediction(prob: f64, level: &str, action: &str) -> Prediction {
        Prediction {
            default_probability: prob,
            risk_level: level.to_string(),
            recommended_action: action.to_string(),
        }
    }

    #[test]
    fn two_borrowers_with_defaults_submit_and_render_in_order() {
        let registry = Registry::standard();
        let mut forms = generate_forms(&registry, 2);
        forms[0].control_mut(LOAN_ID_FIELD).unwrap().set_value("L-001");
        forms[1].control_mut(LOAN_ID_FIELD).unwrap().set_value("L-002");

        let service = FakeService::returning(Ok(vec![
            prediction(0.12, "Low risk", "Send reminder"),
            prediction(0.84, "High risk", "Prioritize collection / restructure loan"),
        ]));

        let outcome = run_submission(&service, "guest", &mut forms);
        let SubmitOutcome::Success { cards } = outcome else {
            panic!("expected success");
        };

        assert_eq!(*service.calls.borrow(), 1);

        // Request body: length 2, numeric fields as JSON numbers.
        let submitted = service.submitted.borrow();
        assert_eq!(submitted.len(), 2);
        let body = serde_json::to_value(&*submitted).unwrap();
        assert_eq!(body[0]["loan_id"], "L-001");
        assert_eq!(body[1]["loan_id"], "L-002");
        assert!(body[0]["loan_amnt"].is_number());
        assert!(body[0]["int_rate"].is_number());
        assert!(body[0]["term"].is_string());

        // Cards mirror the submitted order and carry derived classes.
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].borrower_no, 1);
        assert_eq!(cards[0].class, RiskClass::Low);
        assert_eq!(cards[1].borrower_no, 2);
        assert_eq!(cards[1].class, RiskClass::High);
    }

    #[test]
    fn one_empty_field_blocks_the_whole_batch_with_zero_network_calls() {
        let registry = Registry::standard();
        let mut forms = generate_forms(&registry, 2);
        forms[0].control_mut(LOAN_ID_FIELD).unwrap().set_value("L-001");
        forms[1].control_mut(LOAN_ID_FIELD).unwrap().set_value("L-002");
        forms[1].control_mut("dti").unwrap().set_value("");

        let service = FakeService::returning(Ok(Vec::new()));
        let outcome = run_submission(&service, "guest", &mut forms);

        let SubmitOutcome::Validation { message } = outcome else {
            panic!("expected validation failure");
        };
        assert_eq!(message, VALIDATION_MESSAGE);
        assert_eq!(*service.calls.borrow(), 0, "nothing may reach the network");

        let invalid: Vec<&str> = forms
            .iter()
            .flat_map(|f| f.controls.iter())
            .filter(|c| c.invalid)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(invalid, vec!["dti"], "exactly the empty control is marked");
    }

    #[test]
    fn service_error_is_surfaced_verbatim() {
        let registry = Registry::standard();
        let mut forms = generate_forms(&registry, 1);
        forms[0].control_mut(LOAN_ID_FIELD).unwrap().set_value("L-001");

        let service = FakeService::returning(Err(ScoringError::Service(
            "Please enter valid data for all fields".to_string(),
        )));
        let outcome = run_submission(&service, "guest", &mut forms);

        let SubmitOutcome::Service { message } = outcome else {
            panic!("expected service error");
        };
        assert_eq!(message, "Please enter valid data for all fields");
    }

    #[test]
    fn transport_failure_yields_generic_retry_message() {
        let registry = Registry::standard();
        let mut forms = generate_forms(&registry, 1);
        forms[0].control_mut(LOAN_ID_FIELD).unwrap().set_value("L-001");

        let service = FakeService::returning(Err(ScoringError::Transport(
            "connection refused".to_string(),
        )));
        let outcome = run_submission(&service, "guest", &mut forms);

        let SubmitOutcome::Transport { message } = outcome else {
            panic!("expected transport failure");
        };
        assert_eq!(message, TRANSPORT_MESSAGE);
        assert_eq!(*service.calls.borrow(), 1, "exactly one attempt, no retry");
    }
}
