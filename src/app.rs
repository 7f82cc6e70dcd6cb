//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads configuration and initializes logging
//! - parses CLI arguments
//! - dispatches to the TUI or the non-interactive commands
//! - wires the HTTP client into the shared submission pipeline

use clap::Parser;

use crate::api::HttpScoringClient;
use crate::cli::{Command, FieldOverride, LogsArgs, ScoreArgs};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::form::{BorrowerForm, LOAN_ID_FIELD, Widget, generate_forms};
use crate::schema::Registry;

pub mod pipeline;

use pipeline::SubmitOutcome;

/// Entry point for the `creditpath` binary.
pub fn run() -> Result<(), AppError> {
    // We want `creditpath` and `creditpath -n 3` to behave like
    // `creditpath tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while keeping the bare binary interactive.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let config = AppConfig::load();
    crate::telemetry::init(&config.log_filter)?;

    match cli.command {
        Command::Tui(args) => crate::tui::run(&config, args),
        Command::Score(args) => handle_score(&config, args),
        Command::Logs(args) => handle_logs(&config, args),
        Command::Fields => handle_fields(),
    }
}

fn handle_score(config: &AppConfig, args: ScoreArgs) -> Result<(), AppError> {
    let registry = Registry::standard();
    let mut forms = generate_forms(&registry, args.loan_ids.len());
    for (form, loan_id) in forms.iter_mut().zip(&args.loan_ids) {
        if let Some(control) = form.control_mut(LOAN_ID_FIELD) {
            control.set_value(loan_id);
        }
    }

    for spec in &args.sets {
        let field_override = crate::cli::parse_set(spec)?;
        apply_override(&mut forms, &field_override)?;
    }

    let client = HttpScoringClient::new(&config.api_url);
    match pipeline::run_submission(&client, &config.identity, &mut forms) {
        SubmitOutcome::Validation { message } => {
            eprintln!("{message}");
            eprint!("{}", crate::report::format_invalid_controls(&forms));
            Err(AppError::usage("Validation failed; nothing was submitted."))
        }
        SubmitOutcome::Transport { message } | SubmitOutcome::Service { message } => {
            Err(AppError::runtime(message))
        }
        SubmitOutcome::Success { cards } => {
            print!("{}", crate::report::format_result_cards(&cards));
            if let Some(path) = &args.export {
                crate::io::export::write_results_json(path, &cards)?;
            }
            Ok(())
        }
    }
}

fn handle_logs(config: &AppConfig, args: LogsArgs) -> Result<(), AppError> {
    let client = HttpScoringClient::new(&config.api_url);
    let rows = pipeline::run_log_fetch(&client, &config.identity, args.limit)
        .map_err(|e| AppError::runtime(e.to_string()))?;
    print!("{}", crate::report::format_log_table(&rows));
    Ok(())
}

fn handle_fields() -> Result<(), AppError> {
    let registry = Registry::standard();
    print!("{}", crate::report::format_fields(&registry));
    Ok(())
}

/// Apply one `--set` override to the targeted form(s).
///
/// Selection controls only accept values from their declared domain, so an
/// override can never smuggle an out-of-domain value past validation.
fn apply_override(forms: &mut [BorrowerForm], o: &FieldOverride) -> Result<(), AppError> {
    let targets: Vec<usize> = match o.borrower {
        Some(idx) => {
            if idx > forms.len() {
                return Err(AppError::usage(format!(
                    "--set targets borrower {idx}, but only {} were requested.",
                    forms.len()
                )));
            }
            vec![idx - 1]
        }
        None => (0..forms.len()).collect(),
    };

    for target in targets {
        let control = forms[target].control_mut(&o.field).ok_or_else(|| {
            AppError::usage(format!("Unknown field '{}' in --set.", o.field))
        })?;
        if let Widget::Select { options, .. } = &control.widget {
            if !options.iter().any(|opt| *opt == o.value) {
                return Err(AppError::usage(format!(
                    "Value '{}' is not allowed for '{}'; choose one of: {}.",
                    o.value,
                    o.field,
                    options.join(", ")
                )));
            }
        }
        control.set_value(o.value.clone());
    }

    Ok(())
}

/// Rewrite argv so `creditpath` defaults to `creditpath tui`.
///
/// Rules:
/// - `creditpath`                      -> `creditpath tui`
/// - `creditpath -n 3 ...`             -> `creditpath tui -n 3 ...`
/// - `creditpath --help/--version/-h`  -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "score" | "logs" | "fields");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse_set;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["creditpath"])), argv(&["creditpath", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["creditpath", "-n", "3"])),
            argv(&["creditpath", "tui", "-n", "3"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["creditpath", "score", "--loan-id", "L-001"])),
            argv(&["creditpath", "score", "--loan-id", "L-001"])
        );
        assert_eq!(
            rewrite_args(argv(&["creditpath", "--help"])),
            argv(&["creditpath", "--help"])
        );
    }

    #[test]
    fn override_applies_to_all_or_one_borrower() {
        let registry = Registry::standard();
        let mut forms = generate_forms(&registry, 2);

        apply_override(&mut forms, &parse_set("int_rate=14.25").unwrap()).unwrap();
        assert_eq!(forms[0].control("int_rate").unwrap().value, "14.25");
        assert_eq!(forms[1].control("int_rate").unwrap().value, "14.25");

        apply_override(&mut forms, &parse_set("2:dti=31.5").unwrap()).unwrap();
        assert_eq!(forms[0].control("dti").unwrap().value, "18.65");
        assert_eq!(forms[1].control("dti").unwrap().value, "31.5");
    }

    #[test]
    fn override_rejects_unknown_fields_and_out_of_domain_values() {
        let registry = Registry::standard();
        let mut forms = generate_forms(&registry, 1);

        assert!(apply_override(&mut forms, &parse_set("nope=1").unwrap()).is_err());
        assert!(apply_override(&mut forms, &parse_set("grade=Z").unwrap()).is_err());
        assert!(apply_override(&mut forms, &parse_set("3:dti=1.0").unwrap()).is_err());

        apply_override(&mut forms, &parse_set("grade=C").unwrap()).unwrap();
        assert_eq!(forms[0].control("grade").unwrap().value, "C");
    }
}
