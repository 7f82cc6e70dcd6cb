//! Command-line parsing for the loan screening client.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the form/submission code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::AppError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "creditpath", version, about = "Loan default risk screening client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive borrower form.
    ///
    /// This uses the same underlying submission pipeline as `creditpath
    /// score`, but renders forms, result cards, and history in a terminal UI
    /// using Ratatui.
    Tui(TuiArgs),
    /// Score a batch of borrowers non-interactively and print the cards.
    Score(ScoreArgs),
    /// Fetch and print the prediction history.
    Logs(LogsArgs),
    /// Print the field catalog (layout order, kinds, defaults, domains).
    Fields,
}

/// Options for the interactive TUI.
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Initial number of borrower sub-forms.
    #[arg(short = 'n', long, default_value_t = 1)]
    pub borrowers: usize,
}

/// Options for non-interactive scoring.
#[derive(Debug, Parser, Clone)]
pub struct ScoreArgs {
    /// Loan identifier per borrower; repeat to score several at once.
    #[arg(long = "loan-id", required = true, value_name = "ID")]
    pub loan_ids: Vec<String>,

    /// Override a field value, e.g. `--set int_rate=14.25` (all borrowers)
    /// or `--set 2:dti=31.5` (borrower 2 only).
    #[arg(long = "set", value_name = "[IDX:]FIELD=VALUE")]
    pub sets: Vec<String>,

    /// Write the rendered result cards to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for the history printout.
#[derive(Debug, Parser, Clone)]
pub struct LogsArgs {
    /// Maximum number of history rows to fetch.
    #[arg(long, default_value_t = 100)]
    pub limit: usize,
}

/// A parsed `--set` override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOverride {
    /// 1-based borrower index; `None` applies to every borrower.
    pub borrower: Option<usize>,
    pub field: String,
    pub value: String,
}

/// Parse `[IDX:]FIELD=VALUE`.
///
/// The value may be empty (`--set issue_d=`), which deliberately drives the
/// validation path.
pub fn parse_set(spec: &str) -> Result<FieldOverride, AppError> {
    let (target, value) = spec.split_once('=').ok_or_else(|| {
        AppError::usage(format!("Invalid --set '{spec}': expected [IDX:]FIELD=VALUE."))
    })?;

    let (borrower, field) = match target.split_once(':') {
        Some((idx, field)) => {
            let idx: usize = idx.trim().parse().map_err(|_| {
                AppError::usage(format!("Invalid --set '{spec}': borrower index must be a number."))
            })?;
            if idx == 0 {
                return Err(AppError::usage(format!(
                    "Invalid --set '{spec}': borrower indices are 1-based."
                )));
            }
            (Some(idx), field)
        }
        None => (None, target),
    };

    let field = field.trim();
    if field.is_empty() {
        return Err(AppError::usage(format!(
            "Invalid --set '{spec}': missing field name."
        )));
    }

    Ok(FieldOverride {
        borrower,
        field: field.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_and_indexed_overrides() {
        assert_eq!(
            parse_set("int_rate=14.25").unwrap(),
            FieldOverride {
                borrower: None,
                field: "int_rate".to_string(),
                value: "14.25".to_string(),
            }
        );
        assert_eq!(
            parse_set("2:dti=31.5").unwrap(),
            FieldOverride {
                borrower: Some(2),
                field: "dti".to_string(),
                value: "31.5".to_string(),
            }
        );
    }

    #[test]
    fn empty_value_is_allowed() {
        let o = parse_set("issue_d=").unwrap();
        assert_eq!(o.value, "");
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!(parse_set("no_equals_sign").is_err());
        assert!(parse_set("x:dti=1").is_err());
        assert!(parse_set("0:dti=1").is_err());
        assert!(parse_set("=42").is_err());
    }
}
