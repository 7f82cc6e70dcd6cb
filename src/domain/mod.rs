//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - typed collected values (`FieldValue`, `BorrowerRecord`)
//! - scoring outputs (`Prediction`, `RiskClass`)
//! - history entries (`LogEntry`, `BorrowerSnapshot`)

pub mod types;

pub use types::*;
