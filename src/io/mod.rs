//! Input/output helpers.
//!
//! - result card export (JSON) (`export`)

pub mod export;

pub use export::*;
