//! Error types and diagnostics for the translator.
//!
//! This module defines the error taxonomy used throughout translation:
//!
//! - Fatal errors (the output sink cannot be opened or written) abort the run
//! - Hard errors abandon the construct being translated, the run continues
//! - Advisory warnings never stop anything; generation falls back to a
//!   best-effort value
//!
//! It also provides the [`diagnostics::Diagnostics`] collector that prints
//! messages as they are discovered and retains them for inspection in tests.

pub mod diagnostics;
pub mod errors;

#[cfg(test)]
mod tests;
