//! Type inference and semantic checks.
//!
//! This module reconstructs static types from the type-erased Lua tree:
//!
//! - [`inference`]: types any expression as a (tag, certainty) pair and
//!   infers function return types with numeric widening
//! - [`checks`]: the layered validations — constant division by zero and
//!   the integer-only array index/size rule with constant folding
//! - [`hints`]: a pure pre-pass that collects per-position parameter types
//!   from every call site
//!
//! Inference never aborts generation: apart from the syntactically
//! impossible cases in [`checks`], everything degrades to a best-effort
//! fallback value plus an advisory warning.

pub mod checks;
pub mod hints;
pub mod inference;
