//! Unit tests for error handling.
//!
//! This module contains tests for error types and the diagnostics collector.

use std::rc::Rc;

use crate::errors::diagnostics::Diagnostics;
use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::DivisionByZero,
        Position(10, Rc::new("x = 4 / 0".to_string())),
    );

    assert_eq!(error.get_error_name(), "DivisionByZero");
    assert!(!error.is_fatal());
}

#[test]
fn test_error_position() {
    let pos = Position(42, Rc::new("t[1 < 2] = 0".to_string()));
    let error = Error::new(
        ErrorImpl::InvalidSizeOperator {
            operator: "<".to_string(),
        },
        pos.clone(),
    );

    assert_eq!(error.get_position().0, 42);
}

#[test]
fn test_sink_error_is_fatal() {
    let error = Error::new(
        ErrorImpl::OutputSink {
            message: "permission denied".to_string(),
        },
        Position::null(),
    );

    assert!(error.is_fatal());
    assert_eq!(error.get_error_name(), "OutputSink");
}

#[test]
fn test_size_operator_error_tip() {
    let error = Error::new(
        ErrorImpl::InvalidSizeOperator {
            operator: "and".to_string(),
        },
        Position::null(),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("`and`")),
        ErrorTip::None => panic!("expected a suggestion"),
    }
}

#[test]
fn test_bad_read_format_error() {
    let error = Error::new(
        ErrorImpl::BadReadFormat {
            format: "*x".to_string(),
        },
        Position::null(),
    );

    assert_eq!(error.get_error_name(), "BadReadFormat");
    assert!(error.to_string().contains("*x"));
}

#[test]
fn test_diagnostics_collects_warnings() {
    let mut diags = Diagnostics::silent();
    diags.warning("undefined variable `x`, treated as nil", None);
    diags.warning("multi-value return truncated", None);

    assert_eq!(diags.warning_count(), 2);
    assert!(diags.has_warning("undefined variable `x`"));
}

#[test]
fn test_diagnostics_renders_position() {
    let mut diags = Diagnostics::silent();
    let pos = Position(7, Rc::new("  y = z + 1".to_string()));
    diags.warning("undefined variable `z`, treated as nil", Some(&pos));

    assert!(diags.warnings()[0].contains("line 7"));
    assert!(diags.warnings()[0].contains("y = z + 1"));
}

#[test]
fn test_diagnostics_counts_errors() {
    let mut diags = Diagnostics::silent();
    diags.error(&Error::new(ErrorImpl::DivisionByZero, Position::null()));

    assert_eq!(diags.error_count(), 1);
    assert!(diags.errors()[0].contains("division by zero"));
}
