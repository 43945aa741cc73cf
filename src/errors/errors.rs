use std::fmt::Display;

use thiserror::Error as ThisError;

use crate::Position;

/// A translation error: what went wrong plus where in the source.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::OutputSink { .. } => "OutputSink",
            ErrorImpl::InvalidSizeOperator { .. } => "InvalidSizeOperator",
            ErrorImpl::NonIntegerSize { .. } => "NonIntegerSize",
            ErrorImpl::NegativeSize { .. } => "NegativeSize",
            ErrorImpl::SizeOverflow => "SizeOverflow",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::BadReadFormat { .. } => "BadReadFormat",
            ErrorImpl::NonLiteralReadFormat => "NonLiteralReadFormat",
        }
    }

    /// Whether the error aborts the whole run rather than one construct.
    pub fn is_fatal(&self) -> bool {
        matches!(self.internal_error, ErrorImpl::OutputSink { .. })
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::OutputSink { .. } => ErrorTip::None,
            ErrorImpl::InvalidSizeOperator { operator } => ErrorTip::Suggestion(format!(
                "operator `{}` is not allowed inside an array index or size",
                operator
            )),
            ErrorImpl::NonIntegerSize { found } => ErrorTip::Suggestion(format!(
                "array indexes and sizes must be integers, found `{}`",
                found
            )),
            ErrorImpl::NegativeSize { value } => ErrorTip::Suggestion(format!(
                "array index or size folds to the negative value {}",
                value
            )),
            ErrorImpl::SizeOverflow => ErrorTip::Suggestion(String::from(
                "the expression does not fit a 64-bit integer when folded",
            )),
            ErrorImpl::DivisionByZero => ErrorTip::None,
            ErrorImpl::BadReadFormat { format } => ErrorTip::Suggestion(format!(
                "`{}` is not a recognized io.read format; use \"*n\", \"*l\", \"*a\" or a byte count",
                format
            )),
            ErrorImpl::NonLiteralReadFormat => ErrorTip::Suggestion(String::from(
                "io.read needs a literal format argument to be translated",
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(ThisError, Debug, Clone)]
pub enum ErrorImpl {
    #[error("cannot open or write the output sink: {message}")]
    OutputSink { message: String },
    #[error("invalid array index or size, cannot use operator {operator:?}")]
    InvalidSizeOperator { operator: String },
    #[error("invalid array index or size, non-integer len argument: {found:?}")]
    NonIntegerSize { found: String },
    #[error("cannot use negative array index or size: {value}")]
    NegativeSize { value: i64 },
    #[error("array index or size is too large")]
    SizeOverflow,
    #[error("division by zero")]
    DivisionByZero,
    #[error("unrecognized io.read format: {format:?}")]
    BadReadFormat { format: String },
    #[error("io.read format argument is not a literal")]
    NonLiteralReadFormat,
}
