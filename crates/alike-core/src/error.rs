//! Error types.
//!
//! Mismatches between target and current are not errors: they are returned
//! as data inside `Comparison`. `AlikeError` is reserved for conditions that
//! make a comparison meaningless.

use std::fmt;
use thiserror::Error;

/// Why a comparison failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TypeMismatch,
    LengthMismatch,
    /// A literal in an expression differs.
    ValueMismatch,
    /// A scope lacks a binding present in the target scope.
    MissingBinding,
    /// Function parameter lists differ.
    SignatureMismatch,
    AttributeMissing,
    AttributeTypeMismatch,
    ClassMismatch,
    DimensionMismatch,
    NameMismatch,
    TimeSeriesParamMismatch,
    RenamingInconsistent,
    RecursionLimitExceeded,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::LengthMismatch => "length mismatch",
            ErrorKind::ValueMismatch => "value mismatch",
            ErrorKind::MissingBinding => "missing binding",
            ErrorKind::SignatureMismatch => "signature mismatch",
            ErrorKind::AttributeMissing => "attribute missing",
            ErrorKind::AttributeTypeMismatch => "attribute type mismatch",
            ErrorKind::ClassMismatch => "class mismatch",
            ErrorKind::DimensionMismatch => "dimension mismatch",
            ErrorKind::NameMismatch => "name mismatch",
            ErrorKind::TimeSeriesParamMismatch => "time-series parameter mismatch",
            ErrorKind::RenamingInconsistent => "inconsistent renaming",
            ErrorKind::RecursionLimitExceeded => "recursion limit exceeded",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conditions that abort a comparison.
#[derive(Debug, Error, PartialEq)]
pub enum AlikeError {
    /// A precondition the comparator relies on does not hold; indicates a
    /// bug or malformed input such as a dangling scope id.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid setting `{field}`: {reason}")]
    InvalidSettings { field: &'static str, reason: String },
}

/// Result type for comparator operations.
pub type AlikeResult<T> = Result<T, AlikeError>;
