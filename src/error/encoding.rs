//! This module contains the error type that pertains to encoding values
//! against a descriptor.

use thiserror::Error;

/// Errors that occur while encoding values into the ABI byte layout.
///
/// No partial output is ever produced; an error means that no bytes were
/// emitted at all.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("The value {value} does not fit in `{tp}`")]
    Overflow { tp: String, value: String },

    #[error("A byte string of length {actual} does not fit in `{tp}` (maximum {maximum})")]
    BytesTooLong {
        tp:      String,
        actual:  usize,
        maximum: usize,
    },

    #[error("Cannot encode {actual} as `{tp}`")]
    TypeMismatch { tp: String, actual: String },

    #[error("Expected {expected} values for `{tp}`, but {actual} were provided")]
    ArityMismatch {
        tp:       String,
        expected: usize,
        actual:   usize,
    },

    #[error("Values of type `{_0}` cannot be encoded")]
    UnsupportedType(String),
}

/// The result type for functions that may return encoding errors.
pub type Result<T> = std::result::Result<T, Error>;
