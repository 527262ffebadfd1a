//! This module contains the error type that pertains to decoding event logs.

use thiserror::Error;

use crate::error::decoding;

/// Errors that occur while splitting an event log into its indexed and
/// non-indexed parts.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error(
        "The log carries {actual} topics but the descriptor calls for {expected}; if the \
         descriptor is correct, consider toggling signature checking"
    )]
    TopicCountMismatch { actual: usize, expected: usize },

    #[error("Topic zero is 0x{actual}, but the canonical signature hashes to 0x{expected}")]
    SignatureMismatch { expected: String, actual: String },

    #[error(transparent)]
    Data(#[from] decoding::LocatedError),
}

/// The result type for functions that may return event errors.
pub type Result<T> = std::result::Result<T, Error>;
