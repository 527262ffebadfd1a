//! This module contains the error type that pertains to lexing and parsing
//! signature text.

use thiserror::Error;

use crate::error::container;

/// Errors that occur while turning signature text into a descriptor.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Encountered invalid character {_0:?} in the signature")]
    InvalidCharacter(char),

    #[error("Encountered unexpected token `{_0}`")]
    UnexpectedToken(String),

    #[error("The signature ended unexpectedly")]
    UnexpectedEndOfInput,

    #[error("Expected a type, but found `{_0}`")]
    ExpectedType(String),

    #[error("`{_0}` is not a valid integer width")]
    InvalidIntWidth(usize),

    #[error("`{_0}` is not a valid fixed byte-string length")]
    InvalidBytesLength(usize),

    #[error("`{m}x{n}` is not a valid fixed-point shape")]
    InvalidFixedShape { m: usize, n: usize },

    #[error("The number in the signature is too large to represent")]
    NumberTooLarge,

    #[error("Expected a single type, but the signature describes {_0} of them")]
    NotASingleType(usize),
}

/// A parsing error with an associated byte offset in the signature text.
pub type LocatedError = container::Located<Error>;

/// The result type for functions that may return parsing errors.
pub type Result<T> = std::result::Result<T, LocatedError>;

/// Make it possible to attach locations to these errors.
impl container::Locatable for Error {
    type Located = LocatedError;

    fn locate(self, offset: usize) -> Self::Located {
        container::Located {
            location: offset,
            payload:  self,
        }
    }
}
