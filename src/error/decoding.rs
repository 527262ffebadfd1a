//! This module contains the error type that pertains to decoding an encoded
//! buffer against a descriptor.

use thiserror::Error;

use crate::error::container;

/// Errors that occur while decoding the ABI byte layout back into values.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Needed {wanted} bytes, but only {available} remain in the buffer")]
    BufferOverrun { wanted: usize, available: usize },

    #[error("The word 0x{_0} is not a valid boolean")]
    InvalidBool(String),

    #[error("The offset 0x{_0} does not fit within the buffer")]
    MalformedOffset(String),

    #[error("The length 0x{_0} is not representable")]
    LengthOverflow(String),

    #[error("The element count 0x{_0} is implausible for the remaining buffer")]
    ImplausibleCount(String),

    #[error("Values of type `{_0}` cannot be decoded")]
    UnsupportedType(String),
}

/// A decoding error with an associated byte offset in the encoded buffer.
pub type LocatedError = container::Located<Error>;

/// The result type for functions that may return decoding errors.
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
