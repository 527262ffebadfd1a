//! This module contains the primary error type for the codec's interface. It
//! also re-exports the more specific error types that are subsystem-specific.
//!
//! # Anyhow
//!
//! All of the errors implement [`std::error::Error`], and hence can be used
//! with [`anyhow::Error`] internally. It is _not_ recommended to use that
//! error type in the interface of the library, as this forces clients to also
//! use `anyhow`.

pub mod container;
pub mod decoding;
pub mod document;
pub mod encoding;
pub mod event;
pub mod parsing;

use std::rc::Rc;

use thiserror::Error;

/// The interface result type for the library.
///
/// # Usage
///
/// Any function considered to be part of the public interface of the library
/// should return this result type. Note that _all_ of the library is public
/// in order to facilitate use-cases beyond the ones designed for.
pub type Result<T> = std::result::Result<T, Error>;

/// The interface error type for the library.
///
/// All errors returned from the library interface (and hence encountered by
/// the clients of the library) should be members of this enum.
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// Errors that come from lexing and parsing signature text.
    #[error(transparent)]
    Parsing(#[from] parsing::LocatedError),

    /// Errors that come from loading JSON ABI documents.
    #[error(transparent)]
    Document(#[from] document::Error),

    /// Errors that come from encoding values.
    #[error(transparent)]
    Encoding(#[from] encoding::Error),

    /// Errors that come from decoding buffers.
    #[error(transparent)]
    Decoding(#[from] decoding::LocatedError),

    /// Errors that come from decoding event logs.
    #[error(transparent)]
    Event(#[from] event::Error),

    /// The selector passed to an output-side operation does not declare
    /// outputs at all.
    #[error("The selector `{_0}` does not declare outputs")]
    MissingOutputs(String),

    /// Unknown errors, usually from the dependencies of the library.
    ///
    /// It is wrapped in an [`Rc`] to ensure that it can be cloned like the
    /// other error types in this interface error.
    #[error(transparent)]
    Other(Rc<anyhow::Error>),
}

impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        Self::Other(Rc::new(value))
    }
}
