//! This module contains the error type that pertains to loading selectors
//! from JSON ABI documents.

use thiserror::Error;

use crate::error::parsing;

/// Errors that occur while translating a JSON ABI item tree into
/// descriptors.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("An ABI document must be an array of items")]
    NotAnArray,

    #[error("An ABI item must be an object, but found `{_0}`")]
    ItemNotAnObject(String),

    #[error("A component must be an object, but found `{_0}`")]
    ComponentNotAnObject(String),

    #[error("The inputs or outputs of an item must be an array, but found `{_0}`")]
    ComponentsNotAnArray(String),

    #[error("A `{_0}` item must carry a name")]
    UnnamedItem(String),

    #[error("The component is missing its `type` key")]
    MissingComponentType,

    #[error("A tuple component is missing its `components` key")]
    MissingTupleComponents,

    #[error("`{_0}` is not a valid array suffix")]
    MalformedArraySuffix(String),

    #[error("Could not parse the component type: {_0}")]
    BadComponentType(#[from] parsing::LocatedError),
}

/// The result type for functions that may return document errors.
pub type Result<T> = std::result::Result<T, Error>;
