//! This module contains the descriptor model: the normalized form that both
//! the signature parser and the document loader produce, and that the
//! encoder, decoder, and event codec all consume.

use serde::{Deserialize, Serialize};

use crate::{
    canonical,
    constant::{SELECTOR_SIZE_BYTES, TOPIC_SIZE_BYTES},
    hash::HashFn,
    types::Param,
};

/// The kind of contract interface entry that a selector describes.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    /// An externally-callable function, addressed by a method identifier.
    Function,

    /// A constructor. Has no name and no method identifier.
    Constructor,

    /// The fallback function, invoked when no method identifier matches.
    Fallback,

    /// The plain-transfer receiver function.
    Receive,

    /// An event, addressed by the full hash of its canonical signature in
    /// topic zero.
    Event,

    /// A revert error.
    Error,

    /// A bare argument tuple with no leading name, as produced by parsing a
    /// signature of the form `(…)`.
    Unnamed,
}

/// The state mutability declared for a function.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateMutability {
    /// Reads and writes state, rejects attached value.
    NonPayable,

    /// Touches no state at all.
    Pure,

    /// Reads state but does not write it.
    View,

    /// Reads and writes state, accepts attached value.
    Payable,
}

/// A normalized descriptor for a single contract interface entry.
///
/// # Invariants
///
/// An absent `name` is only legal for the [`SelectorKind::Fallback`],
/// [`SelectorKind::Receive`], and [`SelectorKind::Unnamed`] kinds.
///
/// An `outputs` of `Some(vec![])` describes an entry explicitly declared as
/// returning nothing, and is distinct from `None`, which is used for entries
/// where outputs are not applicable at all (constructors, fallback and
/// receive functions, events, and errors).
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct FunctionSelector {
    /// The declared name of the entry, if any.
    pub name: Option<String>,

    /// The kind of entry being described.
    pub kind: SelectorKind,

    /// The declared state mutability, where the source material provides one.
    pub state_mutability: Option<StateMutability>,

    /// The argument fields of the entry. For events these carry the `indexed`
    /// flags that drive topic routing.
    pub inputs: Vec<Param>,

    /// The return fields of the entry, where applicable.
    pub outputs: Option<Vec<Param>>,
}

impl FunctionSelector {
    /// Constructs a descriptor for a function with the provided `name` and
    /// `inputs`, declared as returning nothing.
    #[must_use]
    pub fn function(name: impl Into<String>, inputs: Vec<Param>) -> Self {
        Self {
            name: Some(name.into()),
            kind: SelectorKind::Function,
            state_mutability: None,
            inputs,
            outputs: Some(vec![]),
        }
    }

    /// Constructs a descriptor for a bare argument tuple with no name.
    #[must_use]
    pub fn unnamed(inputs: Vec<Param>) -> Self {
        Self {
            name: None,
            kind: SelectorKind::Unnamed,
            state_mutability: None,
            inputs,
            outputs: None,
        }
    }

    /// Constructs a descriptor for an event with the provided `name` and
    /// `inputs`.
    #[must_use]
    pub fn event(name: impl Into<String>, inputs: Vec<Param>) -> Self {
        Self {
            name: Some(name.into()),
            kind: SelectorKind::Event,
            state_mutability: None,
            inputs,
            outputs: None,
        }
    }

    /// Computes the method identifier of the entry under the provided `hash`
    /// provider: the first [`SELECTOR_SIZE_BYTES`] bytes of the hash of the
    /// canonical signature.
    ///
    /// Only named functions carry a method identifier; every other kind of
    /// entry yields [`None`].
    #[must_use]
    pub fn method_id(&self, hash: HashFn) -> Option<[u8; SELECTOR_SIZE_BYTES]> {
        if self.kind != SelectorKind::Function {
            return None;
        }
        self.name.as_ref()?;

        let digest = hash(canonical::canonical(self).as_bytes());
        let mut id = [0u8; SELECTOR_SIZE_BYTES];
        id.copy_from_slice(&digest[..SELECTOR_SIZE_BYTES]);
        Some(id)
    }

    /// Computes topic zero of the entry under the provided `hash` provider:
    /// the full hash of the canonical signature.
    ///
    /// Unlike the method identifier this is not truncated, and it is
    /// available for any named entry so that event descriptors produced by
    /// the signature parser can be matched against logs.
    #[must_use]
    pub fn topic0(&self, hash: HashFn) -> Option<[u8; TOPIC_SIZE_BYTES]> {
        self.name.as_ref()?;
        Some(hash(canonical::canonical(self).as_bytes()))
    }
}
