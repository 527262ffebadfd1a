//! This library implements a bidirectional codec between high-level typed
//! values and the byte layout of the
//! [Ethereum contract ABI](https://docs.soliditylang.org/en/latest/abi-spec.html):
//! the interface between off-chain callers and on-chain contracts.
//!
//! Two complementary surfaces are offered:
//!
//! 1. Descriptor construction, from either human-readable signature text
//!    (via [`parser`]) or machine-readable JSON ABI documents (via
//!    [`document`]). Both produce the same normalized
//!    [`selector::FunctionSelector`].
//! 2. Encoding and decoding against a descriptor: argument tuples with their
//!    method-identifier prefix (via [`encoder`] and [`decoder`]), and event
//!    logs with their topic/data partitioning and topic-zero verification
//!    (via [`event`]).
//!
//! The head/tail layout places static values directly in the head of their
//! enclosing tuple and dynamic payloads in its tail, behind offsets measured
//! from the start of that tuple's own encoding. Static tuples and fixed-size
//! arrays are inlined into the head recursively; getting this single rule
//! right at every nesting level is most of what this library is for.
//!
//! # Basic Usage
//!
//! Most uses go through the [`Codec`] facade, which accepts either signature
//! text or a prepared descriptor wherever a selector is needed.
//!
//! ```
//! use contract_abi_codec::{Codec, Value};
//!
//! let codec = Codec::new();
//!
//! // Encoding call data: a four-byte method identifier, then the arguments.
//! let call = codec
//!     .encode("baz(uint32,bool)", &[Value::from(69_u64), Value::from(true)])
//!     .unwrap();
//! assert_eq!(hex::encode(&call[..4]), "cdcd77c0");
//!
//! // Decoding works on the argument tuple, without the prefix.
//! let values = codec.decode("baz(uint32,bool)", &call[4..]).unwrap();
//! assert_eq!(values, vec![Value::from(69_u64), Value::from(true)]);
//! ```

#![warn(clippy::all, clippy::cargo, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Allows for better API naming

pub mod canonical;
pub mod codec;
pub mod constant;
pub mod decoder;
pub mod document;
pub mod encoder;
pub mod error;
pub mod event;
pub mod hash;
pub mod parser;
pub mod selector;
pub mod types;
pub mod value;

// Re-exports to provide the library interface.
pub use codec::Codec;
pub use event::DecodedEvent;
pub use selector::FunctionSelector;
pub use types::{AbiType, Param};
pub use value::Value;
