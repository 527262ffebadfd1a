//! This module contains the definition of the Solidity ABI types that the
//! codec is capable of dealing with, along with the classification rules that
//! drive the head/tail encoding.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::constant::WORD_SIZE_BYTES;

/// The Solidity ABI types understood by the codec.
///
/// # Invariants
///
/// Each individual variant in the enum describes the invariants placed upon
/// it. It is the responsibility of the code constructing these values to
/// ensure that the invariants are satisfied; the signature parser and the
/// document loader both validate them on ingestion. Code utilising the values
/// assumes that the data has been correctly constructed.
///
/// # Fixed-Point Types
///
/// Solidity declares `fixed` and `ufixed` types in the ABI, but the language
/// support for them has never materialised. The codec recognises them in
/// signatures so that canonical renderings and hashes remain correct, but
/// refuses to encode or decode values of these types.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbiType {
    /// Unsigned integers of a given `size` in bits, where `8 <= size <= 256
    /// && size % 8 == 0`.
    UInt { size: usize },

    /// Signed (two's complement) integers of a given `size` in bits, where
    /// `8 <= size <= 256 && size % 8 == 0`.
    Int { size: usize },

    /// Addresses, equivalent to `UInt { size: 160 }` except for
    /// interpretation.
    Address,

    /// Booleans, encoded as a full word holding zero or one.
    Bool,

    /// Byte strings of a fixed `length`, where `1 <= length <= 32`.
    Bytes { length: usize },

    /// A dynamically-sized byte string.
    DynBytes,

    /// A dynamically-sized byte string holding UTF-8 text.
    ///
    /// The encoder performs no validation of the text; the decoder may
    /// truncate it at the first NUL byte depending on configuration.
    String,

    /// An external function reference, consisting of an address followed by a
    /// method identifier. Treated by the codec as an opaque 24-byte value.
    Function,

    /// A signed fixed-point number with `m` integer bits and `n` fractional
    /// decimal digits, where `8 <= m <= 256 && m % 8 == 0` and
    /// `1 <= n <= 80`. Recognised but not encodable.
    Fixed { m: usize, n: usize },

    /// An unsigned fixed-point number, with the same bounds on `m` and `n` as
    /// [`Self::Fixed`]. Recognised but not encodable.
    UFixed { m: usize, n: usize },

    /// A fixed-`size` array containing elements of the element type `tp`.
    ///
    /// A size of zero is legal and encodes to the empty byte string.
    Array {
        size: usize,
        #[serde(rename = "type")]
        tp:   Box<AbiType>,
    },

    /// A dynamically-sized array containing elements of the type `tp`.
    DynArray {
        #[serde(rename = "type")]
        tp: Box<AbiType>,
    },

    /// An ordered sequence of fields, each with an optional name.
    Tuple { elements: Vec<Param> },

    /// A named tuple.
    ///
    /// The canonical form of a struct is identical to that of the
    /// corresponding tuple; the `name` and the per-element names are retained
    /// purely for addressing fields in decoded output.
    Struct { name: String, elements: Vec<Param> },
}

impl AbiType {
    /// Constructs an unsigned integer type of the provided `size` in bits.
    #[must_use]
    pub fn uint(size: usize) -> Self {
        Self::UInt { size }
    }

    /// Constructs a signed integer type of the provided `size` in bits.
    #[must_use]
    pub fn int(size: usize) -> Self {
        Self::Int { size }
    }

    /// Constructs a fixed-size byte string type of the provided `length`.
    #[must_use]
    pub fn bytes(length: usize) -> Self {
        Self::Bytes { length }
    }

    /// Constructs a fixed-size array of `size` elements of the type `tp`.
    #[must_use]
    pub fn array(size: usize, tp: AbiType) -> Self {
        let tp = Box::new(tp);
        Self::Array { size, tp }
    }

    /// Constructs a dynamically-sized array of elements of the type `tp`.
    #[must_use]
    pub fn dyn_array(tp: AbiType) -> Self {
        let tp = Box::new(tp);
        Self::DynArray { tp }
    }

    /// Constructs a tuple of the provided unnamed element types.
    #[must_use]
    pub fn tuple(elements: impl IntoIterator<Item = AbiType>) -> Self {
        let elements = elements.into_iter().map(Param::new).collect();
        Self::Tuple { elements }
    }

    /// Checks whether the encoded length of the type is fixed by the type
    /// alone.
    ///
    /// A dynamic type occupies a single offset-holding word in the head of
    /// its enclosing tuple, with its payload placed in the tail. A static
    /// type is encoded entirely within the head.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::DynBytes | Self::String | Self::DynArray { .. } => true,
            Self::Array { size, tp } => *size > 0 && tp.is_dynamic(),
            Self::Tuple { elements } | Self::Struct { elements, .. } => {
                elements.iter().any(|element| element.tp.is_dynamic())
            }
            _ => false,
        }
    }

    /// Computes the number of bytes the type occupies in the head of its
    /// enclosing tuple.
    ///
    /// Every type occupies exactly one word, with one exception: a _static_
    /// tuple, struct, or fixed-size array is inlined, and occupies the sum of
    /// the head sizes of its components. This rule applies recursively at
    /// every nesting level.
    #[must_use]
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return WORD_SIZE_BYTES;
        }

        match self {
            Self::Tuple { elements } | Self::Struct { elements, .. } => {
                elements.iter().map(|element| element.tp.head_size()).sum()
            }
            Self::Array { size, tp } => size * tp.head_size(),
            _ => WORD_SIZE_BYTES,
        }
    }
}

/// Renders the canonical form of the type, as used in hash inputs.
///
/// Integer widths are always written out in full, and structs render as plain
/// tuples.
impl Display for AbiType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UInt { size } => write!(f, "uint{size}"),
            Self::Int { size } => write!(f, "int{size}"),
            Self::Address => write!(f, "address"),
            Self::Bool => write!(f, "bool"),
            Self::Bytes { length } => write!(f, "bytes{length}"),
            Self::DynBytes => write!(f, "bytes"),
            Self::String => write!(f, "string"),
            Self::Function => write!(f, "function"),
            Self::Fixed { m, n } => write!(f, "fixed{m}x{n}"),
            Self::UFixed { m, n } => write!(f, "ufixed{m}x{n}"),
            Self::Array { size, tp } => write!(f, "{tp}[{size}]"),
            Self::DynArray { tp } => write!(f, "{tp}[]"),
            Self::Tuple { elements } | Self::Struct { elements, .. } => {
                let rendered = elements.iter().map(|element| element.tp.to_string()).join(",");
                write!(f, "({rendered})")
            }
        }
    }
}

/// A single field of a selector or tuple: a type together with its optional
/// name and, for event inputs, whether it is indexed.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Param {
    /// The type of the field.
    #[serde(rename = "type")]
    pub tp: AbiType,

    /// The declared name of the field, if any.
    pub name: Option<String>,

    /// Whether the field is routed through a topic slot when it belongs to an
    /// event. Meaningless outside event inputs.
    pub indexed: bool,
}

impl Param {
    /// Constructs a new unnamed, non-indexed field of the type `tp`.
    #[must_use]
    pub fn new(tp: AbiType) -> Self {
        Self {
            tp,
            name: None,
            indexed: false,
        }
    }

    /// Constructs a new non-indexed field of the type `tp` with the provided
    /// `name`.
    #[must_use]
    pub fn named(tp: AbiType, name: impl Into<String>) -> Self {
        let name = Some(name.into());
        Self {
            tp,
            name,
            indexed: false,
        }
    }

    /// Marks the field as indexed.
    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }
}

#[cfg(test)]
mod test {
    use super::{AbiType, Param};

    #[test]
    fn classifies_leaves_as_static() {
        for tp in [
            AbiType::uint(256),
            AbiType::int(8),
            AbiType::Address,
            AbiType::Bool,
            AbiType::bytes(32),
            AbiType::Function,
        ] {
            assert!(!tp.is_dynamic(), "{tp} should be static");
            assert_eq!(tp.head_size(), 32);
        }
    }

    #[test]
    fn classifies_payload_carriers_as_dynamic() {
        for tp in [
            AbiType::DynBytes,
            AbiType::String,
            AbiType::dyn_array(AbiType::Bool),
        ] {
            assert!(tp.is_dynamic(), "{tp} should be dynamic");
            assert_eq!(tp.head_size(), 32);
        }
    }

    #[test]
    fn array_dynamism_follows_the_element_type() {
        assert!(!AbiType::array(4, AbiType::uint(256)).is_dynamic());
        assert!(AbiType::array(4, AbiType::String).is_dynamic());

        // A zero-length array is static regardless of its element type.
        assert!(!AbiType::array(0, AbiType::String).is_dynamic());
    }

    #[test]
    fn inlines_static_aggregates_in_the_head() {
        let inner = AbiType::tuple([AbiType::uint(256), AbiType::uint(256)]);
        let outer = AbiType::tuple([AbiType::uint(256), inner]);
        assert_eq!(outer.head_size(), 96);

        let array = AbiType::array(3, AbiType::tuple([AbiType::Bool, AbiType::Address]));
        assert_eq!(array.head_size(), 192);

        assert_eq!(AbiType::array(0, AbiType::uint(8)).head_size(), 0);
    }

    #[test]
    fn dynamic_aggregates_occupy_a_single_offset_slot() {
        let tp = AbiType::tuple([AbiType::uint(256), AbiType::String]);
        assert!(tp.is_dynamic());
        assert_eq!(tp.head_size(), 32);
    }

    #[test]
    fn renders_canonical_type_forms() {
        assert_eq!(AbiType::uint(256).to_string(), "uint256");
        assert_eq!(AbiType::int(128).to_string(), "int128");
        assert_eq!(AbiType::bytes(3).to_string(), "bytes3");
        assert_eq!(AbiType::DynBytes.to_string(), "bytes");
        assert_eq!(AbiType::Fixed { m: 128, n: 19 }.to_string(), "fixed128x19");
        assert_eq!(
            AbiType::dyn_array(AbiType::array(2, AbiType::Address)).to_string(),
            "address[2][]"
        );
        assert_eq!(
            AbiType::tuple([AbiType::uint(8), AbiType::String]).to_string(),
            "(uint8,string)"
        );
    }

    #[test]
    fn structs_render_as_plain_tuples() {
        let tp = AbiType::Struct {
            name:     "Deposit".to_string(),
            elements: vec![
                Param::named(AbiType::Address, "owner"),
                Param::named(AbiType::uint(256), "amount"),
            ],
        };
        assert_eq!(tp.to_string(), "(address,uint256)");
    }
}
