//! This module contains the generic tagged form in which decoded values are
//! produced and encoder arguments are supplied.

use ethnum::{I256, U256};

use crate::constant::ADDRESS_SIZE_BYTES;

/// A decoded value, mirroring the shape of [`crate::types::AbiType`].
///
/// Integers are carried at full 256-bit width regardless of their declared
/// type width; the width only matters at the encoding boundary. Strings are
/// carried as raw byte sequences, as the encoding neither validates nor
/// guarantees UTF-8.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Value {
    /// An unsigned integer.
    UInt(U256),

    /// A signed integer.
    Int(I256),

    /// A boolean.
    Bool(bool),

    /// A byte string, fixed-size or dynamic.
    Bytes(Vec<u8>),

    /// A text string, carried as its raw bytes.
    String(Vec<u8>),

    /// An account or contract address.
    Address([u8; ADDRESS_SIZE_BYTES]),

    /// An array, fixed-size or dynamic.
    Array(Vec<Value>),

    /// A tuple or struct.
    Tuple(Vec<Value>),
}

impl Value {
    /// Constructs a string value from text.
    #[must_use]
    pub fn string(text: impl Into<String>) -> Self {
        Self::String(text.into().into_bytes())
    }

    /// Constructs a byte-string value.
    #[must_use]
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// A short name for the shape of the value, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UInt(_) => "an unsigned integer",
            Self::Int(_) => "a signed integer",
            Self::Bool(_) => "a boolean",
            Self::Bytes(_) => "a byte string",
            Self::String(_) => "a string",
            Self::Address(_) => "an address",
            Self::Array(_) => "an array",
            Self::Tuple(_) => "a tuple",
        }
    }

    /// Gets the contained unsigned integer, if the value is one.
    #[must_use]
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Self::UInt(value) => Some(*value),
            _ => None,
        }
    }

    /// Gets the contained signed integer, if the value is one.
    #[must_use]
    pub fn as_int(&self) -> Option<I256> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Gets the contained boolean, if the value is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Gets the contained bytes, if the value is a byte string or a string.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) | Self::String(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }

    /// Gets the contained string as text, if the value is a string holding
    /// valid UTF-8.
    #[must_use]
    pub fn as_utf8(&self) -> Option<&str> {
        match self {
            Self::String(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Gets the contained address, if the value is one.
    #[must_use]
    pub fn as_address(&self) -> Option<&[u8; ADDRESS_SIZE_BYTES]> {
        match self {
            Self::Address(address) => Some(address),
            _ => None,
        }
    }

    /// Gets the contained elements, if the value is an array or a tuple.
    #[must_use]
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Self::Array(elements) | Self::Tuple(elements) => Some(elements.as_slice()),
            _ => None,
        }
    }
}

/// Constructs an unsigned integer value from a [`u64`].
impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::UInt(U256::from(value))
    }
}

/// Constructs an unsigned integer value from a [`u128`].
impl From<u128> for Value {
    fn from(value: u128) -> Self {
        Self::UInt(U256::from(value))
    }
}

/// Constructs an unsigned integer value from a [`U256`].
impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Self::UInt(value)
    }
}

/// Constructs a signed integer value from an [`i64`].
impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(I256::from(value))
    }
}

/// Constructs a signed integer value from an [`I256`].
impl From<I256> for Value {
    fn from(value: I256) -> Self {
        Self::Int(value)
    }
}

/// Constructs a boolean value.
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Constructs a string value from text.
impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

/// Constructs an address value from its bytes.
impl From<[u8; ADDRESS_SIZE_BYTES]> for Value {
    fn from(value: [u8; ADDRESS_SIZE_BYTES]) -> Self {
        Self::Address(value)
    }
}

/// Constructs a byte-string value from its bytes.
impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

#[cfg(test)]
mod test {
    use ethnum::U256;

    use super::Value;

    #[test]
    fn converts_from_primitives() {
        assert_eq!(Value::from(7_u64), Value::UInt(U256::from(7_u64)));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("BAT"), Value::String(b"BAT".to_vec()));
    }

    #[test]
    fn accesses_text_through_utf8() {
        assert_eq!(Value::string("Ether Token").as_utf8(), Some("Ether Token"));
        assert_eq!(Value::String(vec![0xff, 0xfe]).as_utf8(), None);
        assert_eq!(Value::bytes(vec![1, 2]).as_utf8(), None);
    }

    #[test]
    fn distinguishes_value_kinds() {
        assert_eq!(Value::from(1_u64).as_bool(), None);
        assert_eq!(Value::from(true).as_uint(), None);
        assert_eq!(
            Value::Array(vec![Value::from(false)]).as_elements(),
            Some([Value::Bool(false)].as_slice())
        );
    }
}
