//! This module contains constants that are needed throughout the codebase.

/// The width of a byte in bits.
pub const BYTE_SIZE_BITS: usize = 8;

/// The width of an ABI word in bytes.
///
/// Every head slot, every encoded leaf, and every length or offset prefix in
/// the encoding occupies exactly one word.
pub const WORD_SIZE_BYTES: usize = 32;

/// The width of an ABI word in bits.
pub const WORD_SIZE_BITS: usize = 256;

/// The number of bytes in a method identifier.
///
/// The method identifier is the prefix of call data, and consists of the
/// first [`SELECTOR_SIZE_BYTES`] bytes of the hash of the canonical
/// signature.
pub const SELECTOR_SIZE_BYTES: usize = 4;

/// The number of bytes in an account or contract address.
pub const ADDRESS_SIZE_BYTES: usize = 20;

/// The number of bytes in an external function reference.
///
/// Such a reference consists of an address followed by a method identifier,
/// and is treated as opaque by the codec.
pub const FUNCTION_SIZE_BYTES: usize = 24;

/// The number of bytes in an event topic.
///
/// Topic zero of a non-anonymous event log is the full hash of the canonical
/// event signature, not a truncated method identifier.
pub const TOPIC_SIZE_BYTES: usize = 32;

/// The maximum length of a fixed-size byte string (`bytes1` through
/// `bytes32`).
pub const MAX_FIXED_BYTES_LENGTH: usize = 32;

/// The integer width assumed when a signature writes `uint` or `int` without
/// an explicit width.
pub const DEFAULT_INT_WIDTH_BITS: usize = 256;

/// The maximum number of fractional decimal digits in a `fixed` or `ufixed`
/// type.
pub const MAX_FIXED_EXPONENT: usize = 80;
