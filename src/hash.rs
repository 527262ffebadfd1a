//! This module contains the hashing seam used for method identifiers and
//! event topics.
//!
//! The codec never hashes anything other than canonical signature text, so
//! the seam is a plain function from bytes to a single word. The provider is
//! chosen once, at [`crate::codec::Codec`] construction time, and is
//! immutable afterwards.

use sha3::{Digest, Keccak256};

use crate::constant::WORD_SIZE_BYTES;

/// A hash provider: a pure function from a byte string to a single word.
///
/// Any provider must implement Keccak-256 as defined by Ethereum. This is the
/// pre-standardisation variant of the function, and is _not_ interchangeable
/// with NIST SHA3-256.
pub type HashFn = fn(&[u8]) -> [u8; WORD_SIZE_BYTES];

/// The default hash provider, backed by [`sha3::Keccak256`].
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; WORD_SIZE_BYTES] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod test {
    use super::keccak256;

    #[test]
    fn hashes_the_empty_string() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn hashes_a_known_signature() {
        let hash = keccak256(b"Transfer(address,address,uint256)");
        assert_eq!(
            hex::encode(hash),
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }
}
