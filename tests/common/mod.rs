//! This module contains common testing utilities for testing this library.
#![cfg(test)]

use contract_abi_codec::constant::TOPIC_SIZE_BYTES;

/// Builds a buffer from a sequence of hex-encoded words.
#[allow(unused)] // It is actually
pub fn buffer(words: &[&str]) -> Vec<u8> {
    words
        .iter()
        .flat_map(|word| {
            let bytes = hex::decode(word).expect("test words are valid hex");
            assert_eq!(bytes.len(), 32, "test words are exactly one word wide");
            bytes
        })
        .collect()
}

/// Builds a single topic from a hex-encoded word.
#[allow(unused)] // It is actually
pub fn topic(word: &str) -> [u8; TOPIC_SIZE_BYTES] {
    let bytes = hex::decode(word).expect("test topics are valid hex");
    bytes
        .as_slice()
        .try_into()
        .expect("test topics are exactly one word wide")
}

/// Renders an encoding as a vector of hex words, so that mismatches point at
/// the offending word rather than at a wall of hex.
#[allow(unused)] // It is actually
pub fn hex_words(buf: &[u8]) -> Vec<String> {
    buf.chunks(32).map(hex::encode).collect()
}
