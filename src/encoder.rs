//! This module contains the encoder: the transformation from a vector of
//! values and a descriptor into the head/tail byte layout.
//!
//! # Head and Tail
//!
//! A tuple encodes as two regions. The head holds one word per field — the
//! value itself for a static field, or an offset into the tail for a dynamic
//! one — except that a _static_ tuple, struct, or fixed-size array field is
//! inlined, contributing its own recursively-computed head bytes instead of a
//! single word. Offsets are measured from the start of the tuple's own
//! encoding, never from the start of the outer buffer; this is what keeps the
//! encoding correct when a method identifier precedes the argument tuple.

use ethnum::{I256, U256};
use itertools::Itertools;

use crate::{
    constant::{
        ADDRESS_SIZE_BYTES,
        BYTE_SIZE_BITS,
        FUNCTION_SIZE_BYTES,
        WORD_SIZE_BITS,
        WORD_SIZE_BYTES,
    },
    error::encoding::{Error, Result},
    hash::HashFn,
    selector::FunctionSelector,
    types::{AbiType, Param},
    value::Value,
};

/// Encodes `values` as the argument tuple of `selector`, prefixed with the
/// method identifier when the selector is a named function.
///
/// The value vector is encoded as a single top-level tuple whose fields are
/// the selector's inputs, so all offsets are measured from the start of that
/// tuple's body and the method identifier never shifts them.
///
/// # Errors
///
/// When any value does not fit its declared type. No bytes are produced on
/// failure.
pub fn encode(selector: &FunctionSelector, values: &[Value], hash: HashFn) -> Result<Vec<u8>> {
    let body = encode_raw(values, &selector.inputs)?;

    let mut out = Vec::with_capacity(body.len() + 4);
    if let Some(method_id) = selector.method_id(hash) {
        out.extend_from_slice(&method_id);
    }
    out.extend_from_slice(&body);
    Ok(out)
}

/// Encodes `values` against the field vector `params` as a bare tuple, with
/// no method-identifier prefix.
///
/// # Errors
///
/// When the number of values does not match the number of fields, or when
/// any value does not fit its declared type.
pub fn encode_raw(values: &[Value], params: &[Param]) -> Result<Vec<u8>> {
    if values.len() != params.len() {
        return Err(Error::ArityMismatch {
            tp:       render_params(params),
            expected: params.len(),
            actual:   values.len(),
        });
    }
    encode_tuple(params, values)
}

/// Encodes the fields of a tuple using the head/tail discipline.
fn encode_tuple(params: &[Param], values: &[Value]) -> Result<Vec<u8>> {
    let head_size: usize = params.iter().map(|param| param.tp.head_size()).sum();

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();
    for (param, value) in params.iter().zip(values) {
        if param.tp.is_dynamic() {
            head.extend_from_slice(&usize_word(head_size + tail.len()));
            tail.extend_from_slice(&encode_value(&param.tp, value)?);
        } else {
            head.extend_from_slice(&encode_value(&param.tp, value)?);
        }
    }

    head.extend_from_slice(&tail);
    Ok(head)
}

/// Encodes a run of array elements that all share the element type `tp`.
///
/// The elements encode exactly as a tuple of identical field types would,
/// including the inlining of static aggregates. A zero-length run encodes to
/// the empty byte string.
fn encode_sequence(tp: &AbiType, values: &[Value]) -> Result<Vec<u8>> {
    let head_size = values.len() * tp.head_size();

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();
    for value in values {
        if tp.is_dynamic() {
            head.extend_from_slice(&usize_word(head_size + tail.len()));
            tail.extend_from_slice(&encode_value(tp, value)?);
        } else {
            head.extend_from_slice(&encode_value(tp, value)?);
        }
    }

    head.extend_from_slice(&tail);
    Ok(head)
}

/// Encodes a single value of the type `tp`.
fn encode_value(tp: &AbiType, value: &Value) -> Result<Vec<u8>> {
    match tp {
        AbiType::UInt { size } => Ok(encode_uint(*size, value, tp)?.to_vec()),
        AbiType::Int { size } => Ok(encode_int(*size, value, tp)?.to_vec()),
        AbiType::Address => Ok(encode_address(value, tp)?.to_vec()),
        AbiType::Bool => encode_bool(value, tp),
        AbiType::Bytes { length } => encode_fixed_bytes(*length, value, tp),
        AbiType::Function => encode_function(value, tp),
        AbiType::DynBytes | AbiType::String => {
            let payload = byte_payload(value).ok_or_else(|| mismatch(tp, value))?;
            Ok(packed_bytes(payload))
        }
        AbiType::Fixed { .. } | AbiType::UFixed { .. } => {
            Err(Error::UnsupportedType(tp.to_string()))
        }
        AbiType::Array { size, tp: element } => {
            let Value::Array(elements) = value else {
                return Err(mismatch(tp, value));
            };
            if elements.len() != *size {
                return Err(Error::ArityMismatch {
                    tp:       tp.to_string(),
                    expected: *size,
                    actual:   elements.len(),
                });
            }
            encode_sequence(element, elements)
        }
        AbiType::DynArray { tp: element } => {
            let Value::Array(elements) = value else {
                return Err(mismatch(tp, value));
            };
            let mut out = usize_word(elements.len()).to_vec();
            out.extend_from_slice(&encode_sequence(element, elements)?);
            Ok(out)
        }
        AbiType::Tuple { elements } | AbiType::Struct { elements, .. } => {
            let Value::Tuple(values) = value else {
                return Err(mismatch(tp, value));
            };
            if values.len() != elements.len() {
                return Err(Error::ArityMismatch {
                    tp:       tp.to_string(),
                    expected: elements.len(),
                    actual:   values.len(),
                });
            }
            encode_tuple(elements, values)
        }
    }
}

/// Encodes an unsigned integer of `size` bits, left-padded to a word.
///
/// Accepts either an unsigned integer value or an unsigned big-endian byte
/// string of at most one word.
fn encode_uint(size: usize, value: &Value, tp: &AbiType) -> Result<[u8; WORD_SIZE_BYTES]> {
    let uint = match value {
        Value::UInt(uint) => *uint,
        Value::Bytes(bytes) if bytes.len() <= WORD_SIZE_BYTES => {
            let mut word = [0u8; WORD_SIZE_BYTES];
            word[WORD_SIZE_BYTES - bytes.len()..].copy_from_slice(bytes);
            U256::from_be_bytes(word)
        }
        _ => return Err(mismatch(tp, value)),
    };

    let bits_used = WORD_SIZE_BITS - uint.leading_zeros() as usize;
    if bits_used > size {
        return Err(Error::Overflow {
            tp:    tp.to_string(),
            value: format!("{uint:#x}"),
        });
    }
    Ok(uint.to_be_bytes())
}

/// Encodes a signed integer of `size` bits in two's complement,
/// sign-extended to a word.
fn encode_int(size: usize, value: &Value, tp: &AbiType) -> Result<[u8; WORD_SIZE_BYTES]> {
    let int = match value {
        Value::Int(int) => *int,
        Value::UInt(uint) => {
            // A set top bit cannot be a non-negative signed value.
            if uint.leading_zeros() == 0 {
                return Err(Error::Overflow {
                    tp:    tp.to_string(),
                    value: format!("{uint:#x}"),
                });
            }
            I256::from_be_bytes(uint.to_be_bytes())
        }
        _ => return Err(mismatch(tp, value)),
    };

    // The value fits in `size` bits iff sign-extending the low `size` bits
    // reproduces it.
    let word = int.to_be_bytes();
    if size < WORD_SIZE_BITS {
        let payload = size / BYTE_SIZE_BITS;
        let fill = if int.is_negative() { 0xff } else { 0x00 };
        let extended = word[..WORD_SIZE_BYTES - payload].iter().all(|byte| *byte == fill);
        let sign_kept = (word[WORD_SIZE_BYTES - payload] & 0x80 == 0) == (fill == 0x00);
        if !extended || !sign_kept {
            return Err(Error::Overflow {
                tp:    tp.to_string(),
                value: format!("{int}"),
            });
        }
    }
    Ok(word)
}

/// Encodes an address, left-padded to a word.
///
/// Accepts an address value, an unsigned integer of at most 160 bits, or a
/// 20-byte byte string.
fn encode_address(value: &Value, tp: &AbiType) -> Result<[u8; WORD_SIZE_BYTES]> {
    match value {
        Value::Address(address) => {
            let mut word = [0u8; WORD_SIZE_BYTES];
            word[WORD_SIZE_BYTES - ADDRESS_SIZE_BYTES..].copy_from_slice(address);
            Ok(word)
        }
        Value::UInt(_) => encode_uint(ADDRESS_SIZE_BYTES * BYTE_SIZE_BITS, value, tp),
        Value::Bytes(bytes) if bytes.len() == ADDRESS_SIZE_BYTES => {
            let mut word = [0u8; WORD_SIZE_BYTES];
            word[WORD_SIZE_BYTES - ADDRESS_SIZE_BYTES..].copy_from_slice(bytes);
            Ok(word)
        }
        _ => Err(mismatch(tp, value)),
    }
}

/// Encodes a boolean as a word holding zero or one.
fn encode_bool(value: &Value, tp: &AbiType) -> Result<Vec<u8>> {
    let Value::Bool(flag) = value else {
        return Err(mismatch(tp, value));
    };
    let mut word = vec![0u8; WORD_SIZE_BYTES];
    word[WORD_SIZE_BYTES - 1] = u8::from(*flag);
    Ok(word)
}

/// Encodes a fixed-size byte string, right-padded to a word.
fn encode_fixed_bytes(length: usize, value: &Value, tp: &AbiType) -> Result<Vec<u8>> {
    let payload = byte_payload(value).ok_or_else(|| mismatch(tp, value))?;
    if payload.len() > length {
        return Err(Error::BytesTooLong {
            tp:      tp.to_string(),
            actual:  payload.len(),
            maximum: length,
        });
    }

    let mut word = vec![0u8; WORD_SIZE_BYTES];
    word[..payload.len()].copy_from_slice(payload);
    Ok(word)
}

/// Encodes an external function reference, left-padded to a word.
fn encode_function(value: &Value, tp: &AbiType) -> Result<Vec<u8>> {
    let Value::Bytes(bytes) = value else {
        return Err(mismatch(tp, value));
    };
    if bytes.len() > FUNCTION_SIZE_BYTES {
        return Err(Error::BytesTooLong {
            tp:      tp.to_string(),
            actual:  bytes.len(),
            maximum: FUNCTION_SIZE_BYTES,
        });
    }

    let mut word = vec![0u8; WORD_SIZE_BYTES];
    word[WORD_SIZE_BYTES - bytes.len()..].copy_from_slice(bytes);
    Ok(word)
}

/// Encodes a dynamic byte string: a length word followed by the bytes,
/// right-padded with zeroes to the next word boundary.
fn packed_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = usize_word(bytes.len()).to_vec();
    out.extend_from_slice(bytes);

    let remainder = bytes.len() % WORD_SIZE_BYTES;
    if remainder != 0 {
        out.resize(out.len() + WORD_SIZE_BYTES - remainder, 0);
    }
    out
}

/// Extracts the raw bytes of a byte-string or string value.
fn byte_payload(value: &Value) -> Option<&[u8]> {
    match value {
        Value::Bytes(bytes) | Value::String(bytes) => Some(bytes.as_slice()),
        _ => None,
    }
}

/// Renders a word holding the machine integer `value`.
fn usize_word(value: usize) -> [u8; WORD_SIZE_BYTES] {
    U256::from(value as u128).to_be_bytes()
}

/// Constructs the error for a value whose shape does not match its declared
/// type.
fn mismatch(tp: &AbiType, value: &Value) -> Error {
    Error::TypeMismatch {
        tp:     tp.to_string(),
        actual: value.kind().to_string(),
    }
}

/// Renders a field vector as a tuple type for error messages.
fn render_params(params: &[Param]) -> String {
    let rendered = params.iter().map(|param| param.tp.to_string()).join(",");
    format!("({rendered})")
}

#[cfg(test)]
mod test {
    use ethnum::I256;

    use super::encode_raw;
    use crate::{
        error::encoding::Error,
        types::{AbiType, Param},
        value::Value,
    };

    fn params(types: impl IntoIterator<Item = AbiType>) -> Vec<Param> {
        types.into_iter().map(Param::new).collect()
    }

    #[test]
    fn left_pads_unsigned_integers() {
        let encoded = encode_raw(&[Value::from(69_u64)], &params([AbiType::uint(32)])).unwrap();
        assert_eq!(
            hex::encode(encoded),
            "0000000000000000000000000000000000000000000000000000000000000045"
        );
    }

    #[test]
    fn sign_extends_negative_integers() {
        let encoded =
            encode_raw(&[Value::from(-1_i64)], &params([AbiType::int(8)])).unwrap();
        assert_eq!(
            hex::encode(encoded),
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        );
    }

    #[test]
    fn bounds_signed_integers_by_their_width() {
        assert!(encode_raw(&[Value::from(127_i64)], &params([AbiType::int(8)])).is_ok());
        assert!(encode_raw(&[Value::from(-128_i64)], &params([AbiType::int(8)])).is_ok());

        let error = encode_raw(&[Value::from(128_i64)], &params([AbiType::int(8)])).unwrap_err();
        assert!(matches!(error, Error::Overflow { .. }));
        let error = encode_raw(&[Value::from(-129_i64)], &params([AbiType::int(8)])).unwrap_err();
        assert!(matches!(error, Error::Overflow { .. }));
    }

    #[test]
    fn rejects_unsigned_overflow_without_output() {
        let error = encode_raw(&[Value::from(9999_u64)], &params([AbiType::uint(8)])).unwrap_err();
        assert!(matches!(error, Error::Overflow { .. }));
    }

    #[test]
    fn accepts_big_endian_bytes_for_unsigned_integers() {
        let encoded =
            encode_raw(&[Value::bytes(vec![0x01, 0x00])], &params([AbiType::uint(16)])).unwrap();
        assert_eq!(
            hex::encode(encoded),
            "0000000000000000000000000000000000000000000000000000000000000100"
        );
    }

    #[test]
    fn right_pads_fixed_byte_strings() {
        let encoded =
            encode_raw(&[Value::bytes(b"abc".to_vec())], &params([AbiType::bytes(3)])).unwrap();
        assert_eq!(
            hex::encode(encoded),
            "6162630000000000000000000000000000000000000000000000000000000000"
        );

        let error =
            encode_raw(&[Value::bytes(b"abcd".to_vec())], &params([AbiType::bytes(3)]))
                .unwrap_err();
        assert!(matches!(error, Error::BytesTooLong { .. }));
    }

    #[test]
    fn encodes_dynamic_bytes_with_length_and_padding() {
        let encoded =
            encode_raw(&[Value::string("BAT")], &params([AbiType::String])).unwrap();
        assert_eq!(
            hex::encode(encoded),
            "0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000003\
             4241540000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn an_empty_dynamic_array_is_a_single_length_word() {
        let encoded = encode_raw(
            &[Value::Array(vec![])],
            &params([AbiType::dyn_array(AbiType::Address)]),
        )
        .unwrap();
        assert_eq!(
            hex::encode(encoded),
            "0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn a_zero_length_fixed_array_encodes_to_nothing() {
        let encoded = encode_raw(
            &[Value::Array(vec![]), Value::from(1_u64)],
            &params([AbiType::array(0, AbiType::String), AbiType::uint(256)]),
        )
        .unwrap();
        assert_eq!(
            hex::encode(encoded),
            "0000000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn inlines_static_tuples_in_the_head() {
        let inner = AbiType::tuple([AbiType::uint(256), AbiType::uint(256)]);
        let outer = AbiType::tuple([AbiType::uint(256), inner]);

        let value = Value::Tuple(vec![
            Value::from(0x11_u64),
            Value::Tuple(vec![Value::from(0x22_u64), Value::from(0x33_u64)]),
        ]);
        let encoded = encode_raw(&[value, Value::string("Ether Token")], &params([
            outer,
            AbiType::String,
        ]))
        .unwrap();

        assert_eq!(
            hex::encode(encoded),
            "0000000000000000000000000000000000000000000000000000000000000011\
             0000000000000000000000000000000000000000000000000000000000000022\
             0000000000000000000000000000000000000000000000000000000000000033\
             0000000000000000000000000000000000000000000000000000000000000080\
             000000000000000000000000000000000000000000000000000000000000000b\
             457468657220546f6b656e000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn measures_offsets_from_the_tuple_body() {
        let encoded = encode_raw(
            &[Value::from(1_u64), Value::string("ab"), Value::string("cd")],
            &params([AbiType::uint(256), AbiType::String, AbiType::String]),
        )
        .unwrap();

        // Three head words, then each string's tail at offsets 0x60 and 0xa0.
        assert_eq!(
            hex::encode(encoded),
            "0000000000000000000000000000000000000000000000000000000000000001\
             0000000000000000000000000000000000000000000000000000000000000060\
             00000000000000000000000000000000000000000000000000000000000000a0\
             0000000000000000000000000000000000000000000000000000000000000002\
             6162000000000000000000000000000000000000000000000000000000000000\
             0000000000000000000000000000000000000000000000000000000000000002\
             6364000000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn refuses_fixed_point_values() {
        let error = encode_raw(
            &[Value::from(1_u64)],
            &params([AbiType::Fixed { m: 128, n: 19 }]),
        )
        .unwrap_err();
        assert_eq!(error, Error::UnsupportedType("fixed128x19".to_string()));
    }

    #[test]
    fn reports_arity_mismatches() {
        let error = encode_raw(&[], &params([AbiType::Bool])).unwrap_err();
        assert!(matches!(error, Error::ArityMismatch { expected: 1, actual: 0, .. }));
    }

    #[test]
    fn accepts_the_full_signed_range() {
        assert!(encode_raw(&[Value::from(I256::MAX)], &params([AbiType::int(256)])).is_ok());
        assert!(encode_raw(&[Value::from(I256::MIN)], &params([AbiType::int(256)])).is_ok());
    }
}
