//! This module contains the decoder: the transformation from an encoded
//! buffer and a descriptor back into a vector of values.
//!
//! # Offset Discipline
//!
//! The buffer is treated as the body of a single tuple whose fields are the
//! descriptor's inputs, starting at offset zero. Callers are responsible for
//! stripping a method-identifier prefix before decoding; all offsets inside
//! the buffer are measured from the start of the tuple body they belong to.
//! Offsets are not required to be monotonic, and may legally alias regions of
//! the buffer.
//!
//! # Stack Safety
//!
//! Aggregate types nest to arbitrary depth, so the decoder walks the type
//! tree with an explicit stack of partially-decoded frames rather than
//! descending the call stack. Adversarial buffers and descriptors can never
//! overflow the machine stack, and every read is bounds-checked against the
//! buffer.

use ethnum::{I256, U256};

use crate::{
    constant::{
        ADDRESS_SIZE_BYTES,
        BYTE_SIZE_BITS,
        FUNCTION_SIZE_BYTES,
        WORD_SIZE_BYTES,
    },
    error::{
        container::Locatable,
        decoding::{Error, Result},
    },
    selector::FunctionSelector,
    types::{AbiType, Param},
    value::Value,
};

/// Configuration for the decoder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Whether a decoded string is truncated at the first NUL byte it
    /// contains.
    ///
    /// This is long-standing behaviour that consumers rely on, but it is
    /// asymmetric — the encoder always writes the full byte string — so it
    /// can be disabled to recover exactly what was encoded.
    ///
    /// Defaults to `true`.
    pub nul_truncates_strings: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nul_truncates_strings: true,
        }
    }
}

/// Decodes `buf` as the argument tuple of `selector`, returning the ordered
/// top-level values.
///
/// The buffer must not carry a method-identifier prefix.
///
/// # Errors
///
/// When any read would fall outside the buffer, or when a decoded word is
/// not valid for its declared type.
pub fn decode(selector: &FunctionSelector, buf: &[u8], config: &Config) -> Result<Vec<Value>> {
    decode_raw(buf, &selector.inputs, config)
}

/// Decodes `buf` against the field vector `params`, returning one value per
/// field.
///
/// # Errors
///
/// As for [`decode`].
pub fn decode_raw(buf: &[u8], params: &[Param], config: &Config) -> Result<Vec<Value>> {
    let mut stack = vec![Frame {
        elements: Elements::Fields(params),
        next:     0,
        base:     0,
        cursor:   0,
        values:   Vec::with_capacity(params.len()),
        wrap:     Wrap::Root,
        inline:   false,
    }];

    loop {
        // Fold any completed frame into its parent.
        let frame = stack.last().expect("the frame stack is never empty");
        if frame.next == frame.elements.len() {
            let done = stack.pop().expect("the frame stack is never empty");
            let value = match done.wrap {
                Wrap::Root => return Ok(done.values),
                Wrap::Tuple => Value::Tuple(done.values),
                Wrap::Array => Value::Array(done.values),
            };

            let parent = stack.last_mut().expect("a non-root frame always has a parent");
            parent.values.push(value);
            if done.inline {
                parent.cursor = done.cursor;
            }
            continue;
        }

        let (tp, base, cursor) = {
            let frame = stack.last_mut().expect("the frame stack is never empty");
            let tp = frame.elements.get(frame.next);
            frame.next += 1;
            (tp, frame.base, frame.cursor)
        };

        if tp.is_dynamic() {
            let offset = read_offset(buf, cursor)?;
            let at = base.checked_add(offset).ok_or_else(|| {
                Error::MalformedOffset(format!("{offset:x}")).locate(cursor)
            })?;
            bump_cursor(&mut stack, WORD_SIZE_BYTES);

            match tp {
                AbiType::DynBytes => {
                    let bytes = read_packed_bytes(buf, at)?;
                    push_value(&mut stack, Value::Bytes(bytes));
                }
                AbiType::String => {
                    let mut bytes = read_packed_bytes(buf, at)?;
                    if config.nul_truncates_strings {
                        if let Some(nul) = bytes.iter().position(|byte| *byte == 0) {
                            bytes.truncate(nul);
                        }
                    }
                    push_value(&mut stack, Value::String(bytes));
                }
                AbiType::DynArray { tp: element } => {
                    let count = read_element_count(buf, at, element)?;
                    stack.push(Frame {
                        elements: Elements::Repeated(element.as_ref(), count),
                        next:     0,
                        base:     at + WORD_SIZE_BYTES,
                        cursor:   at + WORD_SIZE_BYTES,
                        values:   Vec::new(),
                        wrap:     Wrap::Array,
                        inline:   false,
                    });
                }
                AbiType::Array { size, tp: element } => {
                    stack.push(Frame {
                        elements: Elements::Repeated(element.as_ref(), *size),
                        next:     0,
                        base:     at,
                        cursor:   at,
                        values:   Vec::new(),
                        wrap:     Wrap::Array,
                        inline:   false,
                    });
                }
                AbiType::Tuple { elements } | AbiType::Struct { elements, .. } => {
                    stack.push(Frame {
                        elements: Elements::Fields(elements),
                        next:     0,
                        base:     at,
                        cursor:   at,
                        values:   Vec::new(),
                        wrap:     Wrap::Tuple,
                        inline:   false,
                    });
                }
                _ => unreachable!("only aggregates and payload types are dynamic"),
            }
        } else {
            match tp {
                AbiType::Tuple { elements } | AbiType::Struct { elements, .. } => {
                    stack.push(Frame {
                        elements: Elements::Fields(elements),
                        next:     0,
                        base:     cursor,
                        cursor,
                        values:   Vec::new(),
                        wrap:     Wrap::Tuple,
                        inline:   true,
                    });
                }
                AbiType::Array { size, tp: element } => {
                    stack.push(Frame {
                        elements: Elements::Repeated(element.as_ref(), *size),
                        next:     0,
                        base:     cursor,
                        cursor,
                        values:   Vec::new(),
                        wrap:     Wrap::Array,
                        inline:   true,
                    });
                }
                _ => {
                    let value = decode_leaf(tp, buf, cursor)?;
                    let frame = stack.last_mut().expect("the frame stack is never empty");
                    frame.cursor += WORD_SIZE_BYTES;
                    frame.values.push(value);
                }
            }
        }
    }
}

/// How a completed frame is packaged into a value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Wrap {
    /// The outermost frame: its values are the decoding result.
    Root,

    /// The frame is a tuple or struct.
    Tuple,

    /// The frame is an array.
    Array,
}

/// The element types of a frame.
///
/// Tuples borrow their field vector from the descriptor; arrays repeat a
/// single element type a known number of times without materialising it.
#[derive(Clone, Copy, Debug)]
enum Elements<'a> {
    Fields(&'a [Param]),
    Repeated(&'a AbiType, usize),
}

impl<'a> Elements<'a> {
    fn len(&self) -> usize {
        match self {
            Self::Fields(fields) => fields.len(),
            Self::Repeated(_, count) => *count,
        }
    }

    fn get(&self, index: usize) -> &'a AbiType {
        match *self {
            Self::Fields(fields) => &fields[index].tp,
            Self::Repeated(tp, _) => tp,
        }
    }
}

/// A partially-decoded aggregate.
struct Frame<'a> {
    /// The element types of the aggregate.
    elements: Elements<'a>,

    /// The index of the next element to decode.
    next: usize,

    /// The absolute buffer position at which the aggregate's body starts.
    /// Offsets read from this frame's head are measured from here.
    base: usize,

    /// The absolute buffer position of the next head slot.
    cursor: usize,

    /// The values decoded so far.
    values: Vec<Value>,

    /// How to package the values once the frame completes.
    wrap: Wrap,

    /// Whether the aggregate was inlined into its parent's head, in which
    /// case the parent's cursor resumes where this frame's cursor ends.
    inline: bool,
}

/// Advances the cursor of the innermost frame by `by` bytes.
fn bump_cursor(stack: &mut [Frame], by: usize) {
    let frame = stack.last_mut().expect("the frame stack is never empty");
    frame.cursor += by;
}

/// Appends a decoded value to the innermost frame.
fn push_value(stack: &mut [Frame], value: Value) {
    let frame = stack.last_mut().expect("the frame stack is never empty");
    frame.values.push(value);
}

/// Decodes a single static leaf from the word at `at`.
fn decode_leaf(tp: &AbiType, buf: &[u8], at: usize) -> Result<Value> {
    let word = read_word(buf, at)?;
    let value = match tp {
        AbiType::UInt { size } => {
            let mut padded = [0u8; WORD_SIZE_BYTES];
            let payload = size / BYTE_SIZE_BITS;
            padded[WORD_SIZE_BYTES - payload..].copy_from_slice(&word[WORD_SIZE_BYTES - payload..]);
            Value::UInt(U256::from_be_bytes(padded))
        }
        AbiType::Int { size } => {
            let payload = size / BYTE_SIZE_BITS;
            let negative = word[WORD_SIZE_BYTES - payload] & 0x80 != 0;
            let mut extended = [if negative { 0xff } else { 0x00 }; WORD_SIZE_BYTES];
            extended[WORD_SIZE_BYTES - payload..]
                .copy_from_slice(&word[WORD_SIZE_BYTES - payload..]);
            Value::Int(I256::from_be_bytes(extended))
        }
        AbiType::Address => {
            let mut address = [0u8; ADDRESS_SIZE_BYTES];
            address.copy_from_slice(&word[WORD_SIZE_BYTES - ADDRESS_SIZE_BYTES..]);
            Value::Address(address)
        }
        AbiType::Bool => {
            let zero_padded = word[..WORD_SIZE_BYTES - 1].iter().all(|byte| *byte == 0);
            if !zero_padded || word[WORD_SIZE_BYTES - 1] > 1 {
                return Err(Error::InvalidBool(hex::encode(word)).locate(at));
            }
            Value::Bool(word[WORD_SIZE_BYTES - 1] == 1)
        }
        AbiType::Bytes { length } => Value::Bytes(word[..*length].to_vec()),
        AbiType::Function => {
            Value::Bytes(word[WORD_SIZE_BYTES - FUNCTION_SIZE_BYTES..].to_vec())
        }
        AbiType::Fixed { .. } | AbiType::UFixed { .. } => {
            return Err(Error::UnsupportedType(tp.to_string()).locate(at));
        }
        _ => unreachable!("aggregates are decoded as frames, not leaves"),
    };

    Ok(value)
}

/// Reads the word at `at`, checking that it lies within the buffer.
fn read_word(buf: &[u8], at: usize) -> Result<[u8; WORD_SIZE_BYTES]> {
    let end = at.checked_add(WORD_SIZE_BYTES).ok_or_else(|| {
        Error::BufferOverrun {
            wanted:    WORD_SIZE_BYTES,
            available: 0,
        }
        .locate(at)
    })?;

    let slice = buf.get(at..end).ok_or_else(|| {
        Error::BufferOverrun {
            wanted:    WORD_SIZE_BYTES,
            available: buf.len().saturating_sub(at),
        }
        .locate(at)
    })?;
    Ok(slice.try_into().expect("the slice is exactly one word"))
}

/// Reads the offset word at `at` as a machine integer.
fn read_offset(buf: &[u8], at: usize) -> Result<usize> {
    let value = U256::from_be_bytes(read_word(buf, at)?);
    if value > U256::from(usize::MAX as u128) {
        return Err(Error::MalformedOffset(format!("{value:x}")).locate(at));
    }
    Ok(value.as_usize())
}

/// Reads a length-prefixed, right-padded byte string starting at `at`.
fn read_packed_bytes(buf: &[u8], at: usize) -> Result<Vec<u8>> {
    let value = U256::from_be_bytes(read_word(buf, at)?);
    if value > U256::from(usize::MAX as u128) {
        return Err(Error::LengthOverflow(format!("{value:x}")).locate(at));
    }
    let length = value.as_usize();

    let start = at + WORD_SIZE_BYTES;
    let end = start.checked_add(length).ok_or_else(|| {
        Error::LengthOverflow(format!("{value:x}")).locate(at)
    })?;
    let bytes = buf.get(start..end).ok_or_else(|| {
        Error::BufferOverrun {
            wanted:    length,
            available: buf.len().saturating_sub(start),
        }
        .locate(start)
    })?;
    Ok(bytes.to_vec())
}

/// Reads the element count of a dynamic array and checks it is plausible
/// for the remaining buffer, so that a hostile count cannot force an
/// enormous allocation before the element reads fail.
fn read_element_count(buf: &[u8], at: usize, element: &AbiType) -> Result<usize> {
    let value = U256::from_be_bytes(read_word(buf, at)?);
    if value > U256::from(usize::MAX as u128) {
        return Err(Error::LengthOverflow(format!("{value:x}")).locate(at));
    }
    let count = value.as_usize();

    let head = element.head_size();
    let implausible = match count.checked_mul(head) {
        // Elements with an empty encoding occupy no bytes at all, so the
        // count is bounded by the buffer length instead.
        Some(0) => count > buf.len(),
        Some(required) => required > buf.len().saturating_sub(at + WORD_SIZE_BYTES),
        None => true,
    };
    if implausible {
        return Err(Error::ImplausibleCount(format!("{value:x}")).locate(at));
    }
    Ok(count)
}
