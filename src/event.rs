//! This module contains the event codec: the splitting of an event log into
//! its indexed parameters, carried in topic slots, and its non-indexed
//! parameters, carried in the data payload.
//!
//! # Topic Zero
//!
//! For a non-anonymous event, the first topic is the full hash of the
//! canonical event signature. By default the codec verifies it against the
//! descriptor and refuses logs that do not match; disabling the check makes
//! the codec usable with anonymous events, whose logs carry no signature
//! topic at all.
//!
//! # Indexed Dynamic Parameters
//!
//! An indexed parameter of a dynamic (or otherwise reference-shaped) type is
//! stored as the hash of its value, not the value itself. The codec returns
//! such topics verbatim as 32-byte opaque values; it never attempts to
//! recover the preimage.

use std::collections::BTreeMap;

use crate::{
    canonical,
    constant::TOPIC_SIZE_BYTES,
    decoder,
    error::event::{Error, Result},
    hash::HashFn,
    selector::FunctionSelector,
    types::{AbiType, Param},
    value::Value,
};

/// Configuration for the event codec.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Whether topic zero is required to equal the hash of the canonical
    /// event signature.
    ///
    /// When enabled, the log must carry one more topic than the descriptor
    /// has indexed inputs. When disabled, the topics are consumed by the
    /// indexed inputs alone.
    ///
    /// Defaults to `true`.
    pub check_signature: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            check_signature: true,
        }
    }
}

/// A decoded event log: the event name together with its parameters, keyed
/// by field name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedEvent {
    /// The name of the event, taken from the descriptor.
    pub name: Option<String>,

    /// All parameters of the event, indexed and non-indexed alike. Fields
    /// without a declared name are keyed as `var<index>` by their position
    /// among the inputs.
    pub fields: BTreeMap<String, Value>,
}

/// Decodes the event log given by `data` and `topics` against `selector`.
///
/// Indexed inputs are decoded from the topic slots in declaration order;
/// non-indexed inputs are decoded from the data payload as an ordinary
/// argument tuple. The two are merged into a single named map.
///
/// # Errors
///
/// When the topic count does not match the descriptor, when topic zero does
/// not match the canonical signature hash (if checking is enabled), or when
/// the data payload does not decode.
pub fn decode_event(
    selector: &FunctionSelector,
    data: &[u8],
    topics: &[[u8; TOPIC_SIZE_BYTES]],
    hash: HashFn,
    config: &Config,
    decoder_config: &decoder::Config,
) -> Result<DecodedEvent> {
    let mut indexed: Vec<(usize, &Param)> = Vec::new();
    let mut non_indexed: Vec<(usize, &Param)> = Vec::new();
    for (position, param) in selector.inputs.iter().enumerate() {
        if param.indexed {
            indexed.push((position, param));
        } else {
            non_indexed.push((position, param));
        }
    }

    let signature_topics = usize::from(config.check_signature);
    let expected = indexed.len() + signature_topics;
    if topics.len() != expected {
        return Err(Error::TopicCountMismatch {
            actual: topics.len(),
            expected,
        });
    }

    let mut fields = BTreeMap::new();

    // The signature topic, when present, occupies slot zero; the indexed
    // inputs consume the remaining slots in declaration order.
    let value_topics = &topics[signature_topics..];
    for ((position, param), topic) in indexed.iter().zip(value_topics) {
        let value = decode_topic(param, topic, decoder_config)?;
        fields.insert(field_key(param, *position), value);
    }

    let data_params: Vec<Param> = non_indexed.iter().map(|(_, param)| (*param).clone()).collect();
    let data_values = decoder::decode_raw(data, &data_params, decoder_config)?;
    for ((position, param), value) in non_indexed.iter().zip(data_values) {
        fields.insert(field_key(param, *position), value);
    }

    if config.check_signature {
        let expected = hash(canonical::canonical(selector).as_bytes());
        if topics[0] != expected {
            return Err(Error::SignatureMismatch {
                expected: hex::encode(expected),
                actual:   hex::encode(topics[0]),
            });
        }
    }

    Ok(DecodedEvent {
        name: selector.name.clone(),
        fields,
    })
}

/// Decodes a single topic slot against the field that occupies it.
///
/// Static leaves decode as they would in a data payload. Anything
/// reference-shaped was hashed into the topic by the emitter, so the topic is
/// passed through verbatim.
fn decode_topic(
    param: &Param,
    topic: &[u8; TOPIC_SIZE_BYTES],
    decoder_config: &decoder::Config,
) -> Result<Value> {
    let opaque = param.tp.is_dynamic()
        || matches!(
            param.tp,
            AbiType::Array { .. } | AbiType::Tuple { .. } | AbiType::Struct { .. }
        );
    if opaque {
        return Ok(Value::Bytes(topic.to_vec()));
    }

    let leaf = Param::new(param.tp.clone());
    let mut values = decoder::decode_raw(topic, std::slice::from_ref(&leaf), decoder_config)?;
    Ok(values.remove(0))
}

/// The map key for a field: its declared name, or `var<index>` by position.
fn field_key(param: &Param, position: usize) -> String {
    param
        .name
        .clone()
        .unwrap_or_else(|| format!("var{position}"))
}
