//! This module contains the codec facade: a thin dispatch layer that binds a
//! hash provider and the subsystem configurations together, and that accepts
//! descriptors in either form — raw signature text or an already-built
//! [`FunctionSelector`].

use std::borrow::Cow;

use serde_json::Value as Json;

use crate::{
    canonical::{self, CanonicalOpts},
    constant::{SELECTOR_SIZE_BYTES, TOPIC_SIZE_BYTES},
    decoder,
    document,
    encoder,
    error::{Error, Result},
    event::{self, DecodedEvent},
    hash::{keccak256, HashFn},
    parser,
    selector::FunctionSelector,
    types::Param,
    value::Value,
};

/// A descriptor source: either signature text, parsed on demand, or an
/// existing descriptor, borrowed as-is.
pub trait ToSelector {
    /// Produces the descriptor this source describes.
    ///
    /// # Errors
    ///
    /// When the source is signature text that does not parse.
    fn to_selector(&self) -> Result<Cow<'_, FunctionSelector>>;
}

impl ToSelector for str {
    fn to_selector(&self) -> Result<Cow<'_, FunctionSelector>> {
        let selector = parser::parse_selector(self)?;
        Ok(Cow::Owned(selector))
    }
}

impl ToSelector for String {
    fn to_selector(&self) -> Result<Cow<'_, FunctionSelector>> {
        self.as_str().to_selector()
    }
}

impl ToSelector for FunctionSelector {
    fn to_selector(&self) -> Result<Cow<'_, FunctionSelector>> {
        Ok(Cow::Borrowed(self))
    }
}

/// The codec itself.
///
/// A codec is cheap to construct and freely shareable; it holds only the
/// hash provider and the subsystem configurations, all of which are
/// immutable once chosen.
#[derive(Clone, Copy, Debug)]
pub struct Codec {
    /// The hash provider used for method identifiers and topic zero.
    hash: HashFn,

    /// The decoder configuration.
    decoder: decoder::Config,

    /// The event codec configuration.
    event: event::Config,
}

impl Codec {
    /// Constructs a codec with the default Keccak-256 provider and default
    /// configurations.
    #[must_use]
    pub fn new() -> Self {
        Self::configured(keccak256, decoder::Config::default(), event::Config::default())
    }

    /// Constructs a codec with the provided `hash` provider and default
    /// configurations.
    #[must_use]
    pub fn with_hasher(hash: HashFn) -> Self {
        Self::configured(hash, decoder::Config::default(), event::Config::default())
    }

    /// Constructs a codec from all of its parts.
    #[must_use]
    pub fn configured(hash: HashFn, decoder: decoder::Config, event: event::Config) -> Self {
        Self {
            hash,
            decoder,
            event,
        }
    }

    /// Parses signature text into a descriptor.
    ///
    /// # Errors
    ///
    /// When the text does not conform to the signature grammar.
    pub fn parse(&self, signature: &str) -> Result<FunctionSelector> {
        Ok(parser::parse_selector(signature)?)
    }

    /// Translates a JSON ABI document into descriptors, skipping items of
    /// unrecognised kinds.
    ///
    /// # Errors
    ///
    /// When the document is structurally malformed.
    pub fn parse_document(&self, abi_document: &Json) -> Result<Vec<FunctionSelector>> {
        Ok(document::parse_document(abi_document)?)
    }

    /// Renders the canonical, hashable signature of `selector`.
    ///
    /// # Errors
    ///
    /// When `selector` is signature text that does not parse.
    pub fn canonical<S>(&self, selector: &S) -> Result<String>
    where
        S: ToSelector + ?Sized,
    {
        let selector = selector.to_selector()?;
        Ok(canonical::canonical(&selector))
    }

    /// Renders the signature of `selector` with the annotations requested in
    /// `opts`.
    ///
    /// # Errors
    ///
    /// When `selector` is signature text that does not parse.
    pub fn canonical_with<S>(&self, selector: &S, opts: CanonicalOpts) -> Result<String>
    where
        S: ToSelector + ?Sized,
    {
        let selector = selector.to_selector()?;
        Ok(canonical::canonical_with(&selector, opts))
    }

    /// Computes the method identifier of `selector`, if it has one.
    ///
    /// # Errors
    ///
    /// When `selector` is signature text that does not parse.
    pub fn method_id<S>(&self, selector: &S) -> Result<Option<[u8; SELECTOR_SIZE_BYTES]>>
    where
        S: ToSelector + ?Sized,
    {
        let selector = selector.to_selector()?;
        Ok(selector.method_id(self.hash))
    }

    /// Computes topic zero of `selector`, if it has one.
    ///
    /// # Errors
    ///
    /// When `selector` is signature text that does not parse.
    pub fn topic0<S>(&self, selector: &S) -> Result<Option<[u8; TOPIC_SIZE_BYTES]>>
    where
        S: ToSelector + ?Sized,
    {
        let selector = selector.to_selector()?;
        Ok(selector.topic0(self.hash))
    }

    /// Encodes `values` as the argument tuple of `selector`, prefixed with
    /// the method identifier when the selector is a named function.
    ///
    /// # Errors
    ///
    /// When `selector` does not parse, or when any value does not fit its
    /// declared type.
    pub fn encode<S>(&self, selector: &S, values: &[Value]) -> Result<Vec<u8>>
    where
        S: ToSelector + ?Sized,
    {
        let selector = selector.to_selector()?;
        Ok(encoder::encode(&selector, values, self.hash)?)
    }

    /// Encodes `values` against a bare field vector, with no prefix.
    ///
    /// # Errors
    ///
    /// When any value does not fit its declared type.
    pub fn encode_raw(&self, values: &[Value], params: &[Param]) -> Result<Vec<u8>> {
        Ok(encoder::encode_raw(values, params)?)
    }

    /// Encodes `values` against the outputs of `selector`, as a contract
    /// would encode its return data. Output encodings never carry a
    /// method-identifier prefix.
    ///
    /// # Errors
    ///
    /// When `selector` does not parse, declares no outputs, or when any
    /// value does not fit its declared type.
    pub fn encode_output<S>(&self, selector: &S, values: &[Value]) -> Result<Vec<u8>>
    where
        S: ToSelector + ?Sized,
    {
        let selector = selector.to_selector()?;
        let outputs = outputs_of(&selector)?;
        Ok(encoder::encode_raw(values, outputs)?)
    }

    /// Decodes `buf` as the argument tuple of `selector`.
    ///
    /// The buffer must not carry a method-identifier prefix; callers strip
    /// the first four bytes of call data before decoding.
    ///
    /// # Errors
    ///
    /// When `selector` does not parse, or when the buffer is not a
    /// well-formed encoding of the argument tuple.
    pub fn decode<S>(&self, selector: &S, buf: &[u8]) -> Result<Vec<Value>>
    where
        S: ToSelector + ?Sized,
    {
        let selector = selector.to_selector()?;
        Ok(decoder::decode(&selector, buf, &self.decoder)?)
    }

    /// Decodes `buf` against a bare field vector.
    ///
    /// # Errors
    ///
    /// When the buffer is not a well-formed encoding of the fields.
    pub fn decode_raw(&self, buf: &[u8], params: &[Param]) -> Result<Vec<Value>> {
        Ok(decoder::decode_raw(buf, params, &self.decoder)?)
    }

    /// Decodes `buf` against the outputs of `selector`, as a caller would
    /// decode returned data.
    ///
    /// # Errors
    ///
    /// When `selector` does not parse, declares no outputs, or when the
    /// buffer is not a well-formed encoding of the outputs.
    pub fn decode_output<S>(&self, selector: &S, buf: &[u8]) -> Result<Vec<Value>>
    where
        S: ToSelector + ?Sized,
    {
        let selector = selector.to_selector()?;
        let outputs = outputs_of(&selector)?;
        Ok(decoder::decode_raw(buf, outputs, &self.decoder)?)
    }

    /// Decodes the event log given by `data` and `topics` against
    /// `selector`, verifying topic zero unless configured otherwise.
    ///
    /// # Errors
    ///
    /// When `selector` does not parse, or when the log does not match the
    /// descriptor.
    pub fn decode_event<S>(
        &self,
        selector: &S,
        data: &[u8],
        topics: &[[u8; TOPIC_SIZE_BYTES]],
    ) -> Result<DecodedEvent>
    where
        S: ToSelector + ?Sized,
    {
        let selector = selector.to_selector()?;
        Ok(event::decode_event(
            &selector,
            data,
            topics,
            self.hash,
            &self.event,
            &self.decoder,
        )?)
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

/// Gets the output fields of a selector, or the error for one that declares
/// none.
fn outputs_of(selector: &FunctionSelector) -> Result<&[Param]> {
    selector
        .outputs
        .as_deref()
        .ok_or_else(|| Error::MissingOutputs(canonical::canonical(selector)))
}
