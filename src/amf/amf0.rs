//! AMF0 encoder and decoder
//!
//! AMF0 is the original Action Message Format used by Flash remoting and
//! RTMP. All integers are big-endian; see [`Marker`](super::marker::Marker)
//! for the marker table.
//!
//! The decoder keeps a reference table: every object, ECMA array and strict
//! array gets a slot in order of appearance, reserved before its children
//! are read. A reference marker (0x07) addresses one of those slots. The
//! encoder keeps no such table and writes shared substructure in full.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{AmfError, BoxError, Result};
use super::config::{DecoderConfig, EncoderConfig, SHORT_STRING_MAX};
use super::marker::Marker;
use super::record::AmfRecord;
use super::utf8;
use super::value::AmfValue;
use super::xml::XmlValidator;

/// Empty key followed by the object-end marker
const OBJECT_END_SEQUENCE: [u8; 3] = [0x00, 0x00, Marker::ObjectEnd as u8];

/// Cap on capacity pre-allocated from a declared element count
const MAX_PREALLOC: usize = 1024;

/// Completed reference-table entry
struct Slot {
    value: AmfValue,
    /// `value.node_count()`, charged against the expansion budget on each use
    nodes: usize,
}

/// AMF0 decoder over an in-memory buffer
///
/// One decoder is one decode session: its reference table starts empty and
/// grows for as long as the decoder lives.
pub struct Amf0Decoder {
    buf: Bytes,
    /// Reference table; `None` marks a slot whose value is still being decoded
    references: Vec<Option<Slot>>,
    config: DecoderConfig,
    xml_validator: Option<Arc<dyn XmlValidator>>,
    /// Current nesting depth
    depth: usize,
    /// Values copied out of the reference table so far
    expanded: usize,
}

impl Amf0Decoder {
    /// Create a decoder with default settings
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self::with_config(data, DecoderConfig::default())
    }

    /// Create a decoder with explicit settings
    pub fn with_config(data: impl Into<Bytes>, config: DecoderConfig) -> Self {
        Self {
            buf: data.into(),
            references: Vec::new(),
            config,
            xml_validator: None,
            depth: 0,
            expanded: 0,
        }
    }

    /// Check every decoded XML document with `validator`
    pub fn with_xml_validator(mut self, validator: impl XmlValidator + 'static) -> Self {
        self.xml_validator = Some(Arc::new(validator));
        self
    }

    /// Whether unconsumed bytes remain
    pub fn has_next(&self) -> bool {
        self.buf.has_remaining()
    }

    /// Number of unconsumed bytes
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Number of slots in the reference table
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Look up a reference-table slot
    ///
    /// Returns `None` for indices past the table and for slots whose value
    /// is still being decoded.
    pub fn reference(&self, index: u16) -> Option<&AmfValue> {
        self.references
            .get(index as usize)?
            .as_ref()
            .map(|slot| &slot.value)
    }

    /// Clear the reference table, starting a new session over the
    /// remaining bytes
    pub fn reset(&mut self) {
        self.references.clear();
        self.depth = 0;
        self.expanded = 0;
    }

    /// Decode one complete value, including all of its children
    pub fn decode(&mut self) -> Result<AmfValue> {
        self.depth = 0;
        self.decode_nested()
    }

    /// Decode values until the buffer is exhausted
    pub fn decode_all(&mut self) -> Result<Vec<AmfValue>> {
        let mut values = Vec::new();
        while self.has_next() {
            values.push(self.decode()?);
        }
        Ok(values)
    }

    fn decode_nested(&mut self) -> Result<AmfValue> {
        self.need(1)?;
        let marker = self.buf.get_u8();
        self.decode_marked(marker)
    }

    fn decode_marked(&mut self, marker: u8) -> Result<AmfValue> {
        if self.depth >= self.config.max_depth {
            return Err(AmfError::NestingTooDeep {
                limit: self.config.max_depth,
            });
        }

        self.depth += 1;
        let result = self.decode_value(marker);
        self.depth -= 1;
        result
    }

    fn decode_value(&mut self, marker: u8) -> Result<AmfValue> {
        let kind = match Marker::from_byte(marker) {
            Some(kind) if kind.is_supported() => kind,
            _ => {
                tracing::debug!(marker = marker, "Unsupported AMF0 marker");
                return Err(AmfError::UnsupportedMarker(marker));
            }
        };

        match kind {
            Marker::Number => {
                self.need(8)?;
                Ok(AmfValue::Number(self.buf.get_f64()))
            }
            Marker::Boolean => {
                self.need(1)?;
                Ok(AmfValue::Boolean(self.buf.get_u8() != 0))
            }
            Marker::String => Ok(AmfValue::String(self.read_utf8()?)),
            Marker::LongString => Ok(AmfValue::String(self.read_utf8_long()?)),
            Marker::Object => self.decode_object(),
            Marker::Null | Marker::Undefined | Marker::Unsupported => Ok(AmfValue::Null),
            Marker::Reference => self.decode_reference(),
            Marker::EcmaArray => self.decode_ecma_array(),
            Marker::StrictArray => self.decode_strict_array(),
            Marker::Date => self.decode_date(),
            Marker::XmlDocument => self.decode_xml(),
            Marker::MovieClip
            | Marker::ObjectEnd
            | Marker::RecordSet
            | Marker::TypedObject
            | Marker::AvmPlus => Err(AmfError::UnsupportedMarker(marker)),
        }
    }

    /// Object: key/value pairs until an empty key followed by object end
    fn decode_object(&mut self) -> Result<AmfValue> {
        let slot = self.reserve_slot();
        let mut properties = HashMap::new();

        loop {
            let key = self.read_utf8()?;
            self.need(1)?;
            let marker = self.buf.get_u8();

            if marker == Marker::ObjectEnd as u8 {
                if !key.is_empty() {
                    return Err(AmfError::malformed(format!(
                        "object end marker after key {:?}",
                        key
                    )));
                }
                break;
            }

            let value = self.decode_marked(marker)?;
            properties.insert(key, value);
        }

        Ok(self.fill_slot(slot, AmfValue::Map(properties)))
    }

    /// ECMA array: exactly the declared number of key/value pairs
    fn decode_ecma_array(&mut self) -> Result<AmfValue> {
        self.need(4)?;
        let count = self.buf.get_u32() as usize;

        let slot = self.reserve_slot();
        let mut properties = HashMap::with_capacity(count.min(MAX_PREALLOC));

        for _ in 0..count {
            let key = self.read_utf8()?;
            let value = self.decode_nested()?;
            properties.insert(key, value);
        }

        if self.config.skip_ecma_array_end_marker && self.buf.starts_with(&OBJECT_END_SEQUENCE) {
            tracing::debug!(slot = slot, "Skipping ECMA array end marker");
            self.buf.advance(OBJECT_END_SEQUENCE.len());
        }

        Ok(self.fill_slot(slot, AmfValue::Map(properties)))
    }

    fn decode_strict_array(&mut self) -> Result<AmfValue> {
        self.need(4)?;
        let count = self.buf.get_u32() as usize;

        let slot = self.reserve_slot();
        let mut elements = Vec::with_capacity(count.min(MAX_PREALLOC));

        for _ in 0..count {
            elements.push(self.decode_nested()?);
        }

        Ok(self.fill_slot(slot, AmfValue::Array(elements)))
    }

    fn decode_reference(&mut self) -> Result<AmfValue> {
        self.need(2)?;
        let index = self.buf.get_u16();

        match self.references.get(index as usize) {
            Some(Some(slot)) => {
                let expanded = self.expanded.saturating_add(slot.nodes);
                if expanded > self.config.max_reference_expansion {
                    tracing::debug!(
                        index = index,
                        nodes = slot.nodes,
                        limit = self.config.max_reference_expansion,
                        "AMF0 reference expansion limit reached"
                    );
                    return Err(AmfError::ReferenceExpansion {
                        limit: self.config.max_reference_expansion,
                    });
                }
                self.expanded = expanded;

                tracing::trace!(index = index, "Resolved AMF0 reference");
                Ok(slot.value.clone())
            }
            Some(None) => {
                // Points at the value being decoded or one of its ancestors
                tracing::trace!(index = index, "Deferred AMF0 reference to open slot");
                Ok(AmfValue::Reference(index))
            }
            None => {
                tracing::debug!(
                    index = index,
                    table_size = self.references.len(),
                    "Invalid AMF0 reference"
                );
                Err(AmfError::InvalidReference {
                    index,
                    table_size: self.references.len(),
                })
            }
        }
    }

    fn decode_date(&mut self) -> Result<AmfValue> {
        self.need(10)?;

        let millis = self.buf.get_f64();
        let _timezone = self.buf.get_i16(); // Reserved, always 0

        Ok(AmfValue::Date(millis as i64))
    }

    fn decode_xml(&mut self) -> Result<AmfValue> {
        let document = self.read_utf8_long()?;

        if let Some(validator) = &self.xml_validator {
            validator
                .validate(&document)
                .map_err(|e| AmfError::malformed_with("XML document rejected", e))?;
        }

        Ok(AmfValue::Xml(document))
    }

    fn reserve_slot(&mut self) -> usize {
        let slot = self.references.len();
        self.references.push(None);
        tracing::trace!(slot = slot, "Reserved AMF0 reference slot");
        slot
    }

    fn fill_slot(&mut self, slot: usize, value: AmfValue) -> AmfValue {
        self.references[slot] = Some(Slot {
            nodes: value.node_count(),
            value: value.clone(),
        });
        value
    }

    fn need(&self, needed: usize) -> Result<()> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(AmfError::TruncatedInput { needed, remaining });
        }
        Ok(())
    }

    /// Read UTF-8 string with 16-bit length prefix
    fn read_utf8(&mut self) -> Result<String> {
        self.need(2)?;
        let len = self.buf.get_u16() as usize;
        self.read_text(len)
    }

    /// Read UTF-8 string with 32-bit length prefix
    fn read_utf8_long(&mut self) -> Result<String> {
        self.need(4)?;
        let len = self.buf.get_u32() as usize;
        self.read_text(len)
    }

    fn read_text(&mut self, len: usize) -> Result<String> {
        self.need(len)?;
        let bytes = self.buf.split_to(len);
        utf8::decode(&bytes)
    }
}

/// AMF0 encoder
///
/// Append-only: each `encode` call writes one complete value after the
/// previous ones. A call that fails leaves the buffer as it was before
/// the call.
pub struct Amf0Encoder {
    buf: BytesMut,
    config: EncoderConfig,
    depth: usize,
}

impl Amf0Encoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self::with_config(EncoderConfig::default())
    }

    /// Create encoder with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(EncoderConfig {
            initial_capacity: capacity,
            ..EncoderConfig::default()
        })
    }

    /// Create an encoder with explicit settings
    pub fn with_config(config: EncoderConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(config.initial_capacity),
            config,
            depth: 0,
        }
    }

    /// Bytes written so far
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Get the encoded bytes and reset encoder
    pub fn finish(&mut self) -> Bytes {
        self.buf.split().freeze()
    }

    /// Get current encoded length
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if encoder is empty
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Encode a single AMF0 value
    pub fn encode(&mut self, value: &AmfValue) -> Result<()> {
        let mark = self.buf.len();
        self.depth = 0;
        let result = self.write_value(value);
        if result.is_err() {
            self.buf.truncate(mark);
        }
        result
    }

    /// Encode multiple values
    ///
    /// Stops at the first failure; values before it stay in the buffer.
    pub fn encode_all(&mut self, values: &[AmfValue]) -> Result<()> {
        for value in values {
            self.encode(value)?;
        }
        Ok(())
    }

    /// Encode a host record as an object (0x03)
    ///
    /// A field whose value cannot be read or encoded is written as null.
    /// Only a field name that does not fit a 16-bit length fails the call.
    pub fn encode_record(&mut self, record: &dyn AmfRecord) -> Result<()> {
        let mark = self.buf.len();
        self.depth = 0;
        let result = self.write_record(record);
        if result.is_err() {
            self.buf.truncate(mark);
        }
        result
    }

    fn write_record(&mut self, record: &dyn AmfRecord) -> Result<()> {
        self.enter()?;
        self.buf.put_u8(Marker::Object as u8);

        for name in record.field_names() {
            self.write_key(name)?;

            let mark = self.buf.len();
            let written = record
                .read_field(name)
                .and_then(|value| self.write_value(&value).map_err(BoxError::from));

            if let Err(e) = written {
                tracing::debug!(field = name, error = %e, "Record field encoded as null");
                self.buf.truncate(mark);
                self.buf.put_u8(Marker::Null as u8);
            }
        }

        self.buf.put_slice(&OBJECT_END_SEQUENCE);
        self.depth -= 1;
        Ok(())
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.config.max_depth {
            return Err(AmfError::NestingTooDeep {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn write_value(&mut self, value: &AmfValue) -> Result<()> {
        self.enter()?;
        let result = self.write_payload(value);
        self.depth -= 1;
        result
    }

    fn write_payload(&mut self, value: &AmfValue) -> Result<()> {
        match value {
            AmfValue::Null => {
                self.buf.put_u8(Marker::Null as u8);
            }
            AmfValue::Boolean(b) => {
                self.buf.put_u8(Marker::Boolean as u8);
                self.buf.put_u8(if *b { 1 } else { 0 });
            }
            AmfValue::Number(n) => {
                self.buf.put_u8(Marker::Number as u8);
                self.buf.put_f64(*n);
            }
            AmfValue::String(s) => {
                let len = utf8::encoded_len(s);
                if len <= SHORT_STRING_MAX {
                    self.buf.put_u8(Marker::String as u8);
                    self.buf.put_u16(len as u16);
                } else {
                    self.buf.put_u8(Marker::LongString as u8);
                    self.buf.put_u32(long_len(len)?);
                }
                utf8::write(&mut self.buf, s, len);
            }
            AmfValue::Map(props) => {
                self.buf.put_u8(Marker::EcmaArray as u8);
                self.buf.put_u32(long_len(props.len())?);
                for (key, val) in props {
                    self.write_key(key)?;
                    self.write_value(val)?;
                }
                if self.config.ecma_array_end_marker {
                    self.buf.put_slice(&OBJECT_END_SEQUENCE);
                }
            }
            AmfValue::Array(elements) => {
                self.buf.put_u8(Marker::StrictArray as u8);
                self.buf.put_u32(long_len(elements.len())?);
                for elem in elements {
                    self.write_value(elem)?;
                }
            }
            AmfValue::Date(millis) => {
                self.buf.put_u8(Marker::Date as u8);
                self.buf.put_f64(*millis as f64);
                self.buf.put_i16(0); // Timezone (reserved)
            }
            AmfValue::Xml(s) => {
                let len = utf8::encoded_len(s);
                self.buf.put_u8(Marker::XmlDocument as u8);
                self.buf.put_u32(long_len(len)?);
                utf8::write(&mut self.buf, s, len);
            }
            AmfValue::Reference(index) => {
                self.buf.put_u8(Marker::Reference as u8);
                self.buf.put_u16(*index);
            }
        }
        Ok(())
    }

    /// Write a key with 16-bit length prefix (no type marker)
    fn write_key(&mut self, key: &str) -> Result<()> {
        let len = utf8::encoded_len(key);
        if len > SHORT_STRING_MAX {
            return Err(AmfError::LengthOverflow {
                len,
                max: SHORT_STRING_MAX,
            });
        }
        self.buf.put_u16(len as u16);
        utf8::write(&mut self.buf, key, len);
        Ok(())
    }
}

impl Default for Amf0Encoder {
    fn default() -> Self {
        Self::new()
    }
}

fn long_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| AmfError::LengthOverflow {
        len,
        max: u32::MAX as usize,
    })
}

/// Convenience function to encode a single value
pub fn encode(value: &AmfValue) -> Result<Bytes> {
    let mut encoder = Amf0Encoder::new();
    encoder.encode(value)?;
    Ok(encoder.finish())
}

/// Convenience function to encode multiple values
pub fn encode_all(values: &[AmfValue]) -> Result<Bytes> {
    let mut encoder = Amf0Encoder::new();
    encoder.encode_all(values)?;
    Ok(encoder.finish())
}

/// Convenience function to decode a single value
pub fn decode(data: &[u8]) -> Result<AmfValue> {
    let mut decoder = Amf0Decoder::new(Bytes::copy_from_slice(data));
    decoder.decode()
}

/// Convenience function to decode all values
pub fn decode_all(data: &[u8]) -> Result<Vec<AmfValue>> {
    let mut decoder = Amf0Decoder::new(Bytes::copy_from_slice(data));
    decoder.decode_all()
}
