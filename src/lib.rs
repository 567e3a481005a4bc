//! amf0-rs: AMF0 encoder and decoder
//!
//! This library converts between [`AmfValue`] and the AMF0 wire format:
//! - Decoding with a per-session reference table for shared and
//!   self-referential objects and arrays
//! - Encoding with automatic long-string cutover
//! - Host records written as AMF0 objects via [`AmfRecord`]
//! - Optional XML document checking through an external [`XmlValidator`]
//!
//! # Example
//!
//! ```
//! use amf0_rs::{Amf0Decoder, Amf0Encoder, AmfValue};
//!
//! # fn main() -> amf0_rs::Result<()> {
//! let mut encoder = Amf0Encoder::new();
//! encoder.encode(&AmfValue::Number(123.65))?;
//! encoder.encode(&AmfValue::Boolean(true))?;
//! encoder.encode(&AmfValue::String("hello".into()))?;
//! encoder.encode(&AmfValue::Null)?;
//!
//! let mut decoder = Amf0Decoder::new(encoder.finish());
//! let mut values = Vec::new();
//! while decoder.has_next() {
//!     values.push(decoder.decode()?);
//! }
//! assert_eq!(values.len(), 4);
//! assert_eq!(values[2].as_str(), Some("hello"));
//! # Ok(())
//! # }
//! ```

pub mod amf;
pub mod error;

// Re-export main types for convenience
pub use amf::{
    AmfRecord, AmfValue, Amf0Decoder, Amf0Encoder, DecoderConfig, EncoderConfig, Marker,
    XmlValidator,
};
pub use error::{AmfError, BoxError, Result};
