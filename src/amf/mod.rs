//! AMF0 (Action Message Format) implementation
//!
//! AMF0 is Adobe's original binary serialization format, used by Flash
//! remoting and by RTMP for command parameters and metadata. AMF3 is not
//! supported; a stream switching to it (marker 0x11) fails to decode.

pub mod amf0;
pub mod config;
pub mod marker;
pub mod record;
pub mod utf8;
pub mod value;
pub mod xml;

pub use amf0::{Amf0Decoder, Amf0Encoder};
pub use config::{DecoderConfig, EncoderConfig};
pub use marker::Marker;
pub use record::AmfRecord;
pub use value::AmfValue;
pub use xml::XmlValidator;
