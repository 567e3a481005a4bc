//! AMF0 type markers
//!
//! Every AMF0 value starts with a single marker byte that selects the shape
//! of the payload that follows. Decoder and encoder both dispatch through
//! this table.
//!
//! ```text
//! 0x00 Number        8-byte IEEE 754 double
//! 0x01 Boolean       1 byte, nonzero = true
//! 0x02 String        u16 length + UTF-8
//! 0x03 Object        (u16 key + value)* terminated by 0x00 0x00 0x09
//! 0x04 MovieClip     reserved, not supported
//! 0x05 Null
//! 0x06 Undefined     decodes as null
//! 0x07 Reference     u16 index into the reference table
//! 0x08 ECMA Array    u32 count + (u16 key + value) * count
//! 0x09 Object End    sentinel only
//! 0x0A Strict Array  u32 count + value * count
//! 0x0B Date          f64 milliseconds + i16 timezone (always 0)
//! 0x0C Long String   u32 length + UTF-8
//! 0x0D Unsupported   decodes as null
//! 0x0E RecordSet     reserved, not supported
//! 0x0F XML Document  u32 length + UTF-8
//! 0x10 Typed Object  not supported
//! 0x11 AVM+          switch to AMF3, not supported
//! ```

/// AMF0 type marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Marker {
    Number = 0x00,
    Boolean = 0x01,
    String = 0x02,
    Object = 0x03,
    MovieClip = 0x04,
    Null = 0x05,
    Undefined = 0x06,
    Reference = 0x07,
    EcmaArray = 0x08,
    ObjectEnd = 0x09,
    StrictArray = 0x0A,
    Date = 0x0B,
    LongString = 0x0C,
    Unsupported = 0x0D,
    RecordSet = 0x0E,
    XmlDocument = 0x0F,
    TypedObject = 0x10,
    AvmPlus = 0x11,
}

impl Marker {
    pub fn from_byte(b: u8) -> Option<Self> {
        let marker = match b {
            0x00 => Marker::Number,
            0x01 => Marker::Boolean,
            0x02 => Marker::String,
            0x03 => Marker::Object,
            0x04 => Marker::MovieClip,
            0x05 => Marker::Null,
            0x06 => Marker::Undefined,
            0x07 => Marker::Reference,
            0x08 => Marker::EcmaArray,
            0x09 => Marker::ObjectEnd,
            0x0A => Marker::StrictArray,
            0x0B => Marker::Date,
            0x0C => Marker::LongString,
            0x0D => Marker::Unsupported,
            0x0E => Marker::RecordSet,
            0x0F => Marker::XmlDocument,
            0x10 => Marker::TypedObject,
            0x11 => Marker::AvmPlus,
            _ => return None,
        };
        Some(marker)
    }

    /// Human-readable marker name, used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Marker::Number => "number",
            Marker::Boolean => "boolean",
            Marker::String => "string",
            Marker::Object => "object",
            Marker::MovieClip => "movieclip",
            Marker::Null => "null",
            Marker::Undefined => "undefined",
            Marker::Reference => "reference",
            Marker::EcmaArray => "ECMA array",
            Marker::ObjectEnd => "object end",
            Marker::StrictArray => "strict array",
            Marker::Date => "date",
            Marker::LongString => "long string",
            Marker::Unsupported => "unsupported",
            Marker::RecordSet => "recordset",
            Marker::XmlDocument => "XML document",
            Marker::TypedObject => "typed object",
            Marker::AvmPlus => "AVM+ object",
        }
    }

    /// Whether a value starting with this marker can be decoded
    ///
    /// Object end is a terminator, never a standalone value.
    pub fn is_supported(&self) -> bool {
        !matches!(
            self,
            Marker::MovieClip
                | Marker::ObjectEnd
                | Marker::RecordSet
                | Marker::TypedObject
                | Marker::AvmPlus
        )
    }
}

impl From<Marker> for u8 {
    fn from(m: Marker) -> u8 {
        m as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_from_byte() {
        for b in 0x00..=0x11u8 {
            let marker = Marker::from_byte(b).unwrap();
            assert_eq!(u8::from(marker), b);
        }
        assert_eq!(Marker::from_byte(0x12), None);
        assert_eq!(Marker::from_byte(0xFF), None);
    }

    #[test]
    fn test_unsupported_markers() {
        assert!(!Marker::MovieClip.is_supported());
        assert!(!Marker::RecordSet.is_supported());
        assert!(!Marker::TypedObject.is_supported());
        assert!(!Marker::AvmPlus.is_supported());
        assert!(!Marker::ObjectEnd.is_supported());

        assert!(Marker::Undefined.is_supported());
        assert!(Marker::Unsupported.is_supported());
        assert!(Marker::XmlDocument.is_supported());
    }
}
