//! Error types for amf0-rs

use std::error::Error as StdError;
use std::fmt;

use crate::amf::marker::Marker;

/// Result type alias using the library's error type
pub type Result<T> = std::result::Result<T, AmfError>;

/// Boxed error produced by an external collaborator (e.g. an XML parser)
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// AMF0 encoding/decoding errors
///
/// Every variant is terminal for the call that produced it. The decoder's
/// cursor position after an error is unspecified, so the session should be
/// abandoned.
#[derive(Debug)]
pub enum AmfError {
    /// Marker byte that this codec does not handle (movieclip, recordset,
    /// typed object, AVM+, a stray object-end, or any unknown byte)
    UnsupportedMarker(u8),
    /// Reference index outside the current reference table
    InvalidReference { index: u16, table_size: usize },
    /// Buffer exhausted in the middle of a value
    TruncatedInput { needed: usize, remaining: usize },
    /// Payload bytes present but not acceptable
    MalformedPayload {
        reason: String,
        source: Option<BoxError>,
    },
    /// Object/array nesting exceeded the configured limit
    NestingTooDeep { limit: usize },
    /// Length does not fit the wire format's length prefix
    LengthOverflow { len: usize, max: usize },
    /// Resolving references would copy more values than the configured budget
    ReferenceExpansion { limit: usize },
}

impl AmfError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        AmfError::MalformedPayload {
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn malformed_with(reason: impl Into<String>, source: BoxError) -> Self {
        AmfError::MalformedPayload {
            reason: reason.into(),
            source: Some(source),
        }
    }
}

impl fmt::Display for AmfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmfError::UnsupportedMarker(m) => match Marker::from_byte(*m) {
                Some(marker) => write!(
                    f,
                    "Unsupported AMF0 marker: 0x{:02x} ({})",
                    m,
                    marker.name()
                ),
                None => write!(f, "Unsupported AMF0 marker: 0x{:02x} (unknown)", m),
            },
            AmfError::InvalidReference { index, table_size } => write!(
                f,
                "Invalid AMF0 reference: {} (table size {})",
                index, table_size
            ),
            AmfError::TruncatedInput { needed, remaining } => write!(
                f,
                "Truncated AMF0 input: needed {} bytes, {} remaining",
                needed, remaining
            ),
            AmfError::MalformedPayload { reason, source } => match source {
                Some(e) => write!(f, "Malformed AMF0 payload: {}: {}", reason, e),
                None => write!(f, "Malformed AMF0 payload: {}", reason),
            },
            AmfError::NestingTooDeep { limit } => {
                write!(f, "AMF0 nesting too deep (limit {})", limit)
            }
            AmfError::LengthOverflow { len, max } => {
                write!(f, "AMF0 length overflow: {} exceeds {}", len, max)
            }
            AmfError::ReferenceExpansion { limit } => {
                write!(f, "AMF0 reference expansion exceeds {} values", limit)
            }
        }
    }
}

impl StdError for AmfError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AmfError::MalformedPayload {
                source: Some(e), ..
            } => Some(e.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;
    use std::io;

    #[test]
    fn test_amf_error_display() {
        let err = AmfError::UnsupportedMarker(0x10);
        assert!(err.to_string().contains("0x10"));
        assert!(err.to_string().contains("typed object"));

        assert!(AmfError::UnsupportedMarker(0xAB)
            .to_string()
            .contains("unknown"));

        let err = AmfError::InvalidReference {
            index: 42,
            table_size: 3,
        };
        assert!(err.to_string().contains("42"));
        assert!(err.to_string().contains("3"));

        let err = AmfError::TruncatedInput {
            needed: 8,
            remaining: 2,
        };
        assert!(err.to_string().contains("Truncated"));

        assert!(AmfError::malformed("bad text")
            .to_string()
            .contains("bad text"));

        assert!(AmfError::NestingTooDeep { limit: 64 }
            .to_string()
            .contains("deep"));

        assert!(AmfError::LengthOverflow { len: 70000, max: 65535 }
            .to_string()
            .contains("70000"));

        assert!(AmfError::ReferenceExpansion { limit: 1000 }
            .to_string()
            .contains("1000"));
    }

    #[test]
    fn test_error_source() {
        let io_err = io::Error::new(io::ErrorKind::InvalidData, "unclosed tag");
        let err = AmfError::malformed_with("XML document rejected", Box::new(io_err));
        assert!(StdError::source(&err).is_some());
        assert!(err.to_string().contains("unclosed tag"));

        assert!(StdError::source(&AmfError::malformed("no source")).is_none());
        assert!(StdError::source(&AmfError::UnsupportedMarker(0x04)).is_none());
    }
}
