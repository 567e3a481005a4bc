//! Host record adapter
//!
//! A record is a host value with a fixed set of named, readable fields.
//! The encoder writes records as AMF0 objects (0x03) with an explicit end
//! marker. A field that cannot be read or encoded is written as null
//! rather than failing the whole object.

use std::collections::HashMap;

use crate::error::BoxError;
use super::value::AmfValue;

/// Named-field view of a host value
///
/// # Example
///
/// ```
/// use amf0_rs::amf::{AmfRecord, AmfValue};
/// use amf0_rs::BoxError;
///
/// struct Track {
///     title: String,
///     seconds: u32,
/// }
///
/// impl AmfRecord for Track {
///     fn field_names(&self) -> Vec<&str> {
///         vec!["title", "seconds"]
///     }
///
///     fn read_field(&self, name: &str) -> Result<AmfValue, BoxError> {
///         match name {
///             "title" => Ok(self.title.as_str().into()),
///             "seconds" => Ok(self.seconds.into()),
///             _ => Err(format!("no field {}", name).into()),
///         }
///     }
/// }
///
/// let track = Track { title: "intro".into(), seconds: 93 };
/// assert_eq!(track.to_map().get_number("seconds"), Some(93.0));
/// ```
pub trait AmfRecord {
    /// Field names in declaration order
    fn field_names(&self) -> Vec<&str>;

    /// Read one field as an AMF value
    fn read_field(&self, name: &str) -> Result<AmfValue, BoxError>;

    /// Convert into a `Map`, substituting null for unreadable fields
    fn to_map(&self) -> AmfValue {
        let names = self.field_names();
        let mut map = HashMap::with_capacity(names.len());
        for name in names {
            let value = self.read_field(name).unwrap_or_else(|e| {
                tracing::debug!(field = name, error = %e, "Record field unreadable, using null");
                AmfValue::Null
            });
            map.insert(name.to_string(), value);
        }
        AmfValue::Map(map)
    }
}
