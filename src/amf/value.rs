//! AMF0 value types
//!
//! A single closed enum covers everything the codec reads and writes.
//! Objects and ECMA arrays share the `Map` variant; the wire marker only
//! matters on the way in.

use std::collections::HashMap;

/// AMF0 value representation
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AmfValue {
    /// Absence of a value (0x05). Undefined (0x06) and unsupported (0x0D)
    /// markers decode to this as well.
    #[default]
    Null,

    /// Boolean value (0x01)
    Boolean(bool),

    /// IEEE 754 double-precision floating point (0x00)
    ///
    /// AMF0 has no integer type; integers are carried as doubles.
    Number(f64),

    /// Text (0x02, or 0x0C once the encoded length exceeds 16 bits)
    String(String),

    /// Dense, ordered array (strict array, 0x0A)
    Array(Vec<AmfValue>),

    /// String-keyed associative value (object 0x03 / ECMA array 0x08)
    Map(HashMap<String, AmfValue>),

    /// Milliseconds since the Unix epoch (0x0B); timezone is not carried
    Date(i64),

    /// Raw XML document text (0x0F), not parsed by the codec
    Xml(String),

    /// Back-reference to a reference-table slot (0x07)
    ///
    /// The decoder resolves references to completed values in place. A
    /// reference to a value that was still being decoded (the value itself
    /// or one of its ancestors) is left as this token; resolve it with
    /// [`Amf0Decoder::reference`](super::Amf0Decoder::reference) once the
    /// enclosing top-level value has been returned.
    Reference(u16),
}

impl AmfValue {
    /// Try to get this value as a string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AmfValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AmfValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get this value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AmfValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as epoch milliseconds
    pub fn as_date(&self) -> Option<i64> {
        match self {
            AmfValue::Date(ms) => Some(*ms),
            _ => None,
        }
    }

    /// Try to get this value as a map reference
    pub fn as_map(&self) -> Option<&HashMap<String, AmfValue>> {
        match self {
            AmfValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get this value as a mutable map reference
    pub fn as_map_mut(&mut self) -> Option<&mut HashMap<String, AmfValue>> {
        match self {
            AmfValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get this value as an array reference
    pub fn as_array(&self) -> Option<&Vec<AmfValue>> {
        match self {
            AmfValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AmfValue::Null)
    }

    /// Number of values in this tree, counting this one
    pub fn node_count(&self) -> usize {
        match self {
            AmfValue::Array(a) => 1 + a.iter().map(AmfValue::node_count).sum::<usize>(),
            AmfValue::Map(m) => 1 + m.values().map(AmfValue::node_count).sum::<usize>(),
            _ => 1,
        }
    }

    /// Get a property from a map value
    pub fn get(&self, key: &str) -> Option<&AmfValue> {
        self.as_map()?.get(key)
    }

    /// Get a string property from a map value
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Get a number property from a map value
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_number()
    }
}

impl From<bool> for AmfValue {
    fn from(v: bool) -> Self {
        AmfValue::Boolean(v)
    }
}

impl From<f64> for AmfValue {
    fn from(v: f64) -> Self {
        AmfValue::Number(v)
    }
}

impl From<i32> for AmfValue {
    fn from(v: i32) -> Self {
        AmfValue::Number(v as f64)
    }
}

impl From<u32> for AmfValue {
    fn from(v: u32) -> Self {
        AmfValue::Number(v as f64)
    }
}

impl From<String> for AmfValue {
    fn from(v: String) -> Self {
        AmfValue::String(v)
    }
}

impl From<&str> for AmfValue {
    fn from(v: &str) -> Self {
        AmfValue::String(v.to_string())
    }
}

impl<V: Into<AmfValue>> From<Option<V>> for AmfValue {
    fn from(v: Option<V>) -> Self {
        v.map_or(AmfValue::Null, Into::into)
    }
}

impl<V: Into<AmfValue>> From<Vec<V>> for AmfValue {
    fn from(v: Vec<V>) -> Self {
        AmfValue::Array(v.into_iter().map(|x| x.into()).collect())
    }
}

impl<V: Into<AmfValue>> From<HashMap<String, V>> for AmfValue {
    fn from(v: HashMap<String, V>) -> Self {
        AmfValue::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}
