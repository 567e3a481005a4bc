//! Text transformation for AMF0 strings
//!
//! AMF0 producers in the wild size strings per UTF-16 code unit: units up
//! to 0x7F take one byte, up to 0x7FF two bytes, everything else three.
//! For text inside the Basic Multilingual Plane this is plain UTF-8. A
//! supplementary character is a surrogate pair and so takes six bytes
//! (two 3-byte sequences) instead of UTF-8's four.
//!
//! The encoder sizes and writes text with this rule so the length prefix
//! always matches the payload. The decoder accepts standard UTF-8 and
//! falls back to the surrogate-pair form.

use bytes::{BufMut, BytesMut};

use crate::error::{AmfError, Result};

/// Byte length of `s` under the per-UTF-16-unit transformation
pub fn encoded_len(s: &str) -> usize {
    s.encode_utf16().map(unit_len).sum()
}

fn unit_len(unit: u16) -> usize {
    match unit {
        0x0000..=0x007F => 1,
        0x0080..=0x07FF => 2,
        _ => 3,
    }
}

/// Append `s` to `buf`, writing exactly `encoded_len(s)` bytes
pub fn write(buf: &mut BytesMut, s: &str, encoded_len: usize) {
    if encoded_len == s.len() {
        // No surrogate pairs, so the transformation is plain UTF-8
        buf.put_slice(s.as_bytes());
        return;
    }

    buf.reserve(encoded_len);
    for unit in s.encode_utf16() {
        match unit {
            0x0000..=0x007F => buf.put_u8(unit as u8),
            0x0080..=0x07FF => {
                buf.put_u8(0xC0 | ((unit >> 6) & 0x1F) as u8);
                buf.put_u8(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                buf.put_u8(0xE0 | ((unit >> 12) & 0x0F) as u8);
                buf.put_u8(0x80 | ((unit >> 6) & 0x3F) as u8);
                buf.put_u8(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
}

/// Decode string payload bytes
pub fn decode(bytes: &[u8]) -> Result<String> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_owned()),
        Err(_) => decode_surrogates(bytes),
    }
}

fn decode_surrogates(bytes: &[u8]) -> Result<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let width = match b {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(invalid_byte(i)),
        };
        if i + width > bytes.len() {
            return Err(AmfError::malformed("string ends inside a multi-byte sequence"));
        }
        let tail = &bytes[i + 1..i + width];
        if tail.iter().any(|c| c & 0xC0 != 0x80) {
            return Err(invalid_byte(i));
        }

        match width {
            1 => units.push(b as u16),
            2 => units.push(((b as u16 & 0x1F) << 6) | (tail[0] as u16 & 0x3F)),
            3 => units.push(
                ((b as u16 & 0x0F) << 12)
                    | ((tail[0] as u16 & 0x3F) << 6)
                    | (tail[1] as u16 & 0x3F),
            ),
            _ => {
                let cp = ((b as u32 & 0x07) << 18)
                    | ((tail[0] as u32 & 0x3F) << 12)
                    | ((tail[1] as u32 & 0x3F) << 6)
                    | (tail[2] as u32 & 0x3F);
                let c = char::from_u32(cp).ok_or_else(|| invalid_byte(i))?;
                let mut pair = [0u16; 2];
                units.extend_from_slice(c.encode_utf16(&mut pair));
            }
        }
        i += width;
    }

    String::from_utf16(&units)
        .map_err(|e| AmfError::malformed_with("invalid UTF-16 in string", Box::new(e)))
}

fn invalid_byte(offset: usize) -> AmfError {
    AmfError::malformed(format!("invalid UTF-8 at byte {}", offset))
}
