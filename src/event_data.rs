//! Event data item: one key/value pair inside a stored event.
//!
//! Values are capped at 127 bytes in serialized form. The cap is applied by
//! truncating in place when the serialized length is measured, never at
//! construction, so measuring and serializing always agree on the same
//! bytes.

use crate::error::{Result, TrackError};

/// Maximum serialized value length in bytes.
pub const MAX_VALUE_LEN: usize = 127;

const KEY_LEN: usize = std::mem::size_of::<i16>();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataItem {
    pub key: i16,
    pub value: Vec<u8>,
}

impl DataItem {
    /// Copies the value as given; oversized values are kept until the item
    /// is measured or serialized.
    pub fn new(key: i16, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    /// Returns the serialized size, truncating the value in place to
    /// `MAX_VALUE_LEN` first.
    pub fn serialized_length(&mut self) -> usize {
        self.clean();
        KEY_LEN + 1 + self.value.len()
    }

    /// Appends key, 1-byte value length, and value bytes to `out`.
    /// Returns the number of bytes written.
    pub fn serialize(&mut self, out: &mut Vec<u8>) -> usize {
        self.clean();
        let start = out.len();
        out.extend_from_slice(&self.key.to_le_bytes());
        out.push(self.value.len() as u8);
        out.extend_from_slice(&self.value);
        out.len() - start
    }

    /// Reads one item from the front of `buf`, returning it with the number
    /// of bytes consumed.
    pub fn deserialize(buf: &[u8]) -> Result<(Self, usize)> {
        let key_bytes = take(buf, 0, KEY_LEN)?;
        let key = i16::from_le_bytes([key_bytes[0], key_bytes[1]]);
        let value_len = usize::from(take(buf, KEY_LEN, 1)?[0]);
        let value = take(buf, KEY_LEN + 1, value_len)?.to_vec();
        Ok((Self { key, value }, KEY_LEN + 1 + value_len))
    }

    fn clean(&mut self) {
        if self.value.len() > MAX_VALUE_LEN {
            self.value.truncate(MAX_VALUE_LEN);
        }
    }
}

fn take(buf: &[u8], start: usize, len: usize) -> Result<&[u8]> {
    buf.get(start..start + len).ok_or(TrackError::ShortBuffer {
        needed: start + len,
        available: buf.len(),
    })
}
