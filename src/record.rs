//! Offset-typed record buffer.
//!
//! A record is a caller-sized byte region that decoded values are written
//! into at fixed offsets supplied by the descriptor table. String values are
//! stored as `StringRef` index pairs into the original wire buffer rather
//! than copied; the wire buffer must stay alive as long as the record's
//! string fields are read.

use crate::error::{Result, TrackError};

/// A zero-copy reference to a byte run inside a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringRef {
    pub start: usize,
    pub len: usize,
}

impl StringRef {
    pub fn resolve<'a>(&self, source: &'a [u8]) -> Result<&'a [u8]> {
        source
            .get(self.start..self.start + self.len)
            .ok_or(TrackError::ShortBuffer {
                needed: self.start + self.len,
                available: source.len(),
            })
    }
}

#[derive(Debug, Clone)]
pub struct Record {
    bytes: Vec<u8>,
}

impl Record {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn write_i64(&mut self, offset: usize, value: i64) -> Result<()> {
        self.write_bytes(offset, &value.to_le_bytes())
    }

    pub fn write_f64(&mut self, offset: usize, value: f64) -> Result<()> {
        self.write_bytes(offset, &value.to_le_bytes())
    }

    pub fn write_bool(&mut self, offset: usize, value: bool) -> Result<()> {
        self.write_bytes(offset, &[u8::from(value)])
    }

    pub fn write_str_ref(&mut self, offset: usize, value: StringRef) -> Result<()> {
        self.write_bytes(offset, &(value.start as u64).to_le_bytes())?;
        self.write_bytes(offset + 8, &(value.len as u64).to_le_bytes())
    }

    pub fn read_i64(&self, offset: usize) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array(offset)?))
    }

    pub fn read_f64(&self, offset: usize) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array(offset)?))
    }

    pub fn read_bool(&self, offset: usize) -> Result<bool> {
        let [byte] = self.read_array::<1>(offset)?;
        Ok(byte != 0)
    }

    pub fn read_str_ref(&self, offset: usize) -> Result<StringRef> {
        let start = u64::from_le_bytes(self.read_array(offset)?) as usize;
        let len = u64::from_le_bytes(self.read_array(offset + 8)?) as usize;
        Ok(StringRef { start, len })
    }

    fn write_bytes(&mut self, offset: usize, src: &[u8]) -> Result<()> {
        let capacity = self.bytes.len();
        let slot = self
            .bytes
            .get_mut(offset..offset + src.len())
            .ok_or(TrackError::InvalidOffset {
                offset,
                len: src.len(),
                capacity,
            })?;
        slot.copy_from_slice(src);
        Ok(())
    }

    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let slice = self
            .bytes
            .get(offset..offset + N)
            .ok_or(TrackError::InvalidOffset {
                offset,
                len: N,
                capacity: self.bytes.len(),
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }
}
