//! Self-describing binary value codec.
//!
//! A leading tag byte determines each value's type family and width, so a
//! decoder can consume exactly the right number of bytes with no external
//! type information. The layout is MessagePack-compatible for the families
//! this crate stores: integers, doubles, booleans, and strings.
//!
//! String decodes are zero-copy: `Value::Str` borrows the source buffer,
//! which must outlive every decoded view.

use crate::{
    descriptor::PropertyType,
    error::{Result, TrackError},
};

pub const TAG_FALSE: u8 = 0xC2;
pub const TAG_TRUE: u8 = 0xC3;
pub const TAG_FLOAT64: u8 = 0xCB;
pub const TAG_UINT8: u8 = 0xCC;
pub const TAG_UINT16: u8 = 0xCD;
pub const TAG_UINT32: u8 = 0xCE;
pub const TAG_UINT64: u8 = 0xCF;
pub const TAG_INT8: u8 = 0xD0;
pub const TAG_INT16: u8 = 0xD1;
pub const TAG_INT32: u8 = 0xD2;
pub const TAG_INT64: u8 = 0xD3;
pub const TAG_STR8: u8 = 0xD9;
pub const TAG_STR16: u8 = 0xDA;
pub const TAG_STR32: u8 = 0xDB;

const FIXSTR_MASK: u8 = 0xA0;
const FIXSTR_MAX_LEN: usize = 0x1F;

/// One decoded value. `Str` aliases the buffer it was decoded from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(&'a [u8]),
}

impl Value<'_> {
    pub fn type_of(&self) -> PropertyType {
        match self {
            Value::Int(_) => PropertyType::Integer,
            Value::Float(_) => PropertyType::Float,
            Value::Bool(_) => PropertyType::Boolean,
            Value::Str(_) => PropertyType::String,
        }
    }
}

/// Decodes one value from the front of `buf`, returning it together with the
/// number of bytes consumed so the caller can advance its cursor.
pub fn decode(buf: &[u8]) -> Result<(Value<'_>, usize)> {
    let tag = *buf.first().ok_or(TrackError::ShortBuffer {
        needed: 1,
        available: 0,
    })?;

    match tag {
        // Positive fixint: the tag byte is the value.
        0x00..=0x7F => Ok((Value::Int(i64::from(tag)), 1)),
        // Negative fixint.
        0xE0..=0xFF => Ok((Value::Int(i64::from(tag as i8)), 1)),
        TAG_FALSE => Ok((Value::Bool(false), 1)),
        TAG_TRUE => Ok((Value::Bool(true), 1)),
        TAG_UINT8 => {
            let b = take(buf, 1, 1)?;
            Ok((Value::Int(i64::from(b[0])), 2))
        }
        TAG_UINT16 => {
            let b = take(buf, 1, 2)?;
            Ok((Value::Int(i64::from(u16::from_be_bytes([b[0], b[1]]))), 3))
        }
        TAG_UINT32 => {
            let b = take(buf, 1, 4)?;
            let v = u32::from_be_bytes([b[0], b[1], b[2], b[3]]);
            Ok((Value::Int(i64::from(v)), 5))
        }
        TAG_UINT64 => {
            let b = take(buf, 1, 8)?;
            let v = u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]);
            let v = i64::try_from(v).map_err(|_| TrackError::DecodeMismatch {
                expected: "integer",
                tag,
            })?;
            Ok((Value::Int(v), 9))
        }
        TAG_INT8 => {
            let b = take(buf, 1, 1)?;
            Ok((Value::Int(i64::from(b[0] as i8)), 2))
        }
        TAG_INT16 => {
            let b = take(buf, 1, 2)?;
            Ok((Value::Int(i64::from(i16::from_be_bytes([b[0], b[1]]))), 3))
        }
        TAG_INT32 => {
            let b = take(buf, 1, 4)?;
            let v = i32::from_be_bytes([b[0], b[1], b[2], b[3]]);
            Ok((Value::Int(i64::from(v)), 5))
        }
        TAG_INT64 => {
            let b = take(buf, 1, 8)?;
            let v = i64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]);
            Ok((Value::Int(v), 9))
        }
        TAG_FLOAT64 => {
            let b = take(buf, 1, 8)?;
            let v = f64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]);
            Ok((Value::Float(v), 9))
        }
        0xA0..=0xBF => {
            let len = usize::from(tag & FIXSTR_MAX_LEN as u8);
            let bytes = take(buf, 1, len)?;
            Ok((Value::Str(bytes), 1 + len))
        }
        TAG_STR8 => {
            let len = usize::from(take(buf, 1, 1)?[0]);
            let bytes = take(buf, 2, len)?;
            Ok((Value::Str(bytes), 2 + len))
        }
        TAG_STR16 => {
            let b = take(buf, 1, 2)?;
            let len = usize::from(u16::from_be_bytes([b[0], b[1]]));
            let bytes = take(buf, 3, len)?;
            Ok((Value::Str(bytes), 3 + len))
        }
        TAG_STR32 => {
            let b = take(buf, 1, 4)?;
            let len = u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as usize;
            let bytes = take(buf, 5, len)?;
            Ok((Value::Str(bytes), 5 + len))
        }
        _ => Err(TrackError::DecodeMismatch {
            expected: "value",
            tag,
        }),
    }
}

/// Decodes one value and checks it against the declared property type.
pub fn decode_as(buf: &[u8], expected: PropertyType) -> Result<(Value<'_>, usize)> {
    let (value, consumed) = decode(buf)?;
    if value.type_of() != expected {
        return Err(TrackError::DecodeMismatch {
            expected: expected.name(),
            tag: buf[0],
        });
    }
    Ok((value, consumed))
}

fn take(buf: &[u8], start: usize, len: usize) -> Result<&[u8]> {
    buf.get(start..start + len).ok_or(TrackError::ShortBuffer {
        needed: start + len,
        available: buf.len(),
    })
}

/// Encodes an integer using the shortest representation that holds it.
pub fn encode_int(value: i64, out: &mut Vec<u8>) {
    match value {
        0..=0x7F => out.push(value as u8),
        -32..=-1 => out.push(value as u8),
        _ if i64::from(value as i8) == value => {
            out.push(TAG_INT8);
            out.push(value as u8);
        }
        _ if i64::from(value as i16) == value => {
            out.push(TAG_INT16);
            out.extend_from_slice(&(value as i16).to_be_bytes());
        }
        _ if i64::from(value as i32) == value => {
            out.push(TAG_INT32);
            out.extend_from_slice(&(value as i32).to_be_bytes());
        }
        _ => {
            out.push(TAG_INT64);
            out.extend_from_slice(&value.to_be_bytes());
        }
    }
}

pub fn encode_float(value: f64, out: &mut Vec<u8>) {
    out.push(TAG_FLOAT64);
    out.extend_from_slice(&value.to_be_bytes());
}

pub fn encode_bool(value: bool, out: &mut Vec<u8>) {
    out.push(if value { TAG_TRUE } else { TAG_FALSE });
}

pub fn encode_str(value: &[u8], out: &mut Vec<u8>) {
    let len = value.len();
    if len <= FIXSTR_MAX_LEN {
        out.push(FIXSTR_MASK | len as u8);
    } else if len <= usize::from(u8::MAX) {
        out.push(TAG_STR8);
        out.push(len as u8);
    } else if len <= usize::from(u16::MAX) {
        out.push(TAG_STR16);
        out.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        out.push(TAG_STR32);
        out.extend_from_slice(&(len as u32).to_be_bytes());
    }
    out.extend_from_slice(value);
}
