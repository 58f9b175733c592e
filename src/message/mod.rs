//! Wire message protocol: fixed header, EADD ("add event") and get-action
//! bodies, and dispatch on the header's type tag.
//!
//! All multi-byte wire integers are network byte order. A body parser never
//! reads past the `length` the header declares, even when more bytes
//! follow in the buffer.

mod eadd;
mod get_action;

pub use eadd::{EaddData, EaddMessage};
pub use get_action::GetActionMessage;

use tracing::debug;

use crate::error::{Result, TrackError};

pub const PROTOCOL_VERSION: u16 = 1;

pub const MESSAGE_EADD: u32 = 1;
pub const MESSAGE_GET_ACTION: u32 = 2;

/// Serialized header size: version (2) + type (4) + length (4).
pub const HEADER_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub version: u16,
    pub kind: u32,
    pub length: u32,
}

impl MessageHeader {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(buf);
        Ok(Self {
            version: reader.read_u16()?,
            kind: reader.read_u32()?,
            length: reader.read_u32()?,
        })
    }

    pub fn serialize(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(&self.kind.to_be_bytes());
        out.extend_from_slice(&self.length.to_be_bytes());
    }

    /// Returns the body bytes the header describes, rejecting buffers that
    /// end before `length` bytes of body.
    fn body<'a>(&self, buf: &'a [u8]) -> Result<&'a [u8]> {
        let end = HEADER_LEN + self.length as usize;
        buf.get(HEADER_LEN..end).ok_or(TrackError::ShortBuffer {
            needed: end,
            available: buf.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Eadd(EaddMessage),
    GetAction(GetActionMessage),
}

/// Parses the header and dispatches to the body parser for its type tag.
pub fn parse_message(buf: &[u8]) -> Result<Message> {
    let header = MessageHeader::parse(buf)?;
    debug!(
        version = header.version,
        kind = header.kind,
        length = header.length,
        "parsing message"
    );
    match header.kind {
        MESSAGE_EADD => Ok(Message::Eadd(EaddMessage::parse(buf)?)),
        MESSAGE_GET_ACTION => Ok(Message::GetAction(GetActionMessage::parse(buf)?)),
        other => Err(TrackError::UnknownMessageType(other)),
    }
}

/// Byte cursor over one message buffer. Every read is bounds-checked and
/// advances the cursor by exactly the bytes it consumed.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let b = self.read_bytes(8)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos + len;
        let bytes = self.buf.get(self.pos..end).ok_or(TrackError::ShortBuffer {
            needed: end,
            available: self.buf.len(),
        })?;
        self.pos = end;
        Ok(bytes)
    }
}
