//! EADD: the message that appends one event to storage.

use tracing::debug;

use super::{MessageHeader, Reader, HEADER_LEN, MESSAGE_EADD, PROTOCOL_VERSION};
use crate::{
    action::EventTable,
    error::{Result, TrackError},
    event_data::MAX_VALUE_LEN,
};

/// One key/value pair as carried on the wire. Keys are property names here;
/// the storage side resolves them to property ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EaddData {
    pub key: String,
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EaddMessage {
    pub header: MessageHeader,
    pub object_id: u64,
    pub timestamp: i64,
    pub action_name: String,
    pub data: Vec<EaddData>,
}

impl EaddMessage {
    pub fn new(
        object_id: u64,
        timestamp: i64,
        action_name: impl Into<String>,
        data: Vec<EaddData>,
    ) -> Self {
        Self {
            header: MessageHeader {
                version: PROTOCOL_VERSION,
                kind: MESSAGE_EADD,
                length: 0,
            },
            object_id,
            timestamp,
            action_name: action_name.into(),
            data,
        }
    }

    /// Parses a full EADD message (header included). Any short read fails
    /// the whole parse; the caller discards partial state wholesale.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let header = MessageHeader::parse(buf)?;
        // Never read past the body length the header declares.
        let body = header.body(buf)?;
        let mut reader = Reader::new(body);

        let object_id = reader.read_u64()?;
        let timestamp = reader.read_i64()?;

        let action_name_len = usize::from(reader.read_u16()?);
        let action_name = read_string(&mut reader, action_name_len)?;

        let data_count = reader.read_u16()?;
        let mut data = Vec::with_capacity(usize::from(data_count));
        for _ in 0..data_count {
            let key_len = usize::from(reader.read_u16()?);
            let key = read_string(&mut reader, key_len)?;

            let value_len = usize::from(reader.read_u8()?);
            if value_len > MAX_VALUE_LEN {
                return Err(TrackError::ValueTooLarge(value_len));
            }
            let value = reader.read_bytes(value_len)?.to_vec();

            data.push(EaddData { key, value });
        }

        debug!(
            object_id,
            timestamp,
            action = %action_name,
            data_count,
            "parsed eadd message"
        );

        Ok(Self {
            header,
            object_id,
            timestamp,
            action_name,
            data,
        })
    }

    /// Serializes header and body, filling in the header's length field.
    pub fn serialize(&self) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&self.object_id.to_be_bytes());
        body.extend_from_slice(&self.timestamp.to_be_bytes());
        body.extend_from_slice(&(self.action_name.len() as u16).to_be_bytes());
        body.extend_from_slice(self.action_name.as_bytes());
        body.extend_from_slice(&(self.data.len() as u16).to_be_bytes());
        for item in &self.data {
            body.extend_from_slice(&(item.key.len() as u16).to_be_bytes());
            body.extend_from_slice(item.key.as_bytes());
            body.push(item.value.len().min(MAX_VALUE_LEN) as u8);
            body.extend_from_slice(&item.value[..item.value.len().min(MAX_VALUE_LEN)]);
        }

        let header = MessageHeader {
            version: self.header.version,
            kind: MESSAGE_EADD,
            length: body.len() as u32,
        };
        let mut out = Vec::with_capacity(HEADER_LEN + body.len());
        header.serialize(&mut out);
        out.extend_from_slice(&body);
        out
    }

    /// Hands the parsed event to the storage collaborator. Its failure
    /// propagates unchanged; this core does not retry.
    pub fn process(&self, table: &impl EventTable) -> Result<()> {
        table.append_event(self.object_id, self.timestamp, &self.action_name, &self.data)
    }
}

fn read_string(reader: &mut Reader<'_>, len: usize) -> Result<String> {
    let bytes = reader.read_bytes(len)?;
    String::from_utf8(bytes.to_vec())
        .map_err(|err| TrackError::Serialization(format!("invalid utf-8 in message: {err}")))
}
