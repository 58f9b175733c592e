//! Get-action: looks an action up by id and serializes its definition.

use std::io::Write;

use tracing::debug;

use super::{MessageHeader, Reader, HEADER_LEN, MESSAGE_GET_ACTION, PROTOCOL_VERSION};
use crate::{
    action::ActionDirectory,
    error::{Result, TrackError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetActionMessage {
    pub header: MessageHeader,
    pub action_id: i32,
}

impl GetActionMessage {
    pub fn new(action_id: i32) -> Self {
        Self {
            header: MessageHeader {
                version: PROTOCOL_VERSION,
                kind: MESSAGE_GET_ACTION,
                length: 4,
            },
            action_id,
        }
    }

    pub fn parse(buf: &[u8]) -> Result<Self> {
        let header = MessageHeader::parse(buf)?;
        let body = header.body(buf)?;
        let mut reader = Reader::new(body);
        let action_id = reader.read_i32()?;
        Ok(Self { header, action_id })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + 4);
        MessageHeader {
            version: self.header.version,
            kind: MESSAGE_GET_ACTION,
            length: 4,
        }
        .serialize(&mut out);
        out.extend_from_slice(&self.action_id.to_be_bytes());
        out
    }

    /// Resolves the action id against the directory and writes the action's
    /// serialized form to `out`. An absent id yields `ActionNotFound` and
    /// writes nothing.
    pub fn process(&self, directory: &impl ActionDirectory, out: &mut impl Write) -> Result<()> {
        match directory.lookup_action(self.action_id)? {
            Some(action) => {
                debug!(action_id = self.action_id, name = %action.name, "serving action");
                let mut bytes = Vec::new();
                action.serialize(&mut bytes);
                out.write_all(&bytes)?;
                Ok(())
            }
            None => Err(TrackError::ActionNotFound(self.action_id)),
        }
    }
}
