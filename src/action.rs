//! Action directory boundary.
//!
//! Actions are named, identified event kinds living in an external
//! directory. This core only looks them up and serializes them; persistence
//! belongs to the storage collaborator behind the traits below.

use crate::{codec, error::Result, message::EaddData};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub id: i32,
    pub name: String,
}

impl Action {
    /// Appends the action's wire form (encoded id, then name) to `out`.
    pub fn serialize(&self, out: &mut Vec<u8>) {
        codec::encode_int(i64::from(self.id), out);
        codec::encode_str(self.name.as_bytes(), out);
    }
}

/// Lookup side of the external action directory.
pub trait ActionDirectory {
    fn lookup_action(&self, action_id: i32) -> Result<Option<Action>>;
}

/// Append side of the external event table.
pub trait EventTable {
    fn append_event(
        &self,
        object_id: u64,
        timestamp: i64,
        action_name: &str,
        data: &[EaddData],
    ) -> Result<()>;
}
