//! In-memory reference implementation of the storage collaborators.
//!
//! The on-disk table engine lives outside this crate; `MemoryTable` stands
//! in for it behind the same traits so the message-processing paths can run
//! end to end.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    action::{Action, ActionDirectory, EventTable},
    error::Result,
    message::EaddData,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StoredEvent {
    pub object_id: u64,
    pub timestamp: i64,
    pub action_id: i32,
    pub data: Vec<EaddData>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct MemoryTable {
    inner: RwLock<TableInner>,
}

#[derive(Debug, Default)]
struct TableInner {
    actions: Vec<Action>,
    events: Vec<StoredEvent>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action name, returning the existing action when the
    /// name is already known. Ids are assigned sequentially from 1.
    pub fn define_action(&self, name: &str) -> Action {
        let mut inner = self.inner.write();
        if let Some(action) = inner.actions.iter().find(|action| action.name == name) {
            return action.clone();
        }
        let action = Action {
            id: inner.actions.len() as i32 + 1,
            name: name.to_string(),
        };
        debug!(id = action.id, name = %action.name, "defined action");
        inner.actions.push(action.clone());
        action
    }

    pub fn actions(&self) -> Vec<Action> {
        self.inner.read().actions.clone()
    }

    pub fn events(&self) -> Vec<StoredEvent> {
        self.inner.read().events.clone()
    }
}

impl EventTable for MemoryTable {
    fn append_event(
        &self,
        object_id: u64,
        timestamp: i64,
        action_name: &str,
        data: &[EaddData],
    ) -> Result<()> {
        let action = self.define_action(action_name);
        let mut inner = self.inner.write();
        inner.events.push(StoredEvent {
            object_id,
            timestamp,
            action_id: action.id,
            data: data.to_vec(),
            received_at: Utc::now(),
        });
        debug!(object_id, timestamp, action_id = action.id, "appended event");
        Ok(())
    }
}

impl ActionDirectory for MemoryTable {
    fn lookup_action(&self, action_id: i32) -> Result<Option<Action>> {
        Ok(self
            .inner
            .read()
            .actions
            .iter()
            .find(|action| action.id == action_id)
            .cloned())
    }
}
