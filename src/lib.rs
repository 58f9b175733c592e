//! trackdb: event-ingestion and storage-representation core of an embedded
//! behavioral analytics database.
//!
//! The hot path runs bytes off the wire through the message parsers, the
//! self-describing value codec, and the property descriptor table into
//! typed in-memory records, and hands stored state to the storage
//! collaborators behind the [`action`] traits.

pub mod action;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod event_data;
pub mod logging;
pub mod message;
pub mod record;
pub mod schema;
pub mod store;

pub use action::{Action, ActionDirectory, EventTable};
pub use descriptor::{DescriptorTable, PropertyDescriptor, PropertyType};
pub use error::{Result, TrackError};
pub use event_data::{DataItem, MAX_VALUE_LEN};
pub use message::{EaddData, EaddMessage, GetActionMessage, Message, MessageHeader};
pub use record::{Record, StringRef};
pub use schema::{PropertyDef, SchemaManager};
pub use store::MemoryTable;
