//! Property descriptor table: the id → {offset, type} directory used to
//! materialize decoded values into record memory.
//!
//! Property ids are signed; negative ids are system-reserved, non-negative
//! ids user-defined. The table covers one contiguous id range fixed at
//! creation and never assigns offsets itself — the schema layer owning the
//! record layout registers each property's offset and type.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    codec::{self, Value},
    error::{Result, TrackError},
    record::{Record, StringRef},
};

/// Reserved slots kept on each side of the declared id range. Internal
/// sizing only: ids outside `[min, max]` never resolve.
const SLOT_HEADROOM: i64 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Integer,
    Float,
    Boolean,
    String,
}

impl PropertyType {
    pub fn name(&self) -> &'static str {
        match self {
            PropertyType::Integer => "integer",
            PropertyType::Float => "float",
            PropertyType::Boolean => "boolean",
            PropertyType::String => "string",
        }
    }

    /// Bytes the type occupies inside a record. Strings store a
    /// start/length index pair.
    pub fn size_of(&self) -> usize {
        match self {
            PropertyType::Integer | PropertyType::Float => 8,
            PropertyType::Boolean => 1,
            PropertyType::String => 16,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PropertyType {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "integer" => Ok(PropertyType::Integer),
            "float" => Ok(PropertyType::Float),
            "boolean" => Ok(PropertyType::Boolean),
            "string" => Ok(PropertyType::String),
            other => Err(TrackError::UnsupportedType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PropertyDescriptor {
    pub property_id: i64,
    pub offset: usize,
    pub property_type: Option<PropertyType>,
}

#[derive(Debug)]
pub struct DescriptorTable {
    min_property_id: i64,
    max_property_id: i64,
    /// First id covered by `slots`, `SLOT_HEADROOM` below `min_property_id`.
    lower_bound: i64,
    slots: Vec<PropertyDescriptor>,
}

impl DescriptorTable {
    /// Creates a table covering every property id in `[min, max]`.
    pub fn new(min_property_id: i64, max_property_id: i64) -> Result<Self> {
        if max_property_id < min_property_id {
            return Err(TrackError::InvalidRange {
                min: min_property_id,
                max: max_property_id,
            });
        }

        let lower_bound = min_property_id - SLOT_HEADROOM;
        let upper_bound = max_property_id + SLOT_HEADROOM;
        let slot_count = (upper_bound - lower_bound + 1) as usize;

        let slots = (0..slot_count)
            .map(|index| PropertyDescriptor {
                property_id: lower_bound + index as i64,
                offset: 0,
                property_type: None,
            })
            .collect();

        Ok(Self {
            min_property_id,
            max_property_id,
            lower_bound,
            slots,
        })
    }

    pub fn min_property_id(&self) -> i64 {
        self.min_property_id
    }

    pub fn max_property_id(&self) -> i64 {
        self.max_property_id
    }

    /// Registers the offset and type for one property id. Re-registering an
    /// id overwrites its previous binding.
    pub fn set_property(&mut self, property_id: i64, offset: usize, type_name: &str) -> Result<()> {
        let property_type: PropertyType = type_name.parse()?;
        let index = self.slot_index(property_id)?;
        debug!(property_id, offset, %property_type, "registering property");
        let slot = &mut self.slots[index];
        slot.offset = offset;
        slot.property_type = Some(property_type);
        Ok(())
    }

    /// Looks up the descriptor for a property id, registered or not.
    pub fn descriptor(&self, property_id: i64) -> Result<&PropertyDescriptor> {
        let index = self.slot_index(property_id)?;
        Ok(&self.slots[index])
    }

    /// Decodes one value from the front of `buf` and writes it into `record`
    /// at the property's registered offset. Returns the bytes consumed so
    /// the caller can advance its cursor.
    ///
    /// String values are stored as indices into `buf`; the caller must keep
    /// `buf` alive for as long as the record's string fields are resolved.
    /// On a decode failure the target field is undefined and the record
    /// should be discarded.
    pub fn set_value(&self, record: &mut Record, property_id: i64, buf: &[u8]) -> Result<usize> {
        let descriptor = self.descriptor(property_id)?;
        let property_type = descriptor
            .property_type
            .ok_or(TrackError::UnknownProperty(property_id))?;

        let (value, consumed) = codec::decode_as(buf, property_type)?;
        match value {
            Value::Int(v) => record.write_i64(descriptor.offset, v)?,
            Value::Float(v) => record.write_f64(descriptor.offset, v)?,
            Value::Bool(v) => record.write_bool(descriptor.offset, v)?,
            Value::Str(s) => {
                let start = consumed - s.len();
                record.write_str_ref(descriptor.offset, StringRef { start, len: s.len() })?;
            }
        }
        Ok(consumed)
    }

    fn slot_index(&self, property_id: i64) -> Result<usize> {
        if property_id < self.min_property_id || property_id > self.max_property_id {
            return Err(TrackError::UnknownProperty(property_id));
        }
        Ok((property_id - self.lower_bound) as usize)
    }
}
