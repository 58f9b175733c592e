//! Property registry: named, typed properties backing one object table's
//! record layout.
//!
//! Non-negative ids are user-defined, negative ids system-reserved. The
//! registry persists as JSON and is the layer that plans record layouts:
//! it assigns every property's byte offset and feeds the descriptor table,
//! which itself never computes offsets.

use std::{collections::BTreeMap, fs, path::PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::{
    descriptor::{DescriptorTable, PropertyType},
    error::{Result, TrackError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub id: i64,
    pub name: String,
    pub data_type: PropertyType,
}

#[derive(Debug)]
pub struct SchemaManager {
    path: PathBuf,
    items: RwLock<BTreeMap<i64, PropertyDef>>,
}

impl SchemaManager {
    pub fn load(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, "{}")?;
        }

        let contents = fs::read_to_string(&path)?;
        let map: BTreeMap<i64, PropertyDef> = if contents.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&contents)?
        };

        Ok(Self {
            path,
            items: RwLock::new(map),
        })
    }

    /// Defines a user property under the next non-negative id.
    pub fn define(&self, name: &str, data_type: PropertyType) -> Result<PropertyDef> {
        self.insert(name, data_type, false)
    }

    /// Defines a system-reserved property under the next negative id.
    pub fn define_reserved(&self, name: &str, data_type: PropertyType) -> Result<PropertyDef> {
        self.insert(name, data_type, true)
    }

    pub fn property(&self, id: i64) -> Option<PropertyDef> {
        self.items.read().get(&id).cloned()
    }

    pub fn property_by_name(&self, name: &str) -> Option<PropertyDef> {
        self.items
            .read()
            .values()
            .find(|def| def.name == name)
            .cloned()
    }

    pub fn properties(&self) -> Vec<PropertyDef> {
        self.items.read().values().cloned().collect()
    }

    /// Plans a record layout over every defined property and registers it
    /// with a fresh descriptor table. Offsets are assigned in ascending id
    /// order using each type's fixed record size. Returns the table and the
    /// record capacity the layout requires.
    pub fn build_descriptor(&self) -> Result<(DescriptorTable, usize)> {
        let items = self.items.read();
        let (Some(min), Some(max)) = (
            items.keys().next().copied(),
            items.keys().next_back().copied(),
        ) else {
            return Err(TrackError::InvalidSchema(
                "no properties defined".into(),
            ));
        };

        let mut table = DescriptorTable::new(min.min(0), max.max(0))?;
        let mut offset = 0;
        for def in items.values() {
            table.set_property(def.id, offset, def.data_type.name())?;
            offset += def.data_type.size_of();
        }
        Ok((table, offset))
    }

    fn insert(&self, name: &str, data_type: PropertyType, reserved: bool) -> Result<PropertyDef> {
        if name.trim().is_empty() {
            return Err(TrackError::InvalidSchema(
                "property name must be provided".into(),
            ));
        }

        let mut items = self.items.write();
        if items.values().any(|def| def.name == name) {
            return Err(TrackError::InvalidSchema(format!(
                "property {name} is already defined"
            )));
        }

        let id = if reserved {
            items.keys().next().copied().filter(|id| *id < 0).unwrap_or(0) - 1
        } else {
            items
                .keys()
                .next_back()
                .copied()
                .filter(|id| *id >= 0)
                .map(|id| id + 1)
                .unwrap_or(1)
        };

        let def = PropertyDef {
            id,
            name: name.to_string(),
            data_type,
        };
        items.insert(id, def.clone());
        self.persist(&items)?;
        Ok(def)
    }

    fn persist(&self, items: &BTreeMap<i64, PropertyDef>) -> Result<()> {
        let payload = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_ids_on_both_sides_of_zero() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SchemaManager::load(dir.path().join("properties.json")).unwrap();

        let plan = manager.define("plan", PropertyType::String).unwrap();
        let total = manager.define("total", PropertyType::Integer).unwrap();
        let internal = manager
            .define_reserved("eos", PropertyType::Boolean)
            .unwrap();

        assert_eq!(plan.id, 1);
        assert_eq!(total.id, 2);
        assert_eq!(internal.id, -1);
    }

    #[test]
    fn rejects_duplicate_and_empty_names() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SchemaManager::load(dir.path().join("properties.json")).unwrap();

        manager.define("plan", PropertyType::String).unwrap();
        let err = manager.define("plan", PropertyType::Integer).unwrap_err();
        assert!(matches!(err, TrackError::InvalidSchema(_)));

        let err = manager.define("  ", PropertyType::Integer).unwrap_err();
        assert!(matches!(err, TrackError::InvalidSchema(_)));
    }

    #[test]
    fn definitions_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("properties.json");

        {
            let manager = SchemaManager::load(path.clone()).unwrap();
            manager.define("plan", PropertyType::String).unwrap();
            manager
                .define_reserved("eos", PropertyType::Boolean)
                .unwrap();
        }

        let manager = SchemaManager::load(path).unwrap();
        assert_eq!(
            manager.property_by_name("plan").unwrap().data_type,
            PropertyType::String
        );
        assert_eq!(manager.property(-1).unwrap().name, "eos");
    }

    #[test]
    fn layout_assigns_offsets_in_id_order() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SchemaManager::load(dir.path().join("properties.json")).unwrap();

        manager.define("count", PropertyType::Integer).unwrap(); // id 1
        manager.define("price", PropertyType::Float).unwrap(); // id 2
        manager
            .define_reserved("eos", PropertyType::Boolean)
            .unwrap(); // id -1

        let (table, capacity) = manager.build_descriptor().unwrap();
        // Ascending id order: -1 (bool, 1 byte), 1 (int, 8), 2 (float, 8).
        assert_eq!(table.descriptor(-1).unwrap().offset, 0);
        assert_eq!(table.descriptor(1).unwrap().offset, 1);
        assert_eq!(table.descriptor(2).unwrap().offset, 9);
        assert_eq!(capacity, 17);
    }

    #[test]
    fn empty_registry_cannot_plan_a_layout() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SchemaManager::load(dir.path().join("properties.json")).unwrap();
        assert!(matches!(
            manager.build_descriptor(),
            Err(TrackError::InvalidSchema(_))
        ));
    }
}
