use std::collections::BTreeMap;

use crate::{
    codec::{read_target, write_target, FieldRead, FieldWrite},
    error::{DecodeError, EncodeError},
    types::{EntityId, PropertyKey},
    value::Value,
};

/// Self-describing snapshot of one entity, as carried by `LoadEntity`.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityDescriptor {
    pub entity: EntityId,
    /// `EntityId::NULL` for a root entity.
    pub parent: EntityId,
    pub name: String,
    pub properties: BTreeMap<PropertyKey, Value>,
}

impl EntityDescriptor {
    pub fn new(entity: EntityId, parent: EntityId, name: impl Into<String>) -> Self {
        Self {
            entity,
            parent,
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, property: PropertyKey, value: impl Into<Value>) -> Self {
        self.properties.insert(property, value.into());
        self
    }

    pub(crate) fn write_fields(&self, writer: &mut dyn FieldWrite) -> Result<(), EncodeError> {
        write_target(writer, "entity", self.entity)?;
        writer.write_entity("parent", self.parent);
        writer.write_string("name", &self.name)?;

        let entries: Vec<(&PropertyKey, &Value)> = self.properties.iter().collect();
        writer.write_records("properties", entries.len(), &mut |index, nested| {
            let (property, value) = entries[index];
            nested.write_u32("property", *property);
            nested.write_value("value", value)
        })
    }

    pub(crate) fn read_fields(reader: &mut dyn FieldRead) -> Result<Self, DecodeError> {
        let entity = read_target(reader, "entity")?;
        let parent = reader.read_entity("parent")?;
        let name = reader.read_string("name")?;

        let mut properties = BTreeMap::new();
        reader.read_records("properties", &mut |nested| {
            let property = nested.read_u32("property")?;
            let value = nested.read_value("value")?;
            if properties.insert(property, value).is_some() {
                return Err(DecodeError::InvalidField {
                    field: "properties",
                    reason: format!("duplicate property {}", property),
                });
            }
            Ok(())
        })?;

        Ok(Self {
            entity,
            parent,
            name,
            properties,
        })
    }
}
