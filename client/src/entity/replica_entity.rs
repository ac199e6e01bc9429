use std::collections::BTreeMap;

use replica_shared::{EntityDescriptor, EntityId, PropertyKey, Value};

use crate::entity::interpolation::Interpolation;

/// The replica's copy of one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplicaEntity {
    parent: EntityId,
    name: String,
    properties: BTreeMap<PropertyKey, Value>,
    interpolations: BTreeMap<PropertyKey, Interpolation>,
}

impl ReplicaEntity {
    pub(crate) fn from_descriptor(descriptor: EntityDescriptor) -> Self {
        Self {
            parent: descriptor.parent,
            name: descriptor.name,
            properties: descriptor.properties,
            interpolations: BTreeMap::new(),
        }
    }

    /// `EntityId::NULL` for a root entity.
    pub fn parent(&self) -> EntityId {
        self.parent
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property(&self, property: PropertyKey) -> Option<&Value> {
        self.properties.get(&property)
    }

    pub fn properties(&self) -> &BTreeMap<PropertyKey, Value> {
        &self.properties
    }

    pub fn interpolation(&self, property: PropertyKey) -> Option<&Interpolation> {
        self.interpolations.get(&property)
    }

    pub(crate) fn set_property(&mut self, property: PropertyKey, value: Value) {
        self.properties.insert(property, value);
    }

    pub(crate) fn property_mut(&mut self, property: PropertyKey) -> Option<&mut Value> {
        self.properties.get_mut(&property)
    }

    pub(crate) fn interpolation_mut(&mut self, property: PropertyKey) -> &mut Interpolation {
        self.interpolations.entry(property).or_default()
    }
}
