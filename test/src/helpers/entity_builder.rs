use replica_shared::{EntityDescriptor, EntityId, PropertyKey, Value};

/// Fluent builder for creating test entity descriptors
pub struct TestEntityBuilder {
    descriptor: EntityDescriptor,
}

impl TestEntityBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            descriptor: EntityDescriptor::new(EntityId::NULL, EntityId::NULL, name),
        }
    }

    /// Parent the entity under `parent`
    pub fn child_of(mut self, parent: EntityId) -> Self {
        self.descriptor.parent = parent;
        self
    }

    pub fn with(mut self, property: PropertyKey, value: impl Into<Value>) -> Self {
        self.descriptor.properties.insert(property, value.into());
        self
    }

    /// An empty list property
    pub fn with_list(self, property: PropertyKey) -> Self {
        self.with(property, Value::List(Vec::new()))
    }

    /// An empty dictionary property
    pub fn with_dict(self, property: PropertyKey) -> Self {
        self.with(property, Value::Dict(Default::default()))
    }

    /// Build the descriptor. Its id is assigned on registration.
    pub fn build(self) -> EntityDescriptor {
        self.descriptor
    }
}

impl Default for TestEntityBuilder {
    fn default() -> Self {
        Self::new("entity")
    }
}
