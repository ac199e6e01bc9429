use crate::{environment::error::RegistryError, operation::entity_descriptor::EntityDescriptor, types::EntityId};

/// Owner of entity ids and of the durable state operations reference.
///
/// Operations never allocate ids. They are handed out by `register` and
/// retired by `unregister`; `EntityId::NULL` is never handed out.
pub trait EntityRegistry {
    /// A consistent snapshot of `entity`, as a `LoadEntity` would carry it.
    fn resolve(&self, entity: EntityId) -> Result<EntityDescriptor, RegistryError>;

    /// Registers a new entity and returns its id. The descriptor's own
    /// `entity` field is ignored.
    fn register(&self, descriptor: EntityDescriptor) -> EntityId;

    /// Retires `entity`, returning its final snapshot.
    fn unregister(&self, entity: EntityId) -> Result<EntityDescriptor, RegistryError>;

    fn contains(&self, entity: EntityId) -> bool {
        self.resolve(entity).is_ok()
    }
}
