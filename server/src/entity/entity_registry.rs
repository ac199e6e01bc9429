use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
};

use log::{debug, info};

use replica_shared::{
    EntityDescriptor, EntityId, EntityRegistry, Operation, PropertyKey, RegistryError, UserSet,
    Value,
};

/// The environment's table of live entities.
///
/// Join/leave completions touch the table from other threads, so every
/// access goes through one lock. Reads that build an operation take the lock
/// once, so an operation never mixes two versions of an entity.
pub struct SharedEntityRegistry {
    entities: RwLock<HashMap<EntityId, EntityDescriptor>>,
    next_id: AtomicU64,
}

impl SharedEntityRegistry {
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
            // 0 is EntityId::NULL
            next_id: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Re-inserts an entity under its own id, e.g. when restoring a saved
    /// scene. Later `register` calls never hand out a restored id.
    pub fn restore(&self, descriptor: EntityDescriptor) -> Result<(), RegistryError> {
        let entity = descriptor.entity;
        if entity.is_null() {
            return Err(RegistryError::NullEntity);
        }

        let mut entities = self.write();
        if entities.contains_key(&entity) {
            return Err(RegistryError::EntityAlreadyRegistered { entity });
        }
        self.next_id
            .fetch_max(entity.to_u64().saturating_add(1), Ordering::Relaxed);
        entities.insert(entity, descriptor);

        info!("Entity {} restored", entity);
        Ok(())
    }

    /// Records a new value for `property` and returns the operation that
    /// replicates it.
    pub fn set_property_operation(
        &self,
        entity: EntityId,
        property: PropertyKey,
        value: impl Into<Value>,
        users: UserSet,
    ) -> Result<Operation, RegistryError> {
        let value = value.into();
        let mut entities = self.write();
        let Some(descriptor) = entities.get_mut(&entity) else {
            return Err(RegistryError::EntityNotFound { entity });
        };
        descriptor.properties.insert(property, value.clone());

        Ok(Operation::set_entity_property(entity, property, value, users))
    }

    /// A `LoadEntity` carrying the current snapshot of every entity in
    /// `ids`, in the given order.
    pub fn load_operation(
        &self,
        ids: &[EntityId],
        users: UserSet,
    ) -> Result<Operation, RegistryError> {
        let entities = self.read();
        let descriptors = ids
            .iter()
            .map(|entity| {
                entities
                    .get(entity)
                    .cloned()
                    .ok_or(RegistryError::EntityNotFound { entity: *entity })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Operation::load_entity(descriptors, users))
    }

    /// Unregisters `entity` and returns the `DeleteEntity` announcing it.
    pub fn delete_operation(
        &self,
        entity: EntityId,
        users: UserSet,
    ) -> Result<Operation, RegistryError> {
        self.unregister(entity)?;
        Ok(Operation::delete_entity(entity, users))
    }

    /// Every live entity id, ascending.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.read().keys().copied().collect();
        ids.sort();
        ids
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<EntityId, EntityDescriptor>> {
        self.entities.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<EntityId, EntityDescriptor>> {
        self.entities.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SharedEntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry for SharedEntityRegistry {
    fn resolve(&self, entity: EntityId) -> Result<EntityDescriptor, RegistryError> {
        if entity.is_null() {
            return Err(RegistryError::NullEntity);
        }
        self.read()
            .get(&entity)
            .cloned()
            .ok_or(RegistryError::EntityNotFound { entity })
    }

    fn register(&self, mut descriptor: EntityDescriptor) -> EntityId {
        let mut entities = self.write();
        let mut entity = EntityId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        // skip ids taken by `restore`
        while entities.contains_key(&entity) {
            entity = EntityId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        }
        descriptor.entity = entity;
        entities.insert(entity, descriptor);

        info!("Entity {} registered", entity);
        entity
    }

    fn unregister(&self, entity: EntityId) -> Result<EntityDescriptor, RegistryError> {
        if entity.is_null() {
            return Err(RegistryError::NullEntity);
        }
        let descriptor = self
            .write()
            .remove(&entity)
            .ok_or(RegistryError::EntityNotFound { entity })?;

        let orphans = self
            .read()
            .values()
            .filter(|other| other.parent == entity)
            .count();
        if orphans > 0 {
            debug!("Entity {} unregistered leaving {} orphaned children", entity, orphans);
        }

        info!("Entity {} unregistered", entity);
        Ok(descriptor)
    }
}
