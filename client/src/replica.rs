use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use replica_shared::{
    EntityId, OperationData, Payload, PropertyKey, ReceivedTransaction, TransactionReader, Value,
};

use crate::{
    entity::ReplicaEntity,
    error::{ApplyError, ReplicaError},
    replica_config::ReplicaConfig,
};

/// Outcome of applying one transaction.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    /// Failing operations by position in the transaction
    pub failed: Vec<(usize, ApplyError)>,
    /// Operations never attempted because `strict_apply` stopped early
    pub not_attempted: usize,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// An observer's local mirror of the entities it has been sent.
pub struct SceneReplica {
    config: ReplicaConfig,
    entities: HashMap<EntityId, ReplicaEntity>,
}

impl SceneReplica {
    pub fn new(config: ReplicaConfig) -> Self {
        Self {
            config,
            entities: HashMap::new(),
        }
    }

    pub fn entity(&self, entity: EntityId) -> Option<&ReplicaEntity> {
        self.entities.get(&entity)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    pub fn property(&self, entity: EntityId, property: PropertyKey) -> Option<&Value> {
        self.entities.get(&entity)?.property(property)
    }

    pub fn entities(&self) -> impl Iterator<Item = (&EntityId, &ReplicaEntity)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Decodes `payload` and applies it. A payload that does not decode is
    /// discarded whole and leaves the replica untouched.
    pub fn receive(&mut self, payload: &Payload) -> Result<ApplyReport, ReplicaError> {
        let transaction = TransactionReader::read(payload)?;
        Ok(self.apply(transaction))
    }

    /// Applies operations in the order they were sent.
    pub fn apply(&mut self, transaction: ReceivedTransaction) -> ApplyReport {
        let total = transaction.operations.len();
        let mut report = ApplyReport::default();

        for (index, operation) in transaction.operations.into_iter().enumerate() {
            match self.apply_operation(operation) {
                Ok(()) => report.applied += 1,
                Err(error) => {
                    warn!("Cannot apply operation {} of transaction: {}", index, error);
                    report.failed.push((index, error));
                    if self.config.strict_apply {
                        report.not_attempted = total - index - 1;
                        break;
                    }
                }
            }
        }

        report
    }

    pub fn apply_operation(&mut self, operation: OperationData) -> Result<(), ApplyError> {
        match operation {
            OperationData::SetEntityProperty {
                entity,
                property,
                value,
            } => {
                self.entity_mut(entity)?.set_property(property, value);
                Ok(())
            }
            OperationData::MultiSetEntityProperty {
                entities,
                property,
                value,
            } => {
                // all or nothing
                if let Some(missing) = entities.iter().find(|entity| !self.contains(**entity)) {
                    return Err(ApplyError::EntityNotFound { entity: *missing });
                }
                for entity in entities {
                    self.entity_mut(entity)?.set_property(property, value.clone());
                }
                Ok(())
            }
            OperationData::SetEntityListAddProperty {
                entity,
                property,
                index,
                value,
            } => {
                let list = self.list_mut(entity, property)?;
                let position = index as usize;
                if position > list.len() {
                    return Err(ApplyError::IndexOutOfRange {
                        entity,
                        property,
                        index,
                        length: list.len(),
                    });
                }
                list.insert(position, value);
                Ok(())
            }
            OperationData::SetEntityListRemoveProperty {
                entity,
                property,
                index,
            } => {
                let list = self.list_mut(entity, property)?;
                let position = index as usize;
                if position >= list.len() {
                    return Err(ApplyError::IndexOutOfRange {
                        entity,
                        property,
                        index,
                        length: list.len(),
                    });
                }
                list.remove(position);
                Ok(())
            }
            OperationData::SetEntityListProperty {
                entity,
                property,
                index,
                value,
            } => {
                let list = self.list_mut(entity, property)?;
                let length = list.len();
                let Some(slot) = list.get_mut(index as usize) else {
                    return Err(ApplyError::IndexOutOfRange {
                        entity,
                        property,
                        index,
                        length,
                    });
                };
                *slot = value;
                Ok(())
            }
            OperationData::SetEntityDictionaryAddProperty {
                entity,
                property,
                key,
                value,
            } => {
                let dict = self.dict_mut(entity, property)?;
                if dict.contains_key(&key) {
                    return Err(ApplyError::DictionaryKeyExists {
                        entity,
                        property,
                        key,
                    });
                }
                dict.insert(key, value);
                Ok(())
            }
            OperationData::SetEntityDictionaryRemoveProperty {
                entity,
                property,
                key,
            } => {
                let dict = self.dict_mut(entity, property)?;
                if dict.remove(&key).is_none() {
                    return Err(ApplyError::DictionaryKeyNotFound {
                        entity,
                        property,
                        key,
                    });
                }
                Ok(())
            }
            OperationData::SetEntityDictionaryProperty {
                entity,
                property,
                key,
                value,
            } => {
                let dict = self.dict_mut(entity, property)?;
                let Some(slot) = dict.get_mut(&key) else {
                    return Err(ApplyError::DictionaryKeyNotFound {
                        entity,
                        property,
                        key,
                    });
                };
                *slot = value;
                Ok(())
            }
            OperationData::StartInterpolationProperty {
                entity,
                property,
                value,
            } => {
                self.entity_mut(entity)?
                    .interpolation_mut(property)
                    .begin(value);
                Ok(())
            }
            OperationData::StopInterpolationProperty {
                entity,
                property,
                value,
            } => {
                // the stop boundary is where the property comes to rest
                let replica_entity = self.entity_mut(entity)?;
                replica_entity.interpolation_mut(property).end(value.clone());
                replica_entity.set_property(property, value);
                Ok(())
            }
            OperationData::LoadEntity { descriptors } => {
                for descriptor in descriptors {
                    let entity = descriptor.entity;
                    if self
                        .entities
                        .insert(entity, ReplicaEntity::from_descriptor(descriptor))
                        .is_some()
                    {
                        debug!("Entity {} reloaded", entity);
                    }
                }
                Ok(())
            }
            OperationData::DeleteEntity { entity } => {
                if self.entities.remove(&entity).is_none() {
                    debug!("Delete of unknown entity {} ignored", entity);
                }
                Ok(())
            }
        }
    }

    fn entity_mut(&mut self, entity: EntityId) -> Result<&mut ReplicaEntity, ApplyError> {
        self.entities
            .get_mut(&entity)
            .ok_or(ApplyError::EntityNotFound { entity })
    }

    fn property_mut(
        &mut self,
        entity: EntityId,
        property: PropertyKey,
    ) -> Result<&mut Value, ApplyError> {
        self.entity_mut(entity)?
            .property_mut(property)
            .ok_or(ApplyError::PropertyNotFound { entity, property })
    }

    fn list_mut(
        &mut self,
        entity: EntityId,
        property: PropertyKey,
    ) -> Result<&mut Vec<Value>, ApplyError> {
        let value = self.property_mut(entity, property)?;
        let actual = value.type_name();
        value.as_list_mut().ok_or(ApplyError::PropertyTypeMismatch {
            entity,
            property,
            expected: "List",
            actual,
        })
    }

    fn dict_mut(
        &mut self,
        entity: EntityId,
        property: PropertyKey,
    ) -> Result<&mut BTreeMap<String, Value>, ApplyError> {
        let value = self.property_mut(entity, property)?;
        let actual = value.type_name();
        value.as_dict_mut().ok_or(ApplyError::PropertyTypeMismatch {
            entity,
            property,
            expected: "Dict",
            actual,
        })
    }
}

impl Default for SceneReplica {
    fn default() -> Self {
        Self::new(ReplicaConfig::default())
    }
}
