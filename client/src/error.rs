use thiserror::Error;

use replica_shared::{DecodeError, DictionaryKey, EntityId, ListIndex, PropertyKey};

/// Errors that can occur while applying one decoded operation to the replica
///
/// An apply error is local to its operation. Indices and keys travel as
/// intent and are only checked here, against the replica's own state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("Entity {entity} does not exist in the replica")]
    EntityNotFound { entity: EntityId },

    #[error("Entity {entity} has no property {property}")]
    PropertyNotFound {
        entity: EntityId,
        property: PropertyKey,
    },

    /// A list or dictionary operation targeted a property of another type
    #[error("Property {property} of entity {entity} is a {actual}, expected a {expected}")]
    PropertyTypeMismatch {
        entity: EntityId,
        property: PropertyKey,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Index {index} is out of range for property {property} of entity {entity} (length {length})")]
    IndexOutOfRange {
        entity: EntityId,
        property: PropertyKey,
        index: ListIndex,
        length: usize,
    },

    #[error("Key `{key}` not found in property {property} of entity {entity}")]
    DictionaryKeyNotFound {
        entity: EntityId,
        property: PropertyKey,
        key: DictionaryKey,
    },

    #[error("Key `{key}` already present in property {property} of entity {entity}")]
    DictionaryKeyExists {
        entity: EntityId,
        property: PropertyKey,
        key: DictionaryKey,
    },
}

/// Errors that stop an incoming transaction from being applied at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicaError {
    /// The payload did not decode; nothing was applied
    #[error("Incoming transaction discarded: {0}")]
    Decode(#[from] DecodeError),
}
