use thiserror::Error;

use crate::types::{EntityId, UserKey};

/// Errors from an [`EntityRegistry`](super::EntityRegistry)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No live entity has this id
    #[error("Entity {entity} is not registered")]
    EntityNotFound { entity: EntityId },

    /// The reserved null id cannot be registered or resolved
    #[error("The null entity cannot be registered")]
    NullEntity,

    /// The id is already taken by a live entity
    #[error("Entity {entity} is already registered")]
    EntityAlreadyRegistered { entity: EntityId },
}

/// Errors reported by a [`DispatchSink`](super::DispatchSink)
///
/// A dispatch error rejects the whole payload. The sink never performs a
/// partial write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Payload for {user} was rejected: {reason}")]
    Rejected { user: UserKey, reason: String },

    #[error("No route to {user}")]
    UnknownUser { user: UserKey },
}
