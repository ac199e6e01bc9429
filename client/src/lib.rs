//! # Replica Client
//! Decodes transactions sent by a replica environment, in either encoding,
//! and applies them in order to a local mirror of the entities this
//! observer can see.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use replica_shared::{
        DecodeError, Encoding, EntityDescriptor, EntityId, OperationData, Payload, PropertyKey,
        ReceivedTransaction, TransactionReader, Value,
    };
}

mod entity;
mod error;
mod replica;
mod replica_config;

pub use entity::{Interpolation, ReplicaEntity};
pub use error::{ApplyError, ReplicaError};
pub use replica::{ApplyReport, SceneReplica};
pub use replica_config::ReplicaConfig;
