//! # Replica Server
//! The authoritative environment: registers entities, tracks joined users,
//! and renders each transaction once per user in the encoding that user
//! reads before handing it to the transport.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use replica_shared::{
        users, DispatchError, DispatchSink, Encoding, EntityDescriptor, EntityId, EntityRegistry,
        Operation, Payload, RegistryError, Transaction, UserDirectory, UserKey, UserSet, Value,
    };
}

mod entity;
mod environment;
mod user;

pub use entity::SharedEntityRegistry;
pub use environment::{Environment, EnvironmentConfig, SendReport};
pub use user::{User, UserRegistry};
