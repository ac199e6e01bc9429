pub(crate) mod interpolation;
pub(crate) mod replica_entity;

pub use interpolation::Interpolation;
pub use replica_entity::ReplicaEntity;
