//! # Replica Shared
//! The entity-property transaction protocol shared between replica-server &
//! replica-client crates: operations, transactions and their coalescing, and
//! the byte and document encodings.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use replica_serde::{Bytable, ByteReader, ByteWrite, ByteWriter, Serde, SerdeErr};

mod codec;
mod environment;
mod error;
mod operation;
mod transaction;
mod types;
mod value;

pub use codec::{
    ByteFieldReader, ByteFieldWriter, DocumentFieldReader, DocumentFieldWriter, FieldRead,
    FieldWrite, RecordReadFn, RecordWriteFn, TYPE_FIELD,
};
pub use environment::{DispatchError, DispatchSink, EntityRegistry, RegistryError, UserDirectory};
pub use error::{DecodeError, EncodeError};
pub use operation::{
    entity_descriptor::EntityDescriptor,
    operation::Operation,
    operation_data::OperationData,
    operation_kind::{OperationKind, TRANSACTION_OPCODE, TRANSACTION_TYPE_NAME},
};
pub use transaction::{
    Encoding, Payload, ReceivedTransaction, RenderedTransaction, SkippedOperation, Transaction,
    TransactionError, TransactionReader, TransactionState,
};
pub use types::{
    users, DictionaryKey, EntityId, ListIndex, PropertyKey, ResourceId, UserKey, UserSet,
};
pub use value::{Color, Quat, Vec3, Value, ValueTag};
