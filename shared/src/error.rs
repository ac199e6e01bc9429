use replica_serde::SerdeErr;
use thiserror::Error;

/// Errors that can occur while encoding a single operation
///
/// An encode error is local to the operation that produced it. The render
/// step omits that operation for the observer and carries on with its
/// siblings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// An operation targeted the reserved null entity
    #[error("Field `{field}` references the null entity")]
    NullEntity { field: &'static str },

    /// A float value cannot be represented in a document (NaN or infinite)
    #[error("Field `{field}` contains a non-finite float which documents cannot represent")]
    NonFiniteFloat { field: &'static str },

    /// A string or collection is too long for an `int32` length prefix
    #[error("Field `{field}` has length {length} which does not fit in an int32 prefix")]
    LengthOverflow { field: &'static str, length: usize },

    /// The document serializer rejected a value
    #[error("Document serialization failed: {message}")]
    Document { message: String },
}

/// Errors that can occur while decoding an incoming payload
///
/// Decoding fails closed: a decode error anywhere in a transaction discards
/// the whole transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The byte reader failed (buffer exhausted, bad tag, bad length)
    #[error("Malformed byte payload: {0}")]
    Serde(#[from] SerdeErr),

    /// An opcode that is not in the registry
    #[error("Unknown opcode {opcode:#x}")]
    UnknownOpcode { opcode: u32 },

    /// A registered opcode where a different one was required
    #[error("Expected opcode {expected:#x}, got {actual:#x}")]
    UnexpectedOpcode { expected: u32, actual: u32 },

    /// A document record lacks a required field
    #[error("Document is missing field `{field}`")]
    MissingField { field: &'static str },

    /// A document field is present but has the wrong shape
    #[error("Document field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// A document `$type` that is not a registered operation kind
    #[error("Unknown document type `{type_name}`")]
    UnknownDocumentType { type_name: String },

    /// Bytes remained after the declared contents were read
    #[error("{remaining} unexpected trailing bytes after transaction")]
    TrailingBytes { remaining: usize },
}
