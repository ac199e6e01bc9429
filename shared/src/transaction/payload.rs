use serde_json::Value as Json;

use crate::{error::EncodeError, operation::operation_kind::OperationKind};

/// Which wire encoding an observer consumes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Compact positional bytes
    #[default]
    Bytes,
    /// Self-describing tagged document
    Document,
}

/// A rendered transaction, ready to hand to a dispatch sink.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Bytes(Vec<u8>),
    Document(Json),
}

impl Payload {
    pub fn encoding(&self) -> Encoding {
        match self {
            Payload::Bytes(_) => Encoding::Bytes,
            Payload::Document(_) => Encoding::Document,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Payload::Bytes(bytes) => Some(bytes),
            Payload::Document(_) => None,
        }
    }

    pub fn as_document(&self) -> Option<&Json> {
        match self {
            Payload::Bytes(_) => None,
            Payload::Document(document) => Some(document),
        }
    }
}

/// An operation omitted from one observer's payload because it failed to
/// encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedOperation {
    /// Position in the transaction's operation list
    pub index: usize,
    pub kind: OperationKind,
    pub error: EncodeError,
}

/// The payload rendered for one observer, with what was left out.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedTransaction {
    pub payload: Payload,
    pub operation_count: usize,
    pub skipped: Vec<SkippedOperation>,
}
