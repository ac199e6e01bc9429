use log::warn;
use replica_serde::{ByteReader, Serde};
use serde_json::Value as Json;

use crate::{
    codec::DocumentFieldReader,
    error::DecodeError,
    operation::{
        operation_data::OperationData,
        operation_kind::{OperationKind, TRANSACTION_OPCODE, TRANSACTION_TYPE_NAME},
    },
    transaction::payload::Payload,
};

/// A decoded transaction, operations in the order they must be applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceivedTransaction {
    pub reliable: bool,
    pub operations: Vec<OperationData>,
}

/// Decodes rendered transactions.
///
/// Decoding fails closed: any error discards the whole transaction.
pub struct TransactionReader;

impl TransactionReader {
    pub fn read(payload: &Payload) -> Result<ReceivedTransaction, DecodeError> {
        let output = match payload {
            Payload::Bytes(bytes) => Self::read_bytes(bytes),
            Payload::Document(document) => Self::read_document(document),
        };
        if let Err(error) = &output {
            warn!("Discarding incoming transaction: {}", error);
        }
        output
    }

    pub fn read_bytes(bytes: &[u8]) -> Result<ReceivedTransaction, DecodeError> {
        let mut reader = ByteReader::new(bytes);

        let opcode = u32::de(&mut reader)?;
        if opcode != TRANSACTION_OPCODE {
            if OperationKind::from_opcode(opcode).is_some() {
                return Err(DecodeError::UnexpectedOpcode {
                    expected: TRANSACTION_OPCODE,
                    actual: opcode,
                });
            }
            return Err(DecodeError::UnknownOpcode { opcode });
        }

        let reliable = bool::de(&mut reader)?;
        let count = reader.read_length()?;

        // a hostile count must not pre-allocate past what the buffer can hold
        let mut operations = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            operations.push(OperationData::read_bytes(&mut reader)?);
        }

        if !reader.is_empty() {
            return Err(DecodeError::TrailingBytes {
                remaining: reader.remaining(),
            });
        }

        Ok(ReceivedTransaction {
            reliable,
            operations,
        })
    }

    pub fn read_document(document: &Json) -> Result<ReceivedTransaction, DecodeError> {
        let reader = DocumentFieldReader::new(document)?;

        let type_name = reader.type_name()?;
        if type_name != TRANSACTION_TYPE_NAME {
            return Err(DecodeError::UnknownDocumentType {
                type_name: type_name.to_string(),
            });
        }

        let reliable = reader
            .get("reliable")?
            .as_bool()
            .ok_or_else(|| DecodeError::InvalidField {
                field: "reliable",
                reason: "expected a boolean".to_string(),
            })?;

        let operations = reader
            .get("operations")?
            .as_array()
            .ok_or_else(|| DecodeError::InvalidField {
                field: "operations",
                reason: "expected an array".to_string(),
            })?
            .iter()
            .map(OperationData::from_document)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReceivedTransaction {
            reliable,
            operations,
        })
    }
}

#[cfg(test)]
mod tests {
    use replica_serde::{SerdeErr, MAX_NESTING_DEPTH};
    use serde_json::json;

    use super::*;
    use crate::value::ValueTag;

    fn single_operation_frame(operation: &[u8]) -> Vec<u8> {
        let mut bytes = TRANSACTION_OPCODE.to_le_bytes().to_vec();
        bytes.push(1);
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(operation);
        bytes
    }

    #[test]
    fn empty_buffer_is_exhausted() {
        assert_eq!(
            TransactionReader::read_bytes(&[]),
            Err(DecodeError::Serde(SerdeErr::BufferExhausted {
                needed: 4,
                remaining: 0
            }))
        );
    }

    #[test]
    fn operation_opcode_at_frame_start_is_unexpected() {
        let bytes = 0x21u32.to_le_bytes();
        assert_eq!(
            TransactionReader::read_bytes(&bytes),
            Err(DecodeError::UnexpectedOpcode {
                expected: TRANSACTION_OPCODE,
                actual: 0x21
            })
        );
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = TRANSACTION_OPCODE.to_le_bytes().to_vec();
        bytes.push(0);
        bytes.extend_from_slice(&0i32.to_le_bytes());
        bytes.push(0xAB);
        assert_eq!(
            TransactionReader::read_bytes(&bytes),
            Err(DecodeError::TrailingBytes { remaining: 1 })
        );
    }

    #[test]
    fn document_with_wrong_type_is_rejected() {
        let document = json!({ "$type": "DeleteEntity", "entity": 3 });
        assert_eq!(
            TransactionReader::read_document(&document),
            Err(DecodeError::UnknownDocumentType {
                type_name: "DeleteEntity".to_string()
            })
        );
    }

    #[test]
    fn document_with_bad_operation_fails_whole_transaction() {
        let document = json!({
            "$type": "Transaction",
            "reliable": true,
            "operations": [
                { "$type": "DeleteEntity", "entity": 3 },
                { "$type": "Teleport", "entity": 3 },
            ]
        });
        assert_eq!(
            TransactionReader::read_document(&document),
            Err(DecodeError::UnknownDocumentType {
                type_name: "Teleport".to_string()
            })
        );
    }

    #[test]
    fn deeply_nested_value_fails_closed() {
        let mut operation = OperationKind::SetEntityProperty.opcode().to_le_bytes().to_vec();
        operation.extend_from_slice(&4u64.to_le_bytes());
        operation.extend_from_slice(&0u32.to_le_bytes());
        for _ in 0..200_000 {
            operation.push(ValueTag::List as u8);
            operation.extend_from_slice(&1i32.to_le_bytes());
        }
        operation.push(ValueTag::Null as u8);

        assert_eq!(
            TransactionReader::read_bytes(&single_operation_frame(&operation)),
            Err(DecodeError::Serde(SerdeErr::NestingTooDeep {
                limit: MAX_NESTING_DEPTH
            }))
        );
    }

    #[test]
    fn null_target_entity_is_rejected() {
        let mut operation = OperationKind::DeleteEntity.opcode().to_le_bytes().to_vec();
        operation.extend_from_slice(&0u64.to_le_bytes());

        assert_eq!(
            TransactionReader::read_bytes(&single_operation_frame(&operation)),
            Err(DecodeError::InvalidField {
                field: "entity",
                reason: "null entity".to_string()
            })
        );
    }

    #[test]
    fn null_entity_in_multi_set_is_rejected() {
        let document = json!({
            "$type": "Transaction",
            "reliable": false,
            "operations": [{
                "$type": "MultiSetEntityProperty",
                "entities": [2, 0],
                "property": 1,
                "value": { "$type": "Bool", "value": true },
            }]
        });
        assert_eq!(
            TransactionReader::read_document(&document),
            Err(DecodeError::InvalidField {
                field: "entities",
                reason: "null entity".to_string()
            })
        );
    }

    #[test]
    fn duplicate_descriptor_property_is_rejected() {
        let document = json!({
            "$type": "Transaction",
            "reliable": true,
            "operations": [{
                "$type": "LoadEntity",
                "descriptors": [{
                    "entity": 5,
                    "parent": 0,
                    "name": "lamp",
                    "properties": [
                        { "property": 0, "value": { "$type": "Int", "value": 1 } },
                        { "property": 0, "value": { "$type": "Int", "value": 2 } },
                    ],
                }],
            }]
        });
        assert_eq!(
            TransactionReader::read_document(&document),
            Err(DecodeError::InvalidField {
                field: "properties",
                reason: "duplicate property 0".to_string()
            })
        );
    }
}
