use replica_serde::{Bytable, ByteReader, Serde};
use serde_json::Value as Json;

use crate::{
    codec::{
        read_target, write_target, ByteFieldReader, ByteFieldWriter, DocumentFieldReader,
        DocumentFieldWriter, FieldRead, FieldWrite,
    },
    error::{DecodeError, EncodeError},
    operation::{entity_descriptor::EntityDescriptor, operation_kind::OperationKind},
    types::{DictionaryKey, EntityId, ListIndex, PropertyKey},
    value::Value,
};

/// The payload of one change, independent of who it is addressed to.
#[derive(Clone, Debug, PartialEq)]
pub enum OperationData {
    SetEntityProperty {
        entity: EntityId,
        property: PropertyKey,
        value: Value,
    },
    MultiSetEntityProperty {
        entities: Vec<EntityId>,
        property: PropertyKey,
        value: Value,
    },
    SetEntityListAddProperty {
        entity: EntityId,
        property: PropertyKey,
        index: ListIndex,
        value: Value,
    },
    SetEntityListRemoveProperty {
        entity: EntityId,
        property: PropertyKey,
        index: ListIndex,
    },
    SetEntityListProperty {
        entity: EntityId,
        property: PropertyKey,
        index: ListIndex,
        value: Value,
    },
    SetEntityDictionaryAddProperty {
        entity: EntityId,
        property: PropertyKey,
        key: DictionaryKey,
        value: Value,
    },
    SetEntityDictionaryRemoveProperty {
        entity: EntityId,
        property: PropertyKey,
        key: DictionaryKey,
    },
    SetEntityDictionaryProperty {
        entity: EntityId,
        property: PropertyKey,
        key: DictionaryKey,
        value: Value,
    },
    StartInterpolationProperty {
        entity: EntityId,
        property: PropertyKey,
        value: Value,
    },
    StopInterpolationProperty {
        entity: EntityId,
        property: PropertyKey,
        value: Value,
    },
    LoadEntity {
        descriptors: Vec<EntityDescriptor>,
    },
    DeleteEntity {
        entity: EntityId,
    },
}

impl OperationData {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::SetEntityProperty { .. } => OperationKind::SetEntityProperty,
            Self::MultiSetEntityProperty { .. } => OperationKind::MultiSetEntityProperty,
            Self::SetEntityListAddProperty { .. } => OperationKind::SetEntityListAddProperty,
            Self::SetEntityListRemoveProperty { .. } => OperationKind::SetEntityListRemoveProperty,
            Self::SetEntityListProperty { .. } => OperationKind::SetEntityListProperty,
            Self::SetEntityDictionaryAddProperty { .. } => {
                OperationKind::SetEntityDictionaryAddProperty
            }
            Self::SetEntityDictionaryRemoveProperty { .. } => {
                OperationKind::SetEntityDictionaryRemoveProperty
            }
            Self::SetEntityDictionaryProperty { .. } => OperationKind::SetEntityDictionaryProperty,
            Self::StartInterpolationProperty { .. } => OperationKind::StartInterpolationProperty,
            Self::StopInterpolationProperty { .. } => OperationKind::StopInterpolationProperty,
            Self::LoadEntity { .. } => OperationKind::LoadEntity,
            Self::DeleteEntity { .. } => OperationKind::DeleteEntity,
        }
    }

    /// The single entity this operation targets. `None` for multi-entity
    /// operations, except a `LoadEntity` carrying exactly one descriptor.
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Self::SetEntityProperty { entity, .. }
            | Self::SetEntityListAddProperty { entity, .. }
            | Self::SetEntityListRemoveProperty { entity, .. }
            | Self::SetEntityListProperty { entity, .. }
            | Self::SetEntityDictionaryAddProperty { entity, .. }
            | Self::SetEntityDictionaryRemoveProperty { entity, .. }
            | Self::SetEntityDictionaryProperty { entity, .. }
            | Self::StartInterpolationProperty { entity, .. }
            | Self::StopInterpolationProperty { entity, .. }
            | Self::DeleteEntity { entity } => Some(*entity),
            Self::LoadEntity { descriptors } => match descriptors.as_slice() {
                [single] => Some(single.entity),
                _ => None,
            },
            Self::MultiSetEntityProperty { .. } => None,
        }
    }

    pub fn property(&self) -> Option<PropertyKey> {
        match self {
            Self::SetEntityProperty { property, .. }
            | Self::MultiSetEntityProperty { property, .. }
            | Self::SetEntityListAddProperty { property, .. }
            | Self::SetEntityListRemoveProperty { property, .. }
            | Self::SetEntityListProperty { property, .. }
            | Self::SetEntityDictionaryAddProperty { property, .. }
            | Self::SetEntityDictionaryRemoveProperty { property, .. }
            | Self::SetEntityDictionaryProperty { property, .. }
            | Self::StartInterpolationProperty { property, .. }
            | Self::StopInterpolationProperty { property, .. } => Some(*property),
            Self::LoadEntity { .. } | Self::DeleteEntity { .. } => None,
        }
    }

    /// Every entity this operation references.
    pub fn entities(&self) -> Vec<EntityId> {
        match self {
            Self::MultiSetEntityProperty { entities, .. } => entities.clone(),
            Self::LoadEntity { descriptors } => descriptors.iter().map(|d| d.entity).collect(),
            _ => self.entity().into_iter().collect(),
        }
    }

    // Fields

    pub(crate) fn write_fields(&self, writer: &mut dyn FieldWrite) -> Result<(), EncodeError> {
        match self {
            Self::SetEntityProperty {
                entity,
                property,
                value,
            }
            | Self::StartInterpolationProperty {
                entity,
                property,
                value,
            }
            | Self::StopInterpolationProperty {
                entity,
                property,
                value,
            } => {
                write_target(writer, "entity", *entity)?;
                writer.write_u32("property", *property);
                writer.write_value("value", value)
            }
            Self::MultiSetEntityProperty {
                entities,
                property,
                value,
            } => {
                writer.write_entities("entities", entities)?;
                writer.write_u32("property", *property);
                writer.write_value("value", value)
            }
            Self::SetEntityListAddProperty {
                entity,
                property,
                index,
                value,
            }
            | Self::SetEntityListProperty {
                entity,
                property,
                index,
                value,
            } => {
                write_target(writer, "entity", *entity)?;
                writer.write_u32("property", *property);
                writer.write_u32("index", *index);
                writer.write_value("value", value)
            }
            Self::SetEntityListRemoveProperty {
                entity,
                property,
                index,
            } => {
                write_target(writer, "entity", *entity)?;
                writer.write_u32("property", *property);
                writer.write_u32("index", *index);
                Ok(())
            }
            Self::SetEntityDictionaryAddProperty {
                entity,
                property,
                key,
                value,
            }
            | Self::SetEntityDictionaryProperty {
                entity,
                property,
                key,
                value,
            } => {
                write_target(writer, "entity", *entity)?;
                writer.write_u32("property", *property);
                writer.write_string("key", key)?;
                writer.write_value("value", value)
            }
            Self::SetEntityDictionaryRemoveProperty {
                entity,
                property,
                key,
            } => {
                write_target(writer, "entity", *entity)?;
                writer.write_u32("property", *property);
                writer.write_string("key", key)
            }
            Self::LoadEntity { descriptors } => {
                writer.write_records("descriptors", descriptors.len(), &mut |index, nested| {
                    descriptors[index].write_fields(nested)
                })
            }
            Self::DeleteEntity { entity } => write_target(writer, "entity", *entity),
        }
    }

    pub(crate) fn read_fields(
        kind: OperationKind,
        reader: &mut dyn FieldRead,
    ) -> Result<Self, DecodeError> {
        let output = match kind {
            OperationKind::SetEntityProperty => Self::SetEntityProperty {
                entity: read_target(reader, "entity")?,
                property: reader.read_u32("property")?,
                value: reader.read_value("value")?,
            },
            OperationKind::MultiSetEntityProperty => Self::MultiSetEntityProperty {
                entities: reader.read_entities("entities")?,
                property: reader.read_u32("property")?,
                value: reader.read_value("value")?,
            },
            OperationKind::SetEntityListAddProperty => Self::SetEntityListAddProperty {
                entity: read_target(reader, "entity")?,
                property: reader.read_u32("property")?,
                index: reader.read_u32("index")?,
                value: reader.read_value("value")?,
            },
            OperationKind::SetEntityListRemoveProperty => Self::SetEntityListRemoveProperty {
                entity: read_target(reader, "entity")?,
                property: reader.read_u32("property")?,
                index: reader.read_u32("index")?,
            },
            OperationKind::SetEntityListProperty => Self::SetEntityListProperty {
                entity: read_target(reader, "entity")?,
                property: reader.read_u32("property")?,
                index: reader.read_u32("index")?,
                value: reader.read_value("value")?,
            },
            OperationKind::SetEntityDictionaryAddProperty => {
                Self::SetEntityDictionaryAddProperty {
                    entity: read_target(reader, "entity")?,
                    property: reader.read_u32("property")?,
                    key: reader.read_string("key")?,
                    value: reader.read_value("value")?,
                }
            }
            OperationKind::SetEntityDictionaryRemoveProperty => {
                Self::SetEntityDictionaryRemoveProperty {
                    entity: read_target(reader, "entity")?,
                    property: reader.read_u32("property")?,
                    key: reader.read_string("key")?,
                }
            }
            OperationKind::SetEntityDictionaryProperty => Self::SetEntityDictionaryProperty {
                entity: read_target(reader, "entity")?,
                property: reader.read_u32("property")?,
                key: reader.read_string("key")?,
                value: reader.read_value("value")?,
            },
            OperationKind::StartInterpolationProperty => Self::StartInterpolationProperty {
                entity: read_target(reader, "entity")?,
                property: reader.read_u32("property")?,
                value: reader.read_value("value")?,
            },
            OperationKind::StopInterpolationProperty => Self::StopInterpolationProperty {
                entity: read_target(reader, "entity")?,
                property: reader.read_u32("property")?,
                value: reader.read_value("value")?,
            },
            OperationKind::LoadEntity => {
                let mut descriptors = Vec::new();
                reader.read_records("descriptors", &mut |nested| {
                    descriptors.push(EntityDescriptor::read_fields(nested)?);
                    Ok(())
                })?;
                Self::LoadEntity { descriptors }
            }
            OperationKind::DeleteEntity => Self::DeleteEntity {
                entity: read_target(reader, "entity")?,
            },
        };
        Ok(output)
    }

    // Byte encoding

    /// Encodes `opcode | fields` into an independent segment.
    pub fn write_bytes(&self) -> Result<Bytable, EncodeError> {
        let mut writer = ByteFieldWriter::new();
        self.kind().opcode().ser(writer.raw());
        self.write_fields(&mut writer)?;
        Ok(Bytable::countable(writer.to_bytes()))
    }

    pub fn read_bytes(reader: &mut ByteReader) -> Result<Self, DecodeError> {
        let opcode = u32::de(reader)?;
        let Some(kind) = OperationKind::from_opcode(opcode) else {
            return Err(DecodeError::UnknownOpcode { opcode });
        };
        Self::read_fields(kind, &mut ByteFieldReader::new(reader))
    }

    // Document encoding

    pub fn to_document(&self) -> Result<Json, EncodeError> {
        let mut writer = DocumentFieldWriter::typed(self.kind().name());
        self.write_fields(&mut writer)?;
        Ok(writer.into_document())
    }

    pub fn from_document(document: &Json) -> Result<Self, DecodeError> {
        let mut reader = DocumentFieldReader::new(document)?;
        let type_name = reader.type_name()?;
        let Some(kind) = OperationKind::from_name(type_name) else {
            return Err(DecodeError::UnknownDocumentType {
                type_name: type_name.to_string(),
            });
        };
        Self::read_fields(kind, &mut reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Vec3;

    fn set_position() -> OperationData {
        OperationData::SetEntityProperty {
            entity: EntityId::new(7),
            property: 3,
            value: Value::Vec3(Vec3::new(1.0, 2.0, 3.0)),
        }
    }

    #[test]
    fn byte_encoding_is_opcode_then_fields_in_order() {
        let bytes = set_position().write_bytes().unwrap().into_bytes();

        assert_eq!(&bytes[0..4], &0x10u32.to_le_bytes());
        assert_eq!(&bytes[4..12], &7u64.to_le_bytes());
        assert_eq!(&bytes[12..16], &3u32.to_le_bytes());
        // value tag, then three f32s
        assert_eq!(bytes.len(), 16 + 1 + 12);
    }

    #[test]
    fn document_encoding_mirrors_fields() {
        let document = set_position().to_document().unwrap();
        assert_eq!(document["$type"], "SetEntityProperty");
        assert_eq!(document["entity"], 7);
        assert_eq!(document["property"], 3);
        assert_eq!(document["value"]["$type"], "Vec3");
    }

    #[test]
    fn null_target_fails_to_encode() {
        let data = OperationData::DeleteEntity {
            entity: EntityId::NULL,
        };
        assert_eq!(
            data.write_bytes(),
            Err(EncodeError::NullEntity { field: "entity" })
        );
        assert_eq!(
            data.to_document(),
            Err(EncodeError::NullEntity { field: "entity" })
        );
    }

    #[test]
    fn unknown_opcode_is_rejected() {
        let bytes = 0xFFu32.to_le_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(
            OperationData::read_bytes(&mut reader),
            Err(DecodeError::UnknownOpcode { opcode: 0xFF })
        );
    }

    #[test]
    fn load_entity_single_target() {
        let single = OperationData::LoadEntity {
            descriptors: vec![EntityDescriptor::new(EntityId::new(4), EntityId::NULL, "door")],
        };
        assert_eq!(single.entity(), Some(EntityId::new(4)));

        let pair = OperationData::LoadEntity {
            descriptors: vec![
                EntityDescriptor::new(EntityId::new(4), EntityId::NULL, "door"),
                EntityDescriptor::new(EntityId::new(5), EntityId::new(4), "handle"),
            ],
        };
        assert_eq!(pair.entity(), None);
        assert_eq!(pair.entities(), vec![EntityId::new(4), EntityId::new(5)]);
    }
}
