use serde::Deserialize;
use serde_json::{Map, Value as Json};

use crate::{
    codec::field::{FieldRead, FieldWrite, RecordReadFn, RecordWriteFn},
    error::{DecodeError, EncodeError},
    types::EntityId,
    value::Value,
};

pub const TYPE_FIELD: &str = "$type";

/// Named field writer producing a JSON object.
pub struct DocumentFieldWriter {
    map: Map<String, Json>,
}

impl DocumentFieldWriter {
    pub fn new() -> Self {
        Self { map: Map::new() }
    }

    pub fn typed(type_name: &str) -> Self {
        let mut output = Self::new();
        output
            .map
            .insert(TYPE_FIELD.to_string(), Json::String(type_name.to_string()));
        output
    }

    pub fn insert(&mut self, field: &str, value: Json) {
        self.map.insert(field.to_string(), value);
    }

    pub fn into_document(self) -> Json {
        Json::Object(self.map)
    }
}

impl Default for DocumentFieldWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldWrite for DocumentFieldWriter {
    fn write_u32(&mut self, field: &'static str, value: u32) {
        self.insert(field, Json::from(value));
    }

    fn write_string(&mut self, field: &'static str, value: &str) -> Result<(), EncodeError> {
        self.insert(field, Json::String(value.to_string()));
        Ok(())
    }

    fn write_entity(&mut self, field: &'static str, entity: EntityId) {
        self.insert(field, Json::from(entity.to_u64()));
    }

    fn write_entities(
        &mut self,
        field: &'static str,
        entities: &[EntityId],
    ) -> Result<(), EncodeError> {
        let mut array = Vec::with_capacity(entities.len());
        for entity in entities {
            if entity.is_null() {
                return Err(EncodeError::NullEntity { field });
            }
            array.push(Json::from(entity.to_u64()));
        }
        self.insert(field, Json::Array(array));
        Ok(())
    }

    fn write_value(&mut self, field: &'static str, value: &Value) -> Result<(), EncodeError> {
        value.check_finite(field)?;
        let document = serde_json::to_value(value).map_err(|err| EncodeError::Document {
            message: err.to_string(),
        })?;
        self.insert(field, document);
        Ok(())
    }

    fn write_records(
        &mut self,
        field: &'static str,
        count: usize,
        write: &mut RecordWriteFn<'_>,
    ) -> Result<(), EncodeError> {
        let mut array = Vec::with_capacity(count);
        for index in 0..count {
            let mut nested = DocumentFieldWriter::new();
            write(index, &mut nested)?;
            array.push(nested.into_document());
        }
        self.insert(field, Json::Array(array));
        Ok(())
    }
}

/// Named field reader over a JSON object.
pub struct DocumentFieldReader<'d> {
    map: &'d Map<String, Json>,
}

impl<'d> DocumentFieldReader<'d> {
    pub fn new(document: &'d Json) -> Result<Self, DecodeError> {
        let Some(map) = document.as_object() else {
            return Err(DecodeError::InvalidField {
                field: TYPE_FIELD,
                reason: "document is not an object".to_string(),
            });
        };
        Ok(Self { map })
    }

    pub fn type_name(&self) -> Result<&'d str, DecodeError> {
        self.map
            .get(TYPE_FIELD)
            .ok_or(DecodeError::MissingField { field: TYPE_FIELD })?
            .as_str()
            .ok_or_else(|| DecodeError::InvalidField {
                field: TYPE_FIELD,
                reason: "expected a string".to_string(),
            })
    }

    pub fn get(&self, field: &'static str) -> Result<&'d Json, DecodeError> {
        self.map
            .get(field)
            .ok_or(DecodeError::MissingField { field })
    }

    fn get_u64(&self, field: &'static str) -> Result<u64, DecodeError> {
        self.get(field)?
            .as_u64()
            .ok_or_else(|| DecodeError::InvalidField {
                field,
                reason: "expected an unsigned integer".to_string(),
            })
    }

    fn get_array(&self, field: &'static str) -> Result<&'d Vec<Json>, DecodeError> {
        self.get(field)?
            .as_array()
            .ok_or_else(|| DecodeError::InvalidField {
                field,
                reason: "expected an array".to_string(),
            })
    }
}

impl FieldRead for DocumentFieldReader<'_> {
    fn read_u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        let value = self.get_u64(field)?;
        u32::try_from(value).map_err(|_| DecodeError::InvalidField {
            field,
            reason: format!("{} does not fit in 32 bits", value),
        })
    }

    fn read_string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        self.get(field)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DecodeError::InvalidField {
                field,
                reason: "expected a string".to_string(),
            })
    }

    fn read_entity(&mut self, field: &'static str) -> Result<EntityId, DecodeError> {
        Ok(EntityId::new(self.get_u64(field)?))
    }

    fn read_entities(&mut self, field: &'static str) -> Result<Vec<EntityId>, DecodeError> {
        self.get_array(field)?
            .iter()
            .map(|item| {
                match item.as_u64() {
                    Some(0) => Err(DecodeError::InvalidField {
                        field,
                        reason: "null entity".to_string(),
                    }),
                    Some(id) => Ok(EntityId::new(id)),
                    None => Err(DecodeError::InvalidField {
                        field,
                        reason: "expected an array of entity ids".to_string(),
                    }),
                }
            })
            .collect()
    }

    fn read_value(&mut self, field: &'static str) -> Result<Value, DecodeError> {
        Value::deserialize(self.get(field)?).map_err(|err| DecodeError::InvalidField {
            field,
            reason: err.to_string(),
        })
    }

    fn read_records(
        &mut self,
        field: &'static str,
        read: &mut RecordReadFn<'_>,
    ) -> Result<(), DecodeError> {
        for item in self.get_array(field)? {
            let mut nested = DocumentFieldReader::new(item)?;
            read(&mut nested)?;
        }
        Ok(())
    }
}

