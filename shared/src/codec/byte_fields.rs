use replica_serde::{check_length, write_length, ByteReader, ByteWrite, ByteWriter, Serde};

use crate::{
    codec::field::{FieldRead, FieldWrite, RecordReadFn, RecordWriteFn},
    error::{DecodeError, EncodeError},
    types::EntityId,
    value::Value,
};

/// Positional field writer over a private buffer.
///
/// Every operation gets its own writer so a failure part-way through never
/// leaves partial bytes in a sibling's segment.
pub struct ByteFieldWriter {
    writer: ByteWriter,
}

impl ByteFieldWriter {
    pub fn new() -> Self {
        Self {
            writer: ByteWriter::new(),
        }
    }

    pub fn raw(&mut self) -> &mut dyn ByteWrite {
        &mut self.writer
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.writer.to_bytes()
    }

    fn checked_length(field: &'static str, length: usize) -> Result<(), EncodeError> {
        check_length(length)
            .map(|_| ())
            .map_err(|_| EncodeError::LengthOverflow { field, length })
    }
}

impl Default for ByteFieldWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldWrite for ByteFieldWriter {
    fn write_u32(&mut self, _field: &'static str, value: u32) {
        value.ser(&mut self.writer);
    }

    fn write_string(&mut self, field: &'static str, value: &str) -> Result<(), EncodeError> {
        Self::checked_length(field, value.len())?;
        write_length(&mut self.writer, value.len());
        self.writer.write_bytes(value.as_bytes());
        Ok(())
    }

    fn write_entity(&mut self, _field: &'static str, entity: EntityId) {
        entity.ser(&mut self.writer);
    }

    fn write_entities(
        &mut self,
        field: &'static str,
        entities: &[EntityId],
    ) -> Result<(), EncodeError> {
        Self::checked_length(field, entities.len())?;
        write_length(&mut self.writer, entities.len());
        for entity in entities {
            if entity.is_null() {
                return Err(EncodeError::NullEntity { field });
            }
            entity.ser(&mut self.writer);
        }
        Ok(())
    }

    fn write_value(&mut self, field: &'static str, value: &Value) -> Result<(), EncodeError> {
        value.check_lengths(field)?;
        value.ser(&mut self.writer);
        Ok(())
    }

    fn write_records(
        &mut self,
        field: &'static str,
        count: usize,
        write: &mut RecordWriteFn<'_>,
    ) -> Result<(), EncodeError> {
        Self::checked_length(field, count)?;
        write_length(&mut self.writer, count);
        for index in 0..count {
            write(index, self)?;
        }
        Ok(())
    }
}

/// Positional field reader, the inverse of [`ByteFieldWriter`].
pub struct ByteFieldReader<'r, 'b> {
    reader: &'r mut ByteReader<'b>,
}

impl<'r, 'b> ByteFieldReader<'r, 'b> {
    pub fn new(reader: &'r mut ByteReader<'b>) -> Self {
        Self { reader }
    }
}

impl FieldRead for ByteFieldReader<'_, '_> {
    fn read_u32(&mut self, _field: &'static str) -> Result<u32, DecodeError> {
        Ok(u32::de(self.reader)?)
    }

    fn read_string(&mut self, _field: &'static str) -> Result<String, DecodeError> {
        Ok(String::de(self.reader)?)
    }

    fn read_entity(&mut self, _field: &'static str) -> Result<EntityId, DecodeError> {
        Ok(EntityId::de(self.reader)?)
    }

    fn read_entities(&mut self, field: &'static str) -> Result<Vec<EntityId>, DecodeError> {
        let entities = Vec::<EntityId>::de(self.reader)?;
        if entities.iter().any(EntityId::is_null) {
            return Err(DecodeError::InvalidField {
                field,
                reason: "null entity".to_string(),
            });
        }
        Ok(entities)
    }

    fn read_value(&mut self, _field: &'static str) -> Result<Value, DecodeError> {
        Ok(Value::de(self.reader)?)
    }

    fn read_records(
        &mut self,
        _field: &'static str,
        read: &mut RecordReadFn<'_>,
    ) -> Result<(), DecodeError> {
        let count = self.reader.read_length()?;
        for _ in 0..count {
            read(self)?;
        }
        Ok(())
    }
}
