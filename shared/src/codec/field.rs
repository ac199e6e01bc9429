use crate::{
    error::{DecodeError, EncodeError},
    types::EntityId,
    value::Value,
};

pub type RecordWriteFn<'a> =
    dyn FnMut(usize, &mut dyn FieldWrite) -> Result<(), EncodeError> + 'a;
pub type RecordReadFn<'a> = dyn FnMut(&mut dyn FieldRead) -> Result<(), DecodeError> + 'a;

/// Sink for the named fields of one record.
///
/// Operations describe their fields once against this trait. The byte
/// implementation writes them positionally and ignores the names, the
/// document implementation keys them by name. Both encodings therefore
/// always carry the same fields in the same order.
pub trait FieldWrite {
    fn write_u32(&mut self, field: &'static str, value: u32);

    fn write_string(&mut self, field: &'static str, value: &str) -> Result<(), EncodeError>;

    fn write_entity(&mut self, field: &'static str, entity: EntityId);

    fn write_entities(&mut self, field: &'static str, entities: &[EntityId])
        -> Result<(), EncodeError>;

    fn write_value(&mut self, field: &'static str, value: &Value) -> Result<(), EncodeError>;

    /// Writes `count` nested records, calling `write` once per record with
    /// its index.
    fn write_records(
        &mut self,
        field: &'static str,
        count: usize,
        write: &mut RecordWriteFn<'_>,
    ) -> Result<(), EncodeError>;
}

/// Source for the named fields of one record. Mirror of [`FieldWrite`].
pub trait FieldRead {
    fn read_u32(&mut self, field: &'static str) -> Result<u32, DecodeError>;

    fn read_string(&mut self, field: &'static str) -> Result<String, DecodeError>;

    fn read_entity(&mut self, field: &'static str) -> Result<EntityId, DecodeError>;

    fn read_entities(&mut self, field: &'static str) -> Result<Vec<EntityId>, DecodeError>;

    fn read_value(&mut self, field: &'static str) -> Result<Value, DecodeError>;

    /// Calls `read` once per nested record.
    fn read_records(
        &mut self,
        field: &'static str,
        read: &mut RecordReadFn<'_>,
    ) -> Result<(), DecodeError>;
}

/// Writes an entity that must not be the null sentinel.
pub fn write_target(
    writer: &mut dyn FieldWrite,
    field: &'static str,
    entity: EntityId,
) -> Result<(), EncodeError> {
    if entity.is_null() {
        return Err(EncodeError::NullEntity { field });
    }
    writer.write_entity(field, entity);
    Ok(())
}

/// Reads an entity that must not be the null sentinel. Mirror of
/// [`write_target`].
pub fn read_target(
    reader: &mut dyn FieldRead,
    field: &'static str,
) -> Result<EntityId, DecodeError> {
    let entity = reader.read_entity(field)?;
    if entity.is_null() {
        return Err(DecodeError::InvalidField {
            field,
            reason: "null entity".to_string(),
        });
    }
    Ok(entity)
}
