mod byte_fields;
mod document_fields;
mod field;

pub use byte_fields::{ByteFieldReader, ByteFieldWriter};
pub use document_fields::{DocumentFieldReader, DocumentFieldWriter, TYPE_FIELD};
pub use field::{read_target, write_target, FieldRead, FieldWrite, RecordReadFn, RecordWriteFn};
