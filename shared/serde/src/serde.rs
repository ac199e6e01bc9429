use std::collections::BTreeMap;

use crate::{
    byte_reader::ByteReader,
    byte_writer::{ByteCounter, ByteWrite},
    error::SerdeErr,
};

/// A type that can be written to and read from the positional byte format.
///
/// Primitives are little-endian and untagged. Compound values (strings,
/// lists, maps) carry an `int32` count prefix so a reader without a schema
/// can still skip them.
pub trait Serde: Sized {
    fn ser(&self, writer: &mut dyn ByteWrite);

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;

    fn byte_length(&self) -> usize {
        let mut counter = ByteCounter::new();
        self.ser(&mut counter);
        counter.bytes_needed()
    }
}

/// Fails if `length` cannot be carried by an `int32` prefix.
pub fn check_length(length: usize) -> Result<i32, SerdeErr> {
    i32::try_from(length).map_err(|_| SerdeErr::LengthOverflow { length })
}

/// Writes an `int32` length/count prefix.
///
/// # Panics
///
/// Panics if `length` exceeds `i32::MAX`. Callers encoding untrusted sizes
/// should validate with [`check_length`] first.
pub fn write_length(writer: &mut dyn ByteWrite, length: usize) {
    let Ok(length) = check_length(length) else {
        panic!("length {} does not fit in an int32 prefix", length);
    };
    writer.write_bytes(&length.to_le_bytes());
}

impl Serde for bool {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(u8::from(*self));
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(SerdeErr::InvalidBool { byte }),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl Serde for u8 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(*self);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_byte()
    }

    fn byte_length(&self) -> usize {
        1
    }
}

macro_rules! impl_serde_for_number {
    ($($ty:ty),*) => {$(
        impl Serde for $ty {
            fn ser(&self, writer: &mut dyn ByteWrite) {
                writer.write_bytes(&self.to_le_bytes());
            }

            fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                Ok(<$ty>::from_le_bytes(reader.read_array::<{ std::mem::size_of::<$ty>() }>()?))
            }

            fn byte_length(&self) -> usize {
                std::mem::size_of::<$ty>()
            }
        }
    )*};
}

impl_serde_for_number!(u16, u32, u64, i16, i32, i64, f32, f64);

impl Serde for String {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_length(writer, self.len());
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = reader.read_length()?;
        let bytes = reader.read_bytes(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SerdeErr::InvalidUtf8)
    }

    fn byte_length(&self) -> usize {
        4 + self.len()
    }
}

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_length(writer, self.len());
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let count = reader.read_length()?;
        // every element occupies at least one byte, so cap the allocation
        let mut output = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }
}

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        match self {
            Some(value) => {
                true.ser(writer);
                value.ser(writer);
            }
            None => false.ser(writer),
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }
}

impl<K: Serde + Ord, V: Serde> Serde for BTreeMap<K, V> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_length(writer, self.len());
        for (key, value) in self {
            key.ser(writer);
            value.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let count = reader.read_length()?;
        let mut output = BTreeMap::new();
        for index in 0..count {
            let key = K::de(reader)?;
            let value = V::de(reader)?;
            if output.insert(key, value).is_some() {
                return Err(SerdeErr::DuplicateKey { index });
            }
        }
        Ok(output)
    }
}
