use std::ops::{Add, AddAssign};

use crate::{
    byte_writer::{ByteWrite, ByteWriter},
    error::SerdeErr,
    serde::{check_length, Serde},
};

/// A self-delimiting segment of encoded bytes.
///
/// Segments concatenate with `+`, preserving order. Each segment remembers how
/// many *countable* elements it holds so that a list built from several
/// segments can be prefixed with the right element count. Raw blobs which
/// already carry their own framing are marked uncountable and add bytes
/// without adding to the count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bytable {
    bytes: Vec<u8>,
    count: usize,
}

impl Bytable {
    pub fn new() -> Self {
        Self::default()
    }

    /// One countable element.
    pub fn countable(bytes: Vec<u8>) -> Self {
        Self { bytes, count: 1 }
    }

    /// Bytes that do not contribute to an enclosing list's count.
    pub fn uncountable(bytes: Vec<u8>) -> Self {
        Self { bytes, count: 0 }
    }

    pub fn from_serde<T: Serde>(value: &T) -> Self {
        let mut writer = ByteWriter::with_capacity(value.byte_length());
        value.ser(&mut writer);
        Self::countable(writer.to_bytes())
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Wraps the segment's elements into a single countable list element,
    /// prefixed with the `int32` element count.
    pub fn into_list(self) -> Result<Self, SerdeErr> {
        let count = check_length(self.count)?;
        let mut bytes = Vec::with_capacity(4 + self.bytes.len());
        bytes.extend_from_slice(&count.to_le_bytes());
        bytes.extend_from_slice(&self.bytes);
        Ok(Self::countable(bytes))
    }

    pub fn write_into(&self, writer: &mut dyn ByteWrite) {
        writer.write_bytes(&self.bytes);
    }
}

impl Add for Bytable {
    type Output = Bytable;

    fn add(mut self, rhs: Bytable) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for Bytable {
    fn add_assign(&mut self, rhs: Bytable) {
        self.bytes.extend_from_slice(&rhs.bytes);
        self.count += rhs.count;
    }
}

impl FromIterator<Bytable> for Bytable {
    fn from_iter<I: IntoIterator<Item = Bytable>>(iter: I) -> Self {
        iter.into_iter().fold(Bytable::new(), |acc, item| acc + item)
    }
}
