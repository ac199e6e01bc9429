use std::{collections::BTreeSet, fmt};

use replica_serde::{ByteReader, ByteWrite, Serde, SerdeErr};
use serde::{Deserialize, Serialize};

pub type PropertyKey = u32;
pub type ListIndex = u32;
pub type DictionaryKey = String;
pub type ResourceId = u64;

/// Observers an operation is addressed to.
pub type UserSet = BTreeSet<UserKey>;

// EntityId
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Reserved "no entity" sentinel, never handed out by a registry.
    pub const NULL: EntityId = EntityId(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Serde for EntityId {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self(u64::de(reader)?))
    }

    fn byte_length(&self) -> usize {
        8
    }
}

// UserKey
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(u64);

impl UserKey {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user {}", self.0)
    }
}

/// Builds a [`UserSet`] from any list of keys.
pub fn users<I: IntoIterator<Item = UserKey>>(keys: I) -> UserSet {
    keys.into_iter().collect()
}
