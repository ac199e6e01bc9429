use replica_shared::{Encoding, UserKey};

// User

/// A joined observer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    key: UserKey,
    encoding: Option<Encoding>,
}

impl User {
    pub fn new(key: UserKey, encoding: Option<Encoding>) -> Self {
        Self { key, encoding }
    }

    pub fn key(&self) -> UserKey {
        self.key
    }

    /// The encoding this user asked for, if any.
    pub fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    pub(crate) fn set_encoding(&mut self, encoding: Option<Encoding>) {
        self.encoding = encoding;
    }
}
