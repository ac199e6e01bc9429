use crate::{
    environment::error::DispatchError,
    transaction::{Encoding, Payload},
    types::{UserKey, UserSet},
};

/// The session directory: who is currently joined, and how they read.
pub trait UserDirectory {
    fn all_joined_users(&self) -> UserSet;

    /// The encoding `user` consumes. `None` defers to the environment
    /// default.
    fn encoding_of(&self, _user: &UserKey) -> Option<Encoding> {
        None
    }
}

/// The transport boundary. Accepts or rejects a whole payload, synchronously.
pub trait DispatchSink {
    fn dispatch(
        &mut self,
        user: &UserKey,
        payload: Payload,
        reliable: bool,
    ) -> Result<(), DispatchError>;
}
