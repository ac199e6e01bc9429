use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use log::info;

use replica_shared::{Encoding, UserDirectory, UserKey, UserSet};

use crate::user::user::User;

/// Users currently joined to the environment.
///
/// Join and leave arrive from session callbacks on other threads, so the
/// table sits behind a mutex.
pub struct UserRegistry {
    users: Mutex<BTreeMap<UserKey, User>>,
    next_key: AtomicU64,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(BTreeMap::new()),
            next_key: AtomicU64::new(1),
        }
    }

    /// Joins a new user. `encoding` of `None` follows the environment
    /// default.
    pub fn join(&self, encoding: Option<Encoding>) -> UserKey {
        let key = UserKey::new(self.next_key.fetch_add(1, Ordering::Relaxed));
        self.lock().insert(key, User::new(key, encoding));

        info!("{} joined", key);
        key
    }

    /// Returns whether `key` was joined.
    pub fn leave(&self, key: &UserKey) -> bool {
        let removed = self.lock().remove(key).is_some();
        if removed {
            info!("{} left", key);
        }
        removed
    }

    pub fn is_joined(&self, key: &UserKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn user(&self, key: &UserKey) -> Option<User> {
        self.lock().get(key).cloned()
    }

    /// Returns whether `key` was joined.
    pub fn set_encoding(&self, key: &UserKey, encoding: Option<Encoding>) -> bool {
        match self.lock().get_mut(key) {
            Some(user) => {
                user.set_encoding(encoding);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<UserKey, User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory for UserRegistry {
    fn all_joined_users(&self) -> UserSet {
        self.lock().keys().copied().collect()
    }

    fn encoding_of(&self, user: &UserKey) -> Option<Encoding> {
        self.lock().get(user).and_then(User::encoding)
    }
}
