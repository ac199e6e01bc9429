use replica_shared::{DispatchError, UserKey};

/// What one [`Environment::send`](super::Environment::send) did, per user.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SendReport {
    /// Users whose payload the sink accepted
    pub delivered: Vec<UserKey>,
    /// Users with nothing to send
    pub skipped: Vec<UserKey>,
    /// Users whose payload the sink rejected. Not retried.
    pub failed: Vec<(UserKey, DispatchError)>,
    /// Operations omitted from some payload because they failed to encode,
    /// summed over all users
    pub omitted_operations: usize,
}

impl SendReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.omitted_operations == 0
    }
}
