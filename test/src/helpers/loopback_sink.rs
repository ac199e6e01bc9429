use std::collections::{BTreeMap, BTreeSet};

use replica_shared::{DispatchError, DispatchSink, Payload, UserKey};

/// A DispatchSink which queues each user's payloads in memory instead of
/// sending them
#[derive(Default)]
pub struct LoopbackSink {
    inboxes: BTreeMap<UserKey, Vec<(Payload, bool)>>,
    rejected_users: BTreeSet<UserKey>,
}

impl LoopbackSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads for `user` will be rejected until `accept` is called
    pub fn reject(&mut self, user: UserKey) {
        self.rejected_users.insert(user);
    }

    pub fn accept(&mut self, user: &UserKey) {
        self.rejected_users.remove(user);
    }

    /// Drains the queued payloads for `user`, oldest first
    pub fn take(&mut self, user: &UserKey) -> Vec<Payload> {
        self.inboxes
            .remove(user)
            .unwrap_or_default()
            .into_iter()
            .map(|(payload, _)| payload)
            .collect()
    }

    pub fn queued(&self, user: &UserKey) -> usize {
        self.inboxes.get(user).map(Vec::len).unwrap_or(0)
    }

    pub fn reliable_flags(&self, user: &UserKey) -> Vec<bool> {
        self.inboxes
            .get(user)
            .map(|queue| queue.iter().map(|(_, reliable)| *reliable).collect())
            .unwrap_or_default()
    }
}

impl DispatchSink for LoopbackSink {
    fn dispatch(
        &mut self,
        user: &UserKey,
        payload: Payload,
        reliable: bool,
    ) -> Result<(), DispatchError> {
        if self.rejected_users.contains(user) {
            return Err(DispatchError::Rejected {
                user: *user,
                reason: "rejected by test".to_string(),
            });
        }
        self.inboxes
            .entry(*user)
            .or_default()
            .push((payload, reliable));
        Ok(())
    }
}
