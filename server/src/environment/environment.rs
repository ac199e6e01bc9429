use std::sync::Arc;

use log::{debug, warn};

use replica_shared::{
    DispatchSink, Encoding, Transaction, TransactionState, UserDirectory, UserKey,
};

use crate::{
    entity::SharedEntityRegistry,
    environment::{environment_config::EnvironmentConfig, send_report::SendReport},
    user::UserRegistry,
};

/// The authoritative side of replication.
///
/// Owns the entity table and the set of joined users. Both are shared
/// (`Arc`) so session callbacks can join/leave users and producers can
/// mutate entities while the environment is sending.
pub struct Environment {
    config: EnvironmentConfig,
    entities: Arc<SharedEntityRegistry>,
    users: Arc<UserRegistry>,
}

impl Environment {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            config,
            entities: Arc::new(SharedEntityRegistry::new()),
            users: Arc::new(UserRegistry::new()),
        }
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn entities(&self) -> &Arc<SharedEntityRegistry> {
        &self.entities
    }

    pub fn users(&self) -> &Arc<UserRegistry> {
        &self.users
    }

    /// The encoding `user` will be sent.
    pub fn encoding_for(&self, user: &UserKey) -> Encoding {
        self.users
            .encoding_of(user)
            .unwrap_or(self.config.default_encoding)
    }

    /// Renders `transaction` for every joined user and hands each non-empty
    /// payload to `sink`.
    ///
    /// Users with nothing visible are skipped; the sink never sees an empty
    /// frame. A rejected payload is recorded in the report, not retried.
    pub fn send(&self, mut transaction: Transaction, sink: &mut dyn DispatchSink) -> SendReport {
        if self.config.simplify_before_send && transaction.state() == TransactionState::Building {
            transaction.simplify();
        }

        let mut report = SendReport::default();
        for user in self.users.all_joined_users() {
            let encoding = self.encoding_for(&user);
            let Some(rendered) = transaction.render(&user, encoding) else {
                report.skipped.push(user);
                continue;
            };
            report.omitted_operations += rendered.skipped.len();

            match sink.dispatch(&user, rendered.payload, transaction.reliable()) {
                Ok(()) => report.delivered.push(user),
                Err(error) => {
                    warn!("Dispatch to {} failed: {}", user, error);
                    report.failed.push((user, error));
                }
            }
        }

        debug!(
            "Transaction of {} operations delivered to {} users, {} skipped, {} failed",
            transaction.len(),
            report.delivered.len(),
            report.skipped.len(),
            report.failed.len()
        );

        report
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(EnvironmentConfig::default())
    }
}
