use std::collections::BTreeMap;

use log::debug;

use replica_client::{ApplyReport, ReplicaConfig, ReplicaEntity, SceneReplica};
use replica_server::{Environment, EnvironmentConfig, SendReport};
use replica_shared::{
    Encoding, EntityDescriptor, EntityId, EntityRegistry, Transaction, UserKey,
};

use super::LoopbackSink;

/// An environment wired to one in-memory replica per joined user
pub struct TestScene {
    pub environment: Environment,
    pub sink: LoopbackSink,
    replicas: BTreeMap<UserKey, SceneReplica>,
}

impl TestScene {
    pub fn new() -> Self {
        Self::with_config(EnvironmentConfig::default())
    }

    pub fn with_config(config: EnvironmentConfig) -> Self {
        Self {
            environment: Environment::new(config),
            sink: LoopbackSink::new(),
            replicas: BTreeMap::new(),
        }
    }

    pub fn join(&mut self, encoding: Option<Encoding>) -> UserKey {
        let user = self.environment.users().join(encoding);
        self.replicas
            .insert(user, SceneReplica::new(ReplicaConfig::default()));
        user
    }

    pub fn leave(&mut self, user: &UserKey) {
        self.environment.users().leave(user);
        self.replicas.remove(user);
    }

    pub fn spawn(&self, descriptor: EntityDescriptor) -> EntityId {
        self.environment.entities().register(descriptor)
    }

    pub fn send(&mut self, transaction: Transaction) -> SendReport {
        self.environment.send(transaction, &mut self.sink)
    }

    /// Applies every queued payload to its user's replica, in send order
    pub fn deliver(&mut self) -> BTreeMap<UserKey, Vec<ApplyReport>> {
        let mut reports = BTreeMap::new();
        for (user, replica) in self.replicas.iter_mut() {
            let mut user_reports = Vec::new();
            for payload in self.sink.take(user) {
                match replica.receive(&payload) {
                    Ok(report) => user_reports.push(report),
                    Err(error) => debug!("{} discarded a payload: {}", user, error),
                }
            }
            reports.insert(*user, user_reports);
        }
        reports
    }

    /// `send` then `deliver`
    pub fn send_and_deliver(&mut self, transaction: Transaction) -> SendReport {
        let report = self.send(transaction);
        self.deliver();
        report
    }

    pub fn replica(&self, user: &UserKey) -> &SceneReplica {
        &self.replicas[user]
    }
}

impl Default for TestScene {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered copy of everything a replica holds, for comparisons
pub fn replica_snapshot(replica: &SceneReplica) -> BTreeMap<EntityId, ReplicaEntity> {
    replica
        .entities()
        .map(|(entity, state)| (*entity, state.clone()))
        .collect()
}
