/// Tests for Environment::send
/// Covers per-user encodings, empty-payload suppression and dispatch failures

use std::collections::BTreeMap;

use replica_server::{
    shared::{
        users, DispatchError, DispatchSink, Encoding, EntityDescriptor, EntityId, EntityRegistry,
        Payload, Transaction, UserKey,
    },
    Environment, EnvironmentConfig,
};
use replica_shared::TransactionReader;

#[derive(Default)]
struct CollectingSink {
    payloads: BTreeMap<UserKey, (Payload, bool)>,
    reject: Option<UserKey>,
}

impl DispatchSink for CollectingSink {
    fn dispatch(&mut self, user: &UserKey, payload: Payload, reliable: bool) -> Result<(), DispatchError> {
        if self.reject == Some(*user) {
            return Err(DispatchError::Rejected {
                user: *user,
                reason: "queue full".to_string(),
            });
        }
        self.payloads.insert(*user, (payload, reliable));
        Ok(())
    }
}

fn spawn(environment: &Environment) -> EntityId {
    environment
        .entities()
        .register(EntityDescriptor::new(EntityId::NULL, EntityId::NULL, "lamp"))
}

#[test]
fn each_user_gets_their_encoding() {
    let environment = Environment::default();
    let a = environment.users().join(None);
    let b = environment.users().join(Some(Encoding::Document));
    let entity = spawn(&environment);

    let mut transaction = Transaction::new(true);
    transaction += environment
        .entities()
        .load_operation(&[entity], users([a, b]))
        .unwrap();

    let mut sink = CollectingSink::default();
    let report = environment.send(transaction, &mut sink);

    assert_eq!(report.delivered, vec![a, b]);
    assert!(report.is_clean());
    assert_eq!(sink.payloads[&a].0.encoding(), Encoding::Bytes);
    assert_eq!(sink.payloads[&b].0.encoding(), Encoding::Document);
    assert!(sink.payloads[&a].1);

    let from_bytes = TransactionReader::read(&sink.payloads[&a].0).unwrap();
    let from_document = TransactionReader::read(&sink.payloads[&b].0).unwrap();
    assert_eq!(from_bytes, from_document);
}

#[test]
fn users_without_visible_operations_are_skipped() {
    let environment = Environment::default();
    let a = environment.users().join(None);
    let b = environment.users().join(None);
    let entity = spawn(&environment);

    let mut transaction = Transaction::new(false);
    transaction += environment
        .entities()
        .set_property_operation(entity, 0, true, users([a]))
        .unwrap();

    let mut sink = CollectingSink::default();
    let report = environment.send(transaction, &mut sink);

    assert_eq!(report.delivered, vec![a]);
    assert_eq!(report.skipped, vec![b]);
    assert!(!sink.payloads.contains_key(&b));
}

#[test]
fn rejected_payload_is_reported_not_retried() {
    let environment = Environment::default();
    let a = environment.users().join(None);
    let b = environment.users().join(None);
    let entity = spawn(&environment);

    let mut transaction = Transaction::new(true);
    transaction += environment
        .entities()
        .set_property_operation(entity, 0, 1, users([a, b]))
        .unwrap();

    let mut sink = CollectingSink {
        reject: Some(b),
        ..Default::default()
    };
    let report = environment.send(transaction, &mut sink);

    assert_eq!(report.delivered, vec![a]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, b);
    assert!(!report.is_clean());
}

#[test]
fn send_simplifies_when_configured() {
    let environment = Environment::default();
    let a = environment.users().join(None);
    let entity = spawn(&environment);

    let mut transaction = Transaction::new(true);
    for value in 0..5 {
        transaction += environment
            .entities()
            .set_property_operation(entity, 0, value, users([a]))
            .unwrap();
    }

    let mut sink = CollectingSink::default();
    environment.send(transaction, &mut sink);

    let received = TransactionReader::read(&sink.payloads[&a].0).unwrap();
    assert_eq!(received.operations.len(), 1);
}

#[test]
fn send_keeps_every_operation_when_not_simplifying() {
    let environment = Environment::new(EnvironmentConfig {
        simplify_before_send: false,
        ..Default::default()
    });
    let a = environment.users().join(None);
    let entity = spawn(&environment);

    let mut transaction = Transaction::new(true);
    for value in 0..5 {
        transaction += environment
            .entities()
            .set_property_operation(entity, 0, value, users([a]))
            .unwrap();
    }

    let mut sink = CollectingSink::default();
    environment.send(transaction, &mut sink);

    let received = TransactionReader::read(&sink.payloads[&a].0).unwrap();
    assert_eq!(received.operations.len(), 5);
}

#[test]
fn operations_for_departed_users_are_not_sent() {
    let environment = Environment::default();
    let a = environment.users().join(None);
    let b = environment.users().join(None);
    let entity = spawn(&environment);

    let mut transaction = Transaction::new(true);
    transaction += environment
        .entities()
        .delete_operation(entity, users([a, b]))
        .unwrap();
    environment.users().leave(&b);

    let mut sink = CollectingSink::default();
    let report = environment.send(transaction, &mut sink);
    assert_eq!(report.delivered, vec![a]);
    assert!(sink.payloads.get(&b).is_none());
}
