/// PROPERTY-BASED TESTS: simplify invariants
///
/// Key invariants:
/// 1. Simplify never grows the operation list
/// 2. Every observer's replica ends in the same state whether or not the
///    transaction was simplified
/// 3. Each observer still sees the last value written to every property

use std::collections::BTreeMap;

use proptest::prelude::*;
use replica_client::SceneReplica;
use replica_shared::{
    users, EntityDescriptor, EntityId, Operation, OperationData, Transaction, TransactionReader,
    UserKey, UserSet, Value,
};
use replica_test::replica_snapshot;

const LIST: u32 = 5;
const OBSERVERS: [UserKey; 3] = [UserKey::new(1), UserKey::new(2), UserKey::new(3)];

fn descriptor(entity: EntityId) -> EntityDescriptor {
    EntityDescriptor::new(entity, EntityId::NULL, "node")
        .with_property(LIST, Value::List(vec![Value::Int(0), Value::Int(0)]))
}

fn audience_strategy() -> impl Strategy<Value = UserSet> {
    (1u8..8).prop_map(|mask| {
        users(
            OBSERVERS
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, key)| *key),
        )
    })
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    let entity = (1u64..4).prop_map(EntityId::new);
    (entity, 0u32..6, 0u32..3, any::<i16>(), audience_strategy()).prop_map(
        |(entity, choice, slot, value, audience)| match choice {
            0 | 1 => Operation::set_entity_property(entity, slot, value as i64, audience),
            2 => Operation::set_entity_list_property(entity, LIST, slot, value as i64, audience),
            3 => Operation::set_entity_list_add_property(entity, LIST, 0, value as i64, audience),
            4 => Operation::delete_entity(entity, audience),
            _ => Operation::load_entity(vec![descriptor(entity)], audience),
        },
    )
}

fn seeded_replica() -> SceneReplica {
    let mut replica = SceneReplica::default();
    for id in 1..4 {
        replica
            .apply_operation(OperationData::LoadEntity {
                descriptors: vec![descriptor(EntityId::new(id))],
            })
            .unwrap();
    }
    replica
}

fn replay(transaction: &mut Transaction, user: &UserKey) -> SceneReplica {
    let mut replica = seeded_replica();
    if let Some(bytes) = transaction.render_bytes(user) {
        replica.apply(TransactionReader::read_bytes(&bytes).unwrap());
    }
    replica
}

proptest! {
    #[test]
    fn prop_simplify_never_grows(operations in prop::collection::vec(operation_strategy(), 0..24)) {
        let mut transaction = Transaction::new(true);
        for operation in operations.iter().cloned() {
            transaction += operation;
        }
        let before = transaction.len();
        transaction.simplify();
        prop_assert!(transaction.len() <= before);
    }

    #[test]
    fn prop_simplify_preserves_each_observers_outcome(
        operations in prop::collection::vec(operation_strategy(), 0..24)
    ) {
        let mut plain = Transaction::new(true);
        let mut simplified = Transaction::new(true);
        for operation in operations {
            plain += operation.clone();
            simplified += operation;
        }
        simplified.simplify();

        for user in OBSERVERS.iter() {
            let expected = replica_snapshot(&replay(&mut plain, user));
            let actual = replica_snapshot(&replay(&mut simplified, user));
            prop_assert_eq!(expected, actual);
        }
    }

    #[test]
    fn prop_last_scalar_write_survives(
        values in prop::collection::vec((0u32..3, any::<i32>(), audience_strategy()), 1..16)
    ) {
        let entity = EntityId::new(1);
        let mut transaction = Transaction::new(true);
        let mut last: BTreeMap<(UserKey, u32), i32> = BTreeMap::new();
        for (property, value, audience) in values {
            for user in audience.iter() {
                last.insert((*user, property), value);
            }
            transaction += Operation::set_entity_property(entity, property, value, audience);
        }
        transaction.simplify();

        for ((user, property), value) in last {
            let replica = replay(&mut transaction, &user);
            prop_assert_eq!(replica.property(entity, property), Some(&Value::from(value)));
        }
    }
}
