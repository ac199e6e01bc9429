//! End-to-end: environment -> dispatch -> replica, for both encodings

use replica_shared::{users, Encoding, Operation, Transaction, Value};
use replica_test::{
    assert_replica_lacks, assert_replica_property, replica_snapshot, TestEntityBuilder, TestScene,
};

fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

#[test]
fn bytes_and_document_replicas_converge() {
    init_logging();

    let mut scene = TestScene::new();
    let a = scene.join(None);
    let b = scene.join(Some(Encoding::Document));
    let lamp = scene.spawn(
        TestEntityBuilder::new("lamp")
            .with(0, true)
            .with_list(1)
            .with_dict(2)
            .build(),
    );

    let everyone = users([a, b]);
    let mut transaction = Transaction::new(true);
    transaction += scene
        .environment
        .entities()
        .load_operation(&[lamp], everyone.clone())
        .unwrap();
    transaction += Operation::set_entity_list_add_property(lamp, 1, 0, "red", everyone.clone());
    transaction += Operation::set_entity_list_add_property(lamp, 1, 1, "blue", everyone.clone());
    transaction += Operation::set_entity_list_property(lamp, 1, 0, "green", everyone.clone());
    transaction += Operation::set_entity_dictionary_add_property(lamp, 2, "lux", 800, everyone.clone());
    transaction += Operation::set_entity_dictionary_property(lamp, 2, "lux", 1200, everyone);

    let report = scene.send_and_deliver(transaction);
    assert_eq!(report.delivered, vec![a, b]);

    assert_replica_property!(scene, a, lamp, 0, true);
    assert_replica_property!(
        scene,
        a,
        lamp,
        1,
        vec![Value::from("green"), Value::from("blue")]
    );
    assert_eq!(
        replica_snapshot(scene.replica(&a)),
        replica_snapshot(scene.replica(&b))
    );
}

#[test]
fn observers_see_only_their_operations() {
    init_logging();

    let mut scene = TestScene::new();
    let a = scene.join(None);
    let b = scene.join(None);
    let door = scene.spawn(TestEntityBuilder::new("door").with(0, 0).build());
    let safe = scene.spawn(TestEntityBuilder::new("safe").with(0, 0).build());

    let mut transaction = Transaction::new(true);
    transaction += scene
        .environment
        .entities()
        .load_operation(&[door], users([a, b]))
        .unwrap();
    transaction += scene
        .environment
        .entities()
        .load_operation(&[safe], users([a]))
        .unwrap();
    scene.send_and_deliver(transaction);

    assert!(scene.replica(&a).contains(safe));
    assert_replica_lacks!(scene, b, safe);
    assert_eq!(scene.replica(&b).len(), 1);
}

#[test]
fn last_writer_wins_per_observer_end_to_end() {
    let mut scene = TestScene::new();
    let a = scene.join(None);
    let b = scene.join(Some(Encoding::Document));
    let light = scene.spawn(TestEntityBuilder::new("light").with(3, "off").build());

    let mut setup = Transaction::new(true);
    setup += scene
        .environment
        .entities()
        .load_operation(&[light], users([a, b]))
        .unwrap();
    scene.send_and_deliver(setup);

    let mut transaction = Transaction::new(true);
    transaction += Operation::set_entity_property(light, 3, "v1", users([a, b]));
    transaction += Operation::set_entity_property(light, 3, "v2", users([a]));
    scene.send_and_deliver(transaction);

    assert_replica_property!(scene, a, light, 3, "v2");
    assert_replica_property!(scene, b, light, 3, "v1");
}

#[test]
fn delete_removes_entity_from_replicas() {
    let mut scene = TestScene::new();
    let a = scene.join(None);
    let crate_entity = scene.spawn(TestEntityBuilder::new("crate").with(0, 1).build());

    let mut setup = Transaction::new(true);
    setup += scene
        .environment
        .entities()
        .load_operation(&[crate_entity], users([a]))
        .unwrap();
    scene.send_and_deliver(setup);
    assert!(scene.replica(&a).contains(crate_entity));

    let mut transaction = Transaction::new(true);
    transaction += Operation::set_entity_property(crate_entity, 0, 2, users([a]));
    transaction += scene
        .environment
        .entities()
        .delete_operation(crate_entity, users([a]))
        .unwrap();
    scene.send_and_deliver(transaction);

    assert_replica_lacks!(scene, a, crate_entity);
}

#[test]
fn rejected_user_falls_behind_until_next_snapshot() {
    let mut scene = TestScene::new();
    let a = scene.join(None);
    let b = scene.join(None);
    let tree = scene.spawn(TestEntityBuilder::new("tree").with(0, 1).build());

    scene.sink.reject(b);
    let mut transaction = Transaction::new(true);
    transaction += scene
        .environment
        .entities()
        .load_operation(&[tree], users([a, b]))
        .unwrap();
    let report = scene.send_and_deliver(transaction);
    assert_eq!(report.failed.len(), 1);
    assert_replica_lacks!(scene, b, tree);

    // self-healing is a fresh snapshot, not a retry
    scene.sink.accept(&b);
    let mut resync = Transaction::new(true);
    resync += scene
        .environment
        .entities()
        .load_operation(&[tree], users([b]))
        .unwrap();
    scene.send_and_deliver(resync);
    assert_replica_property!(scene, b, tree, 0, 1);
}

#[test]
fn reliability_hint_reaches_the_sink() {
    let mut scene = TestScene::new();
    let a = scene.join(None);
    let rock = scene.spawn(TestEntityBuilder::new("rock").build());

    let mut transaction = Transaction::new(false);
    transaction += Operation::set_entity_property(rock, 0, 1, users([a]));
    scene.send(transaction);

    assert_eq!(scene.sink.reliable_flags(&a), vec![false]);
}
