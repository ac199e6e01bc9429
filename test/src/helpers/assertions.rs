/// Assert that a user's replica holds `value` for an entity property
#[macro_export]
macro_rules! assert_replica_property {
    ($scene:expr, $user:expr, $entity:expr, $property:expr, $value:expr) => {
        assert_eq!(
            $scene.replica(&$user).property($entity, $property),
            Some(&$crate::shared::Value::from($value)),
            "{} should see property {} of entity {}",
            $user,
            $property,
            $entity
        );
    };
}

/// Assert that a user's replica does not know an entity
#[macro_export]
macro_rules! assert_replica_lacks {
    ($scene:expr, $user:expr, $entity:expr) => {
        assert!(
            !$scene.replica(&$user).contains($entity),
            "{} should not see entity {}",
            $user,
            $entity
        );
    };
}
