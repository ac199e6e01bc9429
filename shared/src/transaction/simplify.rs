use log::debug;

use crate::{
    operation::{operation::Operation, operation_data::OperationData, operation_kind::OperationKind},
    types::{EntityId, UserSet},
};

/// Rebuilds `operations` into a smaller, equivalent list.
///
/// Last-writer-wins per observer: when a later operation supersedes an
/// earlier one, the later operation's observers are removed from the earlier
/// one, and an earlier operation left with no observers is dropped.
/// Structural list/dictionary operations are barriers for index/key based
/// replaces and are themselves always kept in order.
pub(crate) fn simplify(operations: Vec<Operation>) -> Vec<Operation> {
    let original_len = operations.len();
    let mut output: Vec<Operation> = Vec::with_capacity(original_len);

    for operation in operations {
        let users = operation.users();
        match operation.data() {
            OperationData::MultiSetEntityProperty { .. }
            | OperationData::SetEntityListAddProperty { .. }
            | OperationData::SetEntityListRemoveProperty { .. }
            | OperationData::SetEntityDictionaryAddProperty { .. }
            | OperationData::SetEntityDictionaryRemoveProperty { .. }
            | OperationData::StartInterpolationProperty { .. }
            | OperationData::StopInterpolationProperty { .. } => {}
            OperationData::SetEntityListProperty {
                entity,
                property,
                index,
                ..
            } => {
                strip_superseded(
                    &mut output,
                    users,
                    |kind| kind.is_list_structural(),
                    |prior| {
                        matches!(
                            prior,
                            OperationData::SetEntityListProperty {
                                entity: prior_entity,
                                property: prior_property,
                                index: prior_index,
                                ..
                            } if prior_entity == entity
                                && prior_property == property
                                && prior_index == index
                        )
                    },
                );
            }
            OperationData::SetEntityDictionaryProperty {
                entity,
                property,
                key,
                ..
            } => {
                strip_superseded(
                    &mut output,
                    users,
                    |kind| kind.is_dictionary_structural(),
                    |prior| {
                        matches!(
                            prior,
                            OperationData::SetEntityDictionaryProperty {
                                entity: prior_entity,
                                property: prior_property,
                                key: prior_key,
                                ..
                            } if prior_entity == entity
                                && prior_property == property
                                && prior_key == key
                        )
                    },
                );
            }
            OperationData::SetEntityProperty {
                entity, property, ..
            } => {
                strip_superseded(
                    &mut output,
                    users,
                    |_| false,
                    |prior| {
                        matches!(
                            prior,
                            OperationData::SetEntityProperty {
                                entity: prior_entity,
                                property: prior_property,
                                ..
                            } if prior_entity == entity && prior_property == property
                        )
                    },
                );
            }
            OperationData::DeleteEntity { entity } => {
                let entity = *entity;
                strip_superseded(
                    &mut output,
                    users,
                    |_| false,
                    |prior| is_lifecycle_of(prior, entity),
                );
            }
            OperationData::LoadEntity { .. } => {
                // a multi-entity load carries no single lifecycle target
                if let Some(entity) = operation.data().entity() {
                    strip_superseded(
                        &mut output,
                        users,
                        |_| false,
                        |prior| is_lifecycle_of(prior, entity),
                    );
                }
            }
        }
        output.push(operation);
    }

    debug!(
        "Simplified transaction from {} to {} operations",
        original_len,
        output.len()
    );

    output
}

/// Operations a later load or delete of `entity` makes redundant.
fn is_lifecycle_of(prior: &OperationData, entity: EntityId) -> bool {
    match prior {
        OperationData::DeleteEntity {
            entity: prior_entity,
        }
        | OperationData::SetEntityProperty {
            entity: prior_entity,
            ..
        } => *prior_entity == entity,
        OperationData::LoadEntity { .. } => prior.entity() == Some(entity),
        _ => false,
    }
}

/// Scans `output` backwards until the first operation whose kind
/// `is_boundary`, removing `users` from every operation `is_superseded`
/// selects. Operations left without observers are dropped.
fn strip_superseded(
    output: &mut Vec<Operation>,
    users: &UserSet,
    is_boundary: impl Fn(OperationKind) -> bool,
    is_superseded: impl Fn(&OperationData) -> bool,
) {
    // collected in descending order, so removal keeps earlier indices valid
    let mut emptied = Vec::new();

    for index in (0..output.len()).rev() {
        let prior = &mut output[index];
        if is_boundary(prior.kind()) {
            break;
        }
        if is_superseded(prior.data()) {
            prior.remove_users(users);
            if !prior.has_users() {
                emptied.push(index);
            }
        }
    }

    for index in emptied {
        output.remove(index);
    }
}
