use crate::{
    operation::{
        entity_descriptor::EntityDescriptor, operation_data::OperationData,
        operation_kind::OperationKind,
    },
    types::{DictionaryKey, EntityId, ListIndex, PropertyKey, UserKey, UserSet},
    value::Value,
};

/// One change addressed to a set of observers.
///
/// The data is fixed at construction. Only the observer set may change
/// afterwards, and only by union or difference.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    users: UserSet,
    data: OperationData,
}

impl Operation {
    pub fn new(data: OperationData, users: UserSet) -> Self {
        Self { users, data }
    }

    // Factories

    pub fn set_entity_property(
        entity: EntityId,
        property: PropertyKey,
        value: impl Into<Value>,
        users: UserSet,
    ) -> Self {
        Self::new(
            OperationData::SetEntityProperty {
                entity,
                property,
                value: value.into(),
            },
            users,
        )
    }

    pub fn multi_set_entity_property(
        entities: Vec<EntityId>,
        property: PropertyKey,
        value: impl Into<Value>,
        users: UserSet,
    ) -> Self {
        Self::new(
            OperationData::MultiSetEntityProperty {
                entities,
                property,
                value: value.into(),
            },
            users,
        )
    }

    pub fn set_entity_list_add_property(
        entity: EntityId,
        property: PropertyKey,
        index: ListIndex,
        value: impl Into<Value>,
        users: UserSet,
    ) -> Self {
        Self::new(
            OperationData::SetEntityListAddProperty {
                entity,
                property,
                index,
                value: value.into(),
            },
            users,
        )
    }

    pub fn set_entity_list_remove_property(
        entity: EntityId,
        property: PropertyKey,
        index: ListIndex,
        users: UserSet,
    ) -> Self {
        Self::new(
            OperationData::SetEntityListRemoveProperty {
                entity,
                property,
                index,
            },
            users,
        )
    }

    pub fn set_entity_list_property(
        entity: EntityId,
        property: PropertyKey,
        index: ListIndex,
        value: impl Into<Value>,
        users: UserSet,
    ) -> Self {
        Self::new(
            OperationData::SetEntityListProperty {
                entity,
                property,
                index,
                value: value.into(),
            },
            users,
        )
    }

    pub fn set_entity_dictionary_add_property(
        entity: EntityId,
        property: PropertyKey,
        key: impl Into<DictionaryKey>,
        value: impl Into<Value>,
        users: UserSet,
    ) -> Self {
        Self::new(
            OperationData::SetEntityDictionaryAddProperty {
                entity,
                property,
                key: key.into(),
                value: value.into(),
            },
            users,
        )
    }

    pub fn set_entity_dictionary_remove_property(
        entity: EntityId,
        property: PropertyKey,
        key: impl Into<DictionaryKey>,
        users: UserSet,
    ) -> Self {
        Self::new(
            OperationData::SetEntityDictionaryRemoveProperty {
                entity,
                property,
                key: key.into(),
            },
            users,
        )
    }

    pub fn set_entity_dictionary_property(
        entity: EntityId,
        property: PropertyKey,
        key: impl Into<DictionaryKey>,
        value: impl Into<Value>,
        users: UserSet,
    ) -> Self {
        Self::new(
            OperationData::SetEntityDictionaryProperty {
                entity,
                property,
                key: key.into(),
                value: value.into(),
            },
            users,
        )
    }

    pub fn start_interpolation_property(
        entity: EntityId,
        property: PropertyKey,
        value: impl Into<Value>,
        users: UserSet,
    ) -> Self {
        Self::new(
            OperationData::StartInterpolationProperty {
                entity,
                property,
                value: value.into(),
            },
            users,
        )
    }

    pub fn stop_interpolation_property(
        entity: EntityId,
        property: PropertyKey,
        value: impl Into<Value>,
        users: UserSet,
    ) -> Self {
        Self::new(
            OperationData::StopInterpolationProperty {
                entity,
                property,
                value: value.into(),
            },
            users,
        )
    }

    pub fn load_entity(descriptors: Vec<EntityDescriptor>, users: UserSet) -> Self {
        Self::new(OperationData::LoadEntity { descriptors }, users)
    }

    pub fn delete_entity(entity: EntityId, users: UserSet) -> Self {
        Self::new(OperationData::DeleteEntity { entity }, users)
    }

    // Accessors

    pub fn data(&self) -> &OperationData {
        &self.data
    }

    pub fn into_data(self) -> OperationData {
        self.data
    }

    pub fn kind(&self) -> OperationKind {
        self.data.kind()
    }

    pub fn users(&self) -> &UserSet {
        &self.users
    }

    pub fn is_visible_to(&self, user: &UserKey) -> bool {
        self.users.contains(user)
    }

    // Observer set

    /// Broadens the observer set (union).
    pub fn add_users<'a, I: IntoIterator<Item = &'a UserKey>>(&mut self, users: I) {
        self.users.extend(users);
    }

    /// Narrows the observer set (difference).
    pub fn remove_users(&mut self, users: &UserSet) {
        self.users.retain(|user| !users.contains(user));
    }

    pub fn has_users(&self) -> bool {
        !self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::users;

    #[test]
    fn observer_set_changes_by_union_and_difference() {
        let a = UserKey::new(1);
        let b = UserKey::new(2);
        let c = UserKey::new(3);

        let mut operation = Operation::delete_entity(EntityId::new(9), users([a, b]));
        operation.add_users(&users([c]));
        assert_eq!(operation.users(), &users([a, b, c]));

        operation.remove_users(&users([a, c]));
        assert!(operation.is_visible_to(&b));
        assert!(!operation.is_visible_to(&a));

        operation.remove_users(&users([b]));
        assert!(!operation.has_users());
    }
}
