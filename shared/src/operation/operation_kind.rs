// The opcode registry. Opcodes are never reused: a retired kind keeps its
// number reserved and a new kind takes the next free one.

pub const TRANSACTION_OPCODE: u32 = 0x01;
pub const TRANSACTION_TYPE_NAME: &str = "Transaction";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum OperationKind {
    SetEntityProperty = 0x10,
    MultiSetEntityProperty = 0x11,
    SetEntityListAddProperty = 0x12,
    SetEntityListRemoveProperty = 0x13,
    SetEntityListProperty = 0x14,
    SetEntityDictionaryAddProperty = 0x15,
    SetEntityDictionaryRemoveProperty = 0x16,
    SetEntityDictionaryProperty = 0x17,
    StartInterpolationProperty = 0x18,
    StopInterpolationProperty = 0x19,
    LoadEntity = 0x20,
    DeleteEntity = 0x21,
}

impl OperationKind {
    pub const ALL: [OperationKind; 12] = [
        OperationKind::SetEntityProperty,
        OperationKind::MultiSetEntityProperty,
        OperationKind::SetEntityListAddProperty,
        OperationKind::SetEntityListRemoveProperty,
        OperationKind::SetEntityListProperty,
        OperationKind::SetEntityDictionaryAddProperty,
        OperationKind::SetEntityDictionaryRemoveProperty,
        OperationKind::SetEntityDictionaryProperty,
        OperationKind::StartInterpolationProperty,
        OperationKind::StopInterpolationProperty,
        OperationKind::LoadEntity,
        OperationKind::DeleteEntity,
    ];

    pub fn opcode(&self) -> u32 {
        *self as u32
    }

    /// The `$type` discriminator used by the document encoding.
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::SetEntityProperty => "SetEntityProperty",
            OperationKind::MultiSetEntityProperty => "MultiSetEntityProperty",
            OperationKind::SetEntityListAddProperty => "SetEntityListAddProperty",
            OperationKind::SetEntityListRemoveProperty => "SetEntityListRemoveProperty",
            OperationKind::SetEntityListProperty => "SetEntityListProperty",
            OperationKind::SetEntityDictionaryAddProperty => "SetEntityDictionaryAddProperty",
            OperationKind::SetEntityDictionaryRemoveProperty => {
                "SetEntityDictionaryRemoveProperty"
            }
            OperationKind::SetEntityDictionaryProperty => "SetEntityDictionaryProperty",
            OperationKind::StartInterpolationProperty => "StartInterpolationProperty",
            OperationKind::StopInterpolationProperty => "StopInterpolationProperty",
            OperationKind::LoadEntity => "LoadEntity",
            OperationKind::DeleteEntity => "DeleteEntity",
        }
    }

    pub fn from_opcode(opcode: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.opcode() == opcode)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// List adds/removes shift indices and bound list-replace coalescing.
    pub fn is_list_structural(&self) -> bool {
        matches!(
            self,
            OperationKind::SetEntityListAddProperty | OperationKind::SetEntityListRemoveProperty
        )
    }

    /// Dictionary adds/removes bound dictionary-replace coalescing.
    pub fn is_dictionary_structural(&self) -> bool {
        matches!(
            self,
            OperationKind::SetEntityDictionaryAddProperty
                | OperationKind::SetEntityDictionaryRemoveProperty
        )
    }
}
