pub mod entity_descriptor;
#[allow(clippy::module_inception)]
pub mod operation;
pub mod operation_data;
pub mod operation_kind;
