pub(crate) mod entity_registry;

pub use entity_registry::SharedEntityRegistry;
