mod dispatch;
mod entity_registry;
mod error;

pub use dispatch::{DispatchSink, UserDirectory};
pub use entity_registry::EntityRegistry;
pub use error::{DispatchError, RegistryError};
