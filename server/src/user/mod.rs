#[allow(clippy::module_inception)]
pub(crate) mod user;
pub(crate) mod user_registry;

pub use user::User;
pub use user_registry::UserRegistry;
