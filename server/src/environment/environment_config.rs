use std::default::Default;

use replica_shared::Encoding;

/// Contains Config properties which will be used by the Environment
#[derive(Clone, Debug)]
pub struct EnvironmentConfig {
    /// Coalesce each transaction before it is rendered. A transaction that
    /// was already simplified by its producer is sent as-is.
    pub simplify_before_send: bool,
    /// Encoding used for users that have not asked for a specific one
    pub default_encoding: Encoding,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            simplify_before_send: true,
            default_encoding: Encoding::Bytes,
        }
    }
}
