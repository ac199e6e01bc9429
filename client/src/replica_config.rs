use std::default::Default;

/// Contains Config properties which will be used by a SceneReplica
#[derive(Clone, Debug, Default)]
pub struct ReplicaConfig {
    /// Stop applying a transaction at its first failing operation. Otherwise
    /// each failure is local and the remaining operations still apply.
    pub strict_apply: bool,
}
