use thiserror::Error;

use super::transaction::TransactionState;

/// Errors from driving a [`Transaction`](super::Transaction) through its
/// lifecycle out of order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// `simplify` may run once, before rendering
    #[error("Transaction has already been simplified")]
    AlreadySimplified,

    /// Operations may only be appended while the transaction is building
    #[error("Cannot append to a transaction in the {state:?} state")]
    NotBuilding { state: TransactionState },

    /// Rendering has begun, the operation list is final
    #[error("Transaction is sealed for rendering and cannot be mutated")]
    Sealed,
}
