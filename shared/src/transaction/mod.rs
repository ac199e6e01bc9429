mod error;
mod payload;
mod simplify;
#[allow(clippy::module_inception)]
mod transaction;
mod transaction_reader;

pub use error::TransactionError;
pub use payload::{Encoding, Payload, RenderedTransaction, SkippedOperation};
pub use transaction::{Transaction, TransactionState};
pub use transaction_reader::{ReceivedTransaction, TransactionReader};
