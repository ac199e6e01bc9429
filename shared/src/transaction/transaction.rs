use std::ops::AddAssign;

use log::{trace, warn};
use replica_serde::{Bytable, ByteWriter, Serde};
use serde_json::Value as Json;

use crate::{
    codec::DocumentFieldWriter,
    error::EncodeError,
    operation::{
        operation::Operation,
        operation_kind::{TRANSACTION_OPCODE, TRANSACTION_TYPE_NAME},
    },
    transaction::{
        error::TransactionError,
        payload::{Encoding, Payload, RenderedTransaction, SkippedOperation},
        simplify::simplify,
    },
    types::UserKey,
};

/// Where a [`Transaction`] is in its one-way lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionState {
    /// Operations may be appended
    Building,
    /// Coalesced; the list shape is final
    Simplified,
    /// At least one observer's payload has been produced
    Rendered,
}

/// An ordered batch of operations, rendered independently for each observer.
#[derive(Clone, Debug)]
pub struct Transaction {
    reliable: bool,
    operations: Vec<Operation>,
    state: TransactionState,
}

impl Transaction {
    pub fn new(reliable: bool) -> Self {
        Self {
            reliable,
            operations: Vec::new(),
            state: TransactionState::Building,
        }
    }

    /// Transport hint: must-arrive rather than best-effort.
    pub fn reliable(&self) -> bool {
        self.reliable
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of operations `user` is an observer of.
    pub fn visible_count(&self, user: &UserKey) -> usize {
        self.operations
            .iter()
            .filter(|operation| operation.is_visible_to(user))
            .count()
    }

    // Building

    pub fn try_add(&mut self, operation: Operation) -> Result<(), TransactionError> {
        match self.state {
            TransactionState::Building => {
                self.operations.push(operation);
                Ok(())
            }
            TransactionState::Simplified => Err(TransactionError::NotBuilding { state: self.state }),
            TransactionState::Rendered => Err(TransactionError::Sealed),
        }
    }

    /// Appends `operation`.
    ///
    /// # Panics
    ///
    /// Panics if the transaction has been simplified or rendered.
    pub fn add(&mut self, operation: Operation) {
        if let Err(error) = self.try_add(operation) {
            panic!("{}", error);
        }
    }

    // Simplify

    pub fn try_simplify(&mut self) -> Result<(), TransactionError> {
        match self.state {
            TransactionState::Building => {
                let operations = std::mem::take(&mut self.operations);
                self.operations = simplify(operations);
                self.state = TransactionState::Simplified;
                Ok(())
            }
            TransactionState::Simplified => Err(TransactionError::AlreadySimplified),
            TransactionState::Rendered => Err(TransactionError::Sealed),
        }
    }

    /// Coalesces superseded operations, per observer.
    ///
    /// # Panics
    ///
    /// Panics if called twice, or after rendering has begun.
    pub fn simplify(&mut self) {
        if let Err(error) = self.try_simplify() {
            panic!("{}", error);
        }
    }

    // Rendering

    /// Renders the operations visible to `user`, in order.
    ///
    /// Returns `None` when nothing should be sent: no operation is visible
    /// to `user`, or every visible operation failed to encode. Operations
    /// that fail to encode are omitted and listed in
    /// [`RenderedTransaction::skipped`].
    ///
    /// Rendering seals the transaction. Rendering again for the same observer
    /// yields identical output.
    pub fn render(&mut self, user: &UserKey, encoding: Encoding) -> Option<RenderedTransaction> {
        self.state = TransactionState::Rendered;

        match encoding {
            Encoding::Bytes => self.render_bytes_for(user),
            Encoding::Document => self.render_document_for(user),
        }
    }

    pub fn render_bytes(&mut self, user: &UserKey) -> Option<Vec<u8>> {
        match self.render(user, Encoding::Bytes)?.payload {
            Payload::Bytes(bytes) => Some(bytes),
            Payload::Document(_) => None,
        }
    }

    pub fn render_document(&mut self, user: &UserKey) -> Option<Json> {
        match self.render(user, Encoding::Document)?.payload {
            Payload::Document(document) => Some(document),
            Payload::Bytes(_) => None,
        }
    }

    fn render_bytes_for(&self, user: &UserKey) -> Option<RenderedTransaction> {
        let (segments, skipped) = self.encode_visible(user, |operation| {
            operation.data().write_bytes()
        })?;

        let body: Bytable = segments.into_iter().collect();
        let operation_count = body.count();
        let body = match body.into_list() {
            Ok(body) => body,
            Err(error) => {
                warn!("Transaction for {} cannot be framed: {}", user, error);
                return None;
            }
        };

        let mut writer = ByteWriter::with_capacity(4 + 1 + body.len());
        TRANSACTION_OPCODE.ser(&mut writer);
        self.reliable.ser(&mut writer);
        body.write_into(&mut writer);

        trace!(
            "Rendered {} operations ({} bytes) for {}",
            operation_count,
            writer.bytes_written(),
            user
        );

        Some(RenderedTransaction {
            payload: Payload::Bytes(writer.to_bytes()),
            operation_count,
            skipped,
        })
    }

    fn render_document_for(&self, user: &UserKey) -> Option<RenderedTransaction> {
        let (documents, skipped) =
            self.encode_visible(user, |operation| operation.data().to_document())?;

        let operation_count = documents.len();
        let mut writer = DocumentFieldWriter::typed(TRANSACTION_TYPE_NAME);
        writer.insert("reliable", Json::Bool(self.reliable));
        writer.insert("operations", Json::Array(documents));

        trace!("Rendered {} operation documents for {}", operation_count, user);

        Some(RenderedTransaction {
            payload: Payload::Document(writer.into_document()),
            operation_count,
            skipped,
        })
    }

    /// Encodes each operation visible to `user` on its own, so a failure
    /// leaves its siblings intact. `None` if nothing encoded.
    fn encode_visible<T>(
        &self,
        user: &UserKey,
        encode: impl Fn(&Operation) -> Result<T, EncodeError>,
    ) -> Option<(Vec<T>, Vec<SkippedOperation>)> {
        let mut encoded = Vec::new();
        let mut skipped = Vec::new();

        for (index, operation) in self.operations.iter().enumerate() {
            if !operation.is_visible_to(user) {
                continue;
            }
            match encode(operation) {
                Ok(output) => encoded.push(output),
                Err(error) => {
                    warn!(
                        "Omitting {} at position {} from transaction for {}: {}",
                        operation.kind().name(),
                        index,
                        user,
                        error
                    );
                    skipped.push(SkippedOperation {
                        index,
                        kind: operation.kind(),
                        error,
                    });
                }
            }
        }

        if encoded.is_empty() {
            return None;
        }
        Some((encoded, skipped))
    }
}

impl AddAssign<Operation> for Transaction {
    fn add_assign(&mut self, operation: Operation) {
        self.add(operation);
    }
}
