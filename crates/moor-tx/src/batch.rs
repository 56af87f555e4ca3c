use moor_ledger::{Operation, SubmissionPayload};

use crate::error::TxError;

/// An ordered sequence of operations submitted atomically.
///
/// Order is preserved end to end: the ledger includes members in
/// construction order. This component enforces no upper bound; staying
/// under the ledger's resource limit is the caller's responsibility.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    operations: Vec<Operation>,
}

impl Batch {
    /// Aggregate operations into a batch, preserving input order.
    ///
    /// An empty sequence is a caller bug and fails fast.
    pub fn aggregate(operations: Vec<Operation>) -> Result<Self, TxError> {
        if operations.is_empty() {
            return Err(TxError::EmptyBatch);
        }
        Ok(Self { operations })
    }

    /// The member operations, in submission order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// A batch is never empty; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Convert into a submission payload.
    pub fn into_payload(self) -> SubmissionPayload {
        SubmissionPayload::Batch(self.operations)
    }
}
