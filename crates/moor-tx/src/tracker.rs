use std::sync::Arc;

use tracing::{info, warn};

use moor_ledger::{
    DispatchFailure, ErrorRegistry, LedgerConnection, SignedSubmission, StatusStream,
    SubmissionStatus,
};
use moor_types::BlockRef;

use crate::error::TxError;

/// A submitted payload and its lifecycle, folded into an explicit state.
///
/// The ledger pushes events on a per-submission stream; the tracker applies
/// them to a [`SubmissionStatus`] value and exposes awaitable accessors, so
/// callers suspend until the state they need instead of nesting callbacks.
/// The tracker never retries: a terminal failure surfaces as an error and
/// retry policy stays with the orchestrator.
pub struct Submission {
    label: String,
    status: SubmissionStatus,
    stream: StatusStream,
    registry: Arc<ErrorRegistry>,
}

impl Submission {
    /// Submit a sealed payload and begin tracking it.
    pub async fn submit(
        conn: &dyn LedgerConnection,
        signed: SignedSubmission,
        registry: Arc<ErrorRegistry>,
        label: impl Into<String>,
    ) -> Result<Self, TxError> {
        let label = label.into();
        let operations = signed.payload.operations().len();
        let stream = conn.submit(signed).await?;
        info!(submission = %label, operations, "submitted");
        Ok(Self {
            label,
            status: SubmissionStatus::Created,
            stream,
            registry,
        })
    }

    /// The last observed state.
    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Suspend until the submission is included in a block.
    ///
    /// Inclusion, not finality: a candidate block is accepted as confirmation.
    /// `Rejected` and `DispatchError` surface as errors, the latter decoded
    /// through the registry when possible.
    pub async fn wait_for_in_block(&mut self) -> Result<BlockRef, TxError> {
        loop {
            match self.next_status().await? {
                SubmissionStatus::InBlock(block) | SubmissionStatus::Finalized(block) => {
                    return Ok(block);
                }
                SubmissionStatus::Rejected(reason) => return Err(TxError::Rejected(reason)),
                SubmissionStatus::DispatchError(failure) => {
                    return Err(TxError::Dispatch(self.describe(&failure)));
                }
                SubmissionStatus::Created | SubmissionStatus::Broadcast => {}
            }
        }
    }

    /// Suspend until the including block is irreversible.
    pub async fn wait_for_finalized(&mut self) -> Result<BlockRef, TxError> {
        loop {
            match self.next_status().await? {
                SubmissionStatus::Finalized(block) => return Ok(block),
                SubmissionStatus::Rejected(reason) => return Err(TxError::Rejected(reason)),
                SubmissionStatus::DispatchError(failure) => {
                    return Err(TxError::Dispatch(self.describe(&failure)));
                }
                _ => {}
            }
        }
    }

    /// Suspend until any terminal state and return it.
    ///
    /// Unlike the `wait_for_*` accessors this does not turn failures into
    /// errors; observers that only report use it.
    pub async fn wait_for_terminal(&mut self) -> Result<SubmissionStatus, TxError> {
        loop {
            let status = self.next_status().await?;
            if status.is_terminal() {
                return Ok(status);
            }
        }
    }

    /// Receive and fold the next lifecycle event.
    async fn next_status(&mut self) -> Result<SubmissionStatus, TxError> {
        let Some(next) = self.stream.recv().await else {
            warn!(submission = %self.label, last = %self.status, "status stream closed");
            return Err(TxError::StreamClosed);
        };
        if !next.can_follow(&self.status) {
            warn!(
                submission = %self.label,
                from = self.status.label(),
                to = next.label(),
                "out-of-order lifecycle event"
            );
        }
        info!(submission = %self.label, status = %next, "lifecycle event");
        self.status = next.clone();
        Ok(next)
    }

    /// Decode a dispatch failure through the registry, falling back to the
    /// raw descriptor.
    fn describe(&self, failure: &DispatchFailure) -> String {
        match failure {
            DispatchFailure::Module { module, error } => self
                .registry
                .resolve(*module, *error)
                .map(|meta| meta.describe())
                .unwrap_or_else(|| failure.to_string()),
            DispatchFailure::Other(descriptor) => descriptor.clone(),
        }
    }
}

impl std::fmt::Debug for Submission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Submission({}, {})", self.label, self.status.label())
    }
}
