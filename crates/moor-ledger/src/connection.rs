use async_trait::async_trait;
use tokio::sync::mpsc;

use moor_types::{Address, Nonce};

use crate::error::LedgerError;
use crate::status::SubmissionStatus;
use crate::submission::SignedSubmission;

/// Per-submission lifecycle stream.
///
/// The ledger delivers every lifecycle event for one submission in order on
/// this channel. The channel closing without a terminal event means the
/// connection was lost.
pub type StatusStream = mpsc::Receiver<SubmissionStatus>;

/// Connection to a ledger node.
///
/// A connection is open from construction until [`close`](Self::close) is
/// called; every call on a closed connection fails with
/// [`LedgerError::ConnectionClosed`]. The handle is passed explicitly to
/// every component that talks to the ledger.
#[async_trait]
pub trait LedgerConnection: Send + Sync {
    /// The ledger's current timestamp, in milliseconds.
    async fn timestamp_now(&self) -> Result<u64, LedgerError>;

    /// The account's current confirmed nonce.
    ///
    /// Fails with [`LedgerError::UnknownAccount`] if the ledger has never
    /// seen the address.
    async fn account_nonce(&self, address: &Address) -> Result<Nonce, LedgerError>;

    /// Admit a signed submission and stream its lifecycle events.
    ///
    /// Admission-level resource violations (e.g. an oversized batch) fail
    /// here; everything after admission arrives on the returned stream.
    async fn submit(&self, submission: SignedSubmission) -> Result<StatusStream, LedgerError>;

    /// Release the connection. Idempotent.
    async fn close(&self) -> Result<(), LedgerError>;
}
