use moor_ledger::LedgerError;

/// Errors produced by transaction construction and tracking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TxError {
    #[error("cannot aggregate an empty batch")]
    EmptyBatch,

    #[error("submission rejected by the ledger: {0}")]
    Rejected(String),

    #[error("dispatch error: {0}")]
    Dispatch(String),

    #[error("status stream closed before a terminal state")]
    StreamClosed,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
