/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("account {0} is unknown to the ledger")]
    UnknownAccount(String),

    #[error("batch of {len} operations exceeds the ledger limit of {limit}")]
    OversizedBatch { limit: usize, len: usize },

    #[error("ledger connection is closed")]
    ConnectionClosed,

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("invalid error registry: {0}")]
    InvalidRegistry(String),
}
