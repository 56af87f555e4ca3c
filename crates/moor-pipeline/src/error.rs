use moor_ledger::LedgerError;
use moor_tx::TxError;

/// Errors that terminate an anchoring run.
///
/// Every failure surfaces here; no component below retries or swallows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Tx(#[from] TxError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
