use tracing::debug;

use moor_ledger::LedgerConnection;
use moor_types::{Address, Nonce};

use crate::error::TxError;

/// Resolves the next usable nonce for an account against the ledger.
///
/// The sequencer never computes nonces locally: each call queries the
/// ledger's confirmed counter at call time. When several submissions must
/// go out before any confirmation, use [`NonceMode::Automatic`] instead and
/// let the ledger's pending-pool tracking assign them.
///
/// [`NonceMode::Automatic`]: moor_types::NonceMode::Automatic
pub struct NonceSequencer<'c> {
    conn: &'c dyn LedgerConnection,
}

impl<'c> NonceSequencer<'c> {
    pub fn new(conn: &'c dyn LedgerConnection) -> Self {
        Self { conn }
    }

    /// The account's current confirmed nonce.
    ///
    /// Fails with [`LedgerError::UnknownAccount`] for an address the ledger
    /// has never seen.
    ///
    /// [`LedgerError::UnknownAccount`]: moor_ledger::LedgerError::UnknownAccount
    pub async fn next(&self, address: &Address) -> Result<Nonce, TxError> {
        let nonce = self.conn.account_nonce(address).await?;
        debug!(address = %address.short_hex(), nonce = %nonce, "nonce resolved");
        Ok(nonce)
    }
}
