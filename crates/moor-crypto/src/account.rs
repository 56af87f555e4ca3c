use moor_types::Address;

use crate::signer::{Signature, SigningKey, VerifyingKey};

/// A ledger account: an address plus the capability to sign for it.
///
/// Owned by the process for the lifetime of a run. The signing key is never
/// mutated; the account is only asked to sign submission payloads and to
/// report its address for nonce lookups.
pub struct Account {
    key: SigningKey,
}

impl Account {
    /// Account for a well-known development identity label (e.g. `"//Eve"`).
    pub fn dev(label: &str) -> Self {
        Self {
            key: SigningKey::from_dev_label(label),
        }
    }

    /// Account from a raw 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(seed),
        }
    }

    /// Freshly generated account.
    pub fn generate() -> Self {
        Self {
            key: SigningKey::generate(),
        }
    }

    /// The account's ledger address.
    pub fn address(&self) -> Address {
        self.key.verifying_key().to_address()
    }

    /// The account's public verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }

    /// Sign a submission payload.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.key.sign(message)
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Account({})", self.address().short_hex())
    }
}
