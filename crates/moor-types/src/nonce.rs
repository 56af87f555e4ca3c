use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-account submission sequence number.
///
/// Nonces are owned by the ledger and strictly increase per account; a
/// client mirrors them but never invents them. Reusing or skipping a nonce
/// within a causally-dependent sequence is a protocol violation.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Nonce(u64);

impl Nonce {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The next nonce in sequence.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a submission's nonce is assigned.
///
/// `Automatic` defers assignment to the ledger's own pending-pool tracking,
/// which is the safe choice when several submissions are issued back-to-back
/// without waiting for confirmation. `Explicit` pins a nonce the caller
/// fetched itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NonceMode {
    Automatic,
    Explicit(Nonce),
}

impl fmt::Display for NonceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Automatic => write!(f, "automatic"),
            Self::Explicit(nonce) => write!(f, "{nonce}"),
        }
    }
}
