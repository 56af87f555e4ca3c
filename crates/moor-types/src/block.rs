use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a ledger block that included a submission.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockRef {
    /// Block height.
    pub number: u64,
    /// Block hash.
    pub hash: [u8; 32],
}

impl BlockRef {
    pub fn new(number: u64, hash: [u8; 32]) -> Self {
        Self { number, hash }
    }

    /// Hex-encoded block hash.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Short hex representation of the block hash (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.hash[..4])
    }
}

impl fmt::Debug for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockRef(#{} {})", self.number, self.short_hex())
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.number, self.hash_hex())
    }
}
