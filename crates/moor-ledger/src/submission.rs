use serde::{Deserialize, Serialize};

use moor_crypto::Signature;
use moor_types::{Address, ContentHash, NonceMode};

use crate::error::LedgerError;

/// One argument of a ledger call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// A content hash.
    Hash(ContentHash),
    /// Opaque bytes.
    Bytes(Vec<u8>),
    /// A reserved slot, currently always empty.
    Empty,
}

/// Unsigned descriptor of a single ledger call: a target plus arguments.
///
/// Operations are pure data; they are constructed once and consumed exactly
/// once by signing or batching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Call target in `module.call` form, e.g. `"mark.anchor"`.
    pub target: String,
    /// Ordered call arguments.
    pub args: Vec<CallArg>,
}

impl Operation {
    pub fn new(target: impl Into<String>, args: Vec<CallArg>) -> Self {
        Self {
            target: target.into(),
            args,
        }
    }
}

/// What a signed submission carries: one operation or an ordered batch.
///
/// A batch is submitted atomically; the ledger includes all member
/// operations in one block, in construction order, or none of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionPayload {
    Single(Operation),
    Batch(Vec<Operation>),
}

impl SubmissionPayload {
    /// The member operations, in submission order.
    pub fn operations(&self) -> &[Operation] {
        match self {
            Self::Single(op) => std::slice::from_ref(op),
            Self::Batch(ops) => ops,
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }
}

/// A signed, ready-to-submit payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedSubmission {
    pub payload: SubmissionPayload,
    pub signer: Address,
    pub nonce: NonceMode,
    pub signature: Signature,
}

impl SignedSubmission {
    /// The bytes covered by a submission signature.
    pub fn signing_bytes(payload: &SubmissionPayload) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(payload).map_err(|e| LedgerError::Encoding(e.to_string()))
    }

    /// Check the signature against the signer address.
    pub fn verify_signature(&self) -> bool {
        let Ok(key) = moor_crypto::VerifyingKey::from_bytes(*self.signer.as_bytes()) else {
            return false;
        };
        let Ok(bytes) = Self::signing_bytes(&self.payload) else {
            return false;
        };
        key.verify(&bytes, &self.signature).is_ok()
    }
}
