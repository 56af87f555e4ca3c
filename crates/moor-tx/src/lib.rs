//! Client-side transaction machinery for Moor.
//!
//! Builds anchor operations, aggregates them into atomic batches, sequences
//! nonces against the ledger, seals payloads into signed submissions, and
//! tracks each submission's lifecycle through an explicit state machine
//! with awaitable accessors.

pub mod anchor;
pub mod batch;
pub mod error;
pub mod nonce;
pub mod seal;
pub mod tracker;

pub use anchor::{linked_anchor, root_anchor, LINKED_ANCHOR_TARGET, ROOT_ANCHOR_TARGET};
pub use batch::Batch;
pub use error::TxError;
pub use nonce::NonceSequencer;
pub use seal::seal;
pub use tracker::Submission;
