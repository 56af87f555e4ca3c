//! Foundation types for Moor, a content-anchoring client for
//! append-and-confirm ledgers.
//!
//! This crate provides the identity and sequencing types used throughout
//! the Moor pipeline. Every other Moor crate depends on `moor-types`.
//!
//! # Key Types
//!
//! - [`ContentHash`] — Content-addressed identifier of a configurable width
//! - [`HashWidth`] — Supported output widths for content hashing
//! - [`Address`] — Account address on the ledger (public key bytes)
//! - [`Nonce`] / [`NonceMode`] — Per-account submission sequencing
//! - [`BlockRef`] — Reference to a ledger block that included a submission

pub mod address;
pub mod block;
pub mod error;
pub mod hash;
pub mod nonce;

pub use address::Address;
pub use block::BlockRef;
pub use error::TypeError;
pub use hash::{ContentHash, HashWidth};
pub use nonce::{Nonce, NonceMode};
