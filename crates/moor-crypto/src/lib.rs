//! Cryptographic primitives for Moor.
//!
//! Provides the content hasher used to derive anchor identifiers, Ed25519
//! signing wrappers, and the [`Account`] type that couples an address with
//! its signing capability.

pub mod account;
pub mod hasher;
pub mod signer;

pub use account::Account;
pub use hasher::ContentHasher;
pub use signer::{Signature, SignatureError, SigningKey, VerifyingKey};
