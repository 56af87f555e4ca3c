//! Ledger boundary for Moor.
//!
//! The ledger is an external append-and-confirm service: it supplies the
//! current timestamp, resolves account nonces, admits signed submissions,
//! and pushes lifecycle events for each submission. This crate provides:
//! - The [`LedgerConnection`] trait boundary with explicit close semantics
//! - Wire-level submission types ([`Operation`], [`SignedSubmission`])
//! - The [`SubmissionStatus`] lifecycle state machine
//! - [`ErrorRegistry`] for decoding module-level dispatch errors
//! - [`InMemoryLedger`] for tests, local demos, and embedding

pub mod connection;
pub mod error;
pub mod memory;
pub mod registry;
pub mod status;
pub mod submission;

pub use connection::{LedgerConnection, StatusStream};
pub use error::LedgerError;
pub use memory::{FailureMode, InMemoryLedger, LedgerCall};
pub use registry::{ErrorRegistry, MetaError};
pub use status::{DispatchFailure, SubmissionStatus};
pub use submission::{CallArg, Operation, SignedSubmission, SubmissionPayload};
