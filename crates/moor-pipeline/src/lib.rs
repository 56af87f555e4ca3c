//! Anchor pipeline orchestrator for Moor.
//!
//! Sequences the full anchoring run: derive a run-scoped root hash from the
//! schema descriptor and the ledger's current timestamp, submit the root
//! anchor, wait for inclusion, then fan out a batch of linked anchors that
//! reference the root. One causal chain, one suspension point per
//! confirmation, no retries.

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::{Pipeline, PipelineReport};
