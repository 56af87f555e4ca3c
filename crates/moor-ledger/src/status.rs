use std::fmt;

use serde::{Deserialize, Serialize};

use moor_types::BlockRef;

/// Execution-time failure descriptor for an admitted submission.
///
/// Module failures carry the ledger's module/error index pair and can be
/// decoded through the error registry. Anything else is surfaced as the raw
/// descriptor string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchFailure {
    Module { module: u8, error: u8 },
    Other(String),
}

impl fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module { module, error } => write!(f, "module error {module}/{error}"),
            Self::Other(descriptor) => write!(f, "{descriptor}"),
        }
    }
}

/// Lifecycle state of a submission.
///
/// The success path is `Created → Broadcast → InBlock → Finalized`. From
/// `Broadcast` or `InBlock` a submission may end in `DispatchError` (it was
/// included but its effect was refused at execution time). From `Created`
/// it may end in `Rejected` (never admitted to the pending pool). The last
/// event a consumer receives is terminal; nothing follows a terminal state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Created,
    Broadcast,
    InBlock(BlockRef),
    Finalized(BlockRef),
    Rejected(String),
    DispatchError(DispatchFailure),
}

impl SubmissionStatus {
    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Finalized(_) | Self::Rejected(_) | Self::DispatchError(_)
        )
    }

    /// The block that included this submission, if it reached one.
    pub fn block(&self) -> Option<&BlockRef> {
        match self {
            Self::InBlock(block) | Self::Finalized(block) => Some(block),
            _ => None,
        }
    }

    /// Whether `self` is a legal successor of `prev` in the lifecycle
    /// state machine.
    pub fn can_follow(&self, prev: &SubmissionStatus) -> bool {
        match prev {
            Self::Created => matches!(self, Self::Broadcast | Self::Rejected(_)),
            Self::Broadcast => matches!(self, Self::InBlock(_) | Self::DispatchError(_)),
            Self::InBlock(_) => matches!(self, Self::Finalized(_) | Self::DispatchError(_)),
            Self::Finalized(_) | Self::Rejected(_) | Self::DispatchError(_) => false,
        }
    }

    /// Short label for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Broadcast => "broadcast",
            Self::InBlock(_) => "in_block",
            Self::Finalized(_) => "finalized",
            Self::Rejected(_) => "rejected",
            Self::DispatchError(_) => "dispatch_error",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Broadcast => write!(f, "broadcast"),
            Self::InBlock(block) => write!(f, "in block {block}"),
            Self::Finalized(block) => write!(f, "finalized in block {block}"),
            Self::Rejected(reason) => write!(f, "rejected: {reason}"),
            Self::DispatchError(failure) => write!(f, "dispatch error: {failure}"),
        }
    }
}
