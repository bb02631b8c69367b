//! Error types.

use thiserror::Error;

use crate::view::ViewId;

/// Structural misuse of the view tree. Returned instead of mutating the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("view handle {0:?} is no longer alive")]
    StaleHandle(ViewId),

    #[error("view {0:?} cannot be attached to itself")]
    SelfAttach(ViewId),

    #[error("view {child:?} is already a child of {parent:?}")]
    AlreadyChild { parent: ViewId, child: ViewId },

    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle { parent: ViewId, child: ViewId },

    #[error("view {child:?} is not a child of {parent:?}")]
    NotAChild { parent: ViewId, child: ViewId },

    #[error("view {0:?} is attached to a parent")]
    Attached(ViewId),

    #[error("view {0:?} has no parent")]
    Detached(ViewId),

    #[error("index {index} out of range for {count} subviews")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("view {0:?} is not a frame")]
    NotAFrame(ViewId),
}

/// Failure to load or validate a [`UiConfig`](crate::config::UiConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
