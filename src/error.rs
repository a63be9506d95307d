//! Error types for traversals, snapshots and configuration.

use std::convert::Infallible;

use thiserror::Error;

use crate::node::NodeId;

/// Failure of a traversal call.
#[derive(Debug, Error)]
pub enum TraversalError<E> {
    /// The node store failed; its error is passed through unchanged.
    #[error(transparent)]
    Store(E),

    /// More expansion levels were needed than the configured maximum.
    #[error("traversal needed more than {limit} expansion levels")]
    LevelLimitExceeded {
        /// Configured maximum.
        limit: usize,
    },

    /// A frontier grew beyond the configured maximum.
    #[error("frontier of {size} nodes exceeds the configured maximum of {limit}")]
    FrontierLimitExceeded {
        /// Size of the offending frontier.
        size: usize,
        /// Configured maximum.
        limit: usize,
    },
}

/// Invalid change to an in-memory snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// Two nodes share an id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// The id does not belong to any node in the snapshot.
    #[error("unknown node id: {0}")]
    UnknownNode(NodeId),
}

/// Invalid traversal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A limit variable is set but is not a positive integer.
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidLimit {
        /// Variable name.
        key: &'static str,
        /// Raw value found.
        value: String,
    },
}

/// Failure of the slice-based convenience functions.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// The node slice could not be turned into a snapshot.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The traversal itself failed.
    #[error(transparent)]
    Traversal(#[from] TraversalError<Infallible>),
}
