//! # Error Types
//!
//! Errors that cross the API boundary. Protocol violations (sending to a dead
//! or unknown actor) and resource exhaustion in the runtime's buffers are
//! reported as values; they never crash the caller.

use thiserror::Error;

use crate::types::ActorId;

/// Failure of a push into one of the runtime's growable buffers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The buffer already holds its configured maximum.
    #[error("Queue is full (limit: {limit})")]
    Full { limit: usize },

    /// Growing the buffer failed; its contents are unchanged.
    #[error("Failed to grow queue to capacity {capacity}")]
    AllocationFailed { capacity: usize },
}

/// Outcome of a rejected `send`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("Target {0} is dead")]
    TargetDead(ActorId),

    #[error("Target {0} not found")]
    TargetNotFound(ActorId),

    #[error("Internal error during delivery: {0}")]
    Internal(#[from] QueueError),
}
