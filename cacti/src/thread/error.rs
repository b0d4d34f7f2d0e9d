use thiserror::Error;

use cacti_api::MessageType;

pub use cacti_api::errors::{QueueError, SendError};

/// Errors related to spawning actors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    #[error("Actor limit reached (limit: {limit})")]
    ActorLimitReached { limit: usize },
}

/// Errors produced while running one step of an actor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("No handler for message type {message_type:#x} (role has {handler_count} handlers)")]
    UnknownMessageType {
        message_type: MessageType,
        handler_count: usize,
    },
}

/// Errors related to the Actor System itself.
#[derive(Error, Debug)]
pub enum SystemError {
    #[error("An actor system is already running in this process")]
    AlreadyRunning,
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Thread setup error: {0}")]
    ThreadSetupError(String),
    #[error("Cannot join the actor system from one of its own workers")]
    JoinFromWorker,
    #[error("Actor creation failed: {0}")]
    Spawn(#[from] SpawnError),
    #[error("Initial delivery failed: {0}")]
    Send(#[from] SendError),
}
