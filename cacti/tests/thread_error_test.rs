// Integration tests for error types in cacti::thread::error

use cacti::thread::error::*;
use cacti::ActorId;

#[test]
fn test_queue_error_display() {
    assert_eq!(QueueError::Full { limit: 1024 }.to_string(), "Queue is full (limit: 1024)");
    assert_eq!(
        QueueError::AllocationFailed { capacity: 64 }.to_string(),
        "Failed to grow queue to capacity 64"
    );
}

#[test]
fn test_send_error_display() {
    assert_eq!(SendError::TargetDead(ActorId(4)).to_string(), "Target actor#4 is dead");
    assert_eq!(SendError::TargetNotFound(ActorId(9)).to_string(), "Target actor#9 not found");
    let internal: SendError = QueueError::Full { limit: 2 }.into();
    assert_eq!(
        internal.to_string(),
        "Internal error during delivery: Queue is full (limit: 2)"
    );
}

#[test]
fn test_spawn_error_display() {
    assert_eq!(
        SpawnError::ActorLimitReached { limit: 8 }.to_string(),
        "Actor limit reached (limit: 8)"
    );
}

#[test]
fn test_step_error_display() {
    let err = StepError::UnknownMessageType {
        message_type: 0x1f,
        handler_count: 3,
    };
    assert_eq!(err.to_string(), "No handler for message type 0x1f (role has 3 handlers)");
}

#[test]
fn test_system_error_display() {
    assert_eq!(
        SystemError::AlreadyRunning.to_string(),
        "An actor system is already running in this process"
    );
    assert_eq!(
        SystemError::ConfigError("pool_size must be at least 1".to_string()).to_string(),
        "Configuration error: pool_size must be at least 1"
    );
    assert_eq!(
        SystemError::ThreadSetupError("no threads".to_string()).to_string(),
        "Thread setup error: no threads"
    );
    assert_eq!(
        SystemError::JoinFromWorker.to_string(),
        "Cannot join the actor system from one of its own workers"
    );
}

#[test]
fn test_system_error_conversions() {
    let spawn: SystemError = SpawnError::ActorLimitReached { limit: 1 }.into();
    assert!(matches!(spawn, SystemError::Spawn(_)));
    assert_eq!(spawn.to_string(), "Actor creation failed: Actor limit reached (limit: 1)");

    let send: SystemError = SendError::TargetNotFound(ActorId(0)).into();
    assert!(matches!(send, SystemError::Send(SendError::TargetNotFound(ActorId(0)))));
    assert_eq!(send.to_string(), "Initial delivery failed: Target actor#0 not found");
}

#[test]
fn test_failed_create_reports_a_concrete_cause() {
    let err = cacti::ActorSystem::create(
        cacti::ThreadActorSystemConfig::default().with_pool_size(0),
        cacti::Role::builder().build_shared(),
    )
    .unwrap_err();
    assert!(matches!(err, SystemError::ConfigError(_)));
}
