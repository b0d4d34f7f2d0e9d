// cacti: a message-passing actor runtime
//
// Actors are driven by a fixed pool of worker threads. Each actor owns a
// growable mailbox and a private state slot, and runs at most one handler at
// a time. Roles (tables of message handlers) and messages are defined in
// `cacti-api`; this crate provides the thread-based runtime and logging
// setup.

pub mod logging;
pub mod thread;

pub use cacti_api::{
    ActorContext, ActorId, Handler, Message, MessageType, Payload, QueueError, Role, RoleBuilder,
    SendError, State, MSG_GODIE, MSG_HELLO, MSG_SPAWN,
};
pub use thread::{
    actor_id_self, actor_system_create, actor_system_join, interrupt_running_system,
    running_system, send_message, ActorSystem, SpawnError, SystemError, SystemPhase,
    ThreadActorSystemConfig,
};
