#![doc = " Thread-based actor runtime: a fixed worker pool driving message handlers."]

pub mod actor;
pub mod config;
pub mod context;
pub mod error;
pub mod mailbox;
pub mod registry;
pub mod ring;
pub mod scheduler;
pub mod signal;
pub mod sync;
pub mod system;

pub use config::ThreadActorSystemConfig;
pub use context::{current_actor, is_worker_thread, ThreadContext};
pub use error::{QueueError, SendError, SpawnError, StepError, SystemError};
pub use system::{
    actor_id_self, actor_system_create, actor_system_join, interrupt_running_system,
    running_system, send_message, ActorSystem, SystemPhase,
};
