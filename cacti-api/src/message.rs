//! # Messages
//!
//! A [`Message`] is a type tag plus a [`Payload`]. Three tags are reserved
//! and interpreted by the runtime itself:
//!
//! - [`MSG_SPAWN`]: the payload is a role; the receiving actor spawns a new
//!   actor with that role, which is then greeted with [`MSG_HELLO`] carrying
//!   the spawner's id.
//! - [`MSG_GODIE`]: the receiving actor is marked dead and stops accepting
//!   messages.
//! - [`MSG_HELLO`]: delivered to handler 0 like any ordinary message.
//!
//! Every other tag is an index into the receiving actor's role.

use std::any::Any;
use std::fmt;
use std::mem;
use std::sync::Arc;

use crate::role::Role;
use crate::types::{ActorId, MessageType};

pub const MSG_SPAWN: MessageType = 0x0605_7a6e;
pub const MSG_GODIE: MessageType = 0x60be_dead;
pub const MSG_HELLO: MessageType = 0x0;

/// Tagged message payload.
///
/// Payloads are reference counted, so the sender and every handler that
/// observes the payload share it without copying.
#[derive(Clone, Default)]
pub enum Payload {
    #[default]
    Empty,
    /// An actor id, as carried by `HELLO`.
    Actor(ActorId),
    /// A role descriptor, as carried by `SPAWN`.
    Role(Arc<Role>),
    /// Application data.
    Data(Arc<dyn Any + Send + Sync>),
}

impl Payload {
    /// Borrow application data as `T`, if that is what the payload carries.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Payload::Data(data) => data.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Clone out the shared data handle as `Arc<T>`.
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Payload::Data(data) => Arc::clone(data).downcast::<T>().ok(),
            _ => None,
        }
    }

    pub fn actor(&self) -> Option<ActorId> {
        match self {
            Payload::Actor(id) => Some(*id),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<&Arc<Role>> {
        match self {
            Payload::Role(role) => Some(role),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Empty => f.write_str("Empty"),
            Payload::Actor(id) => f.debug_tuple("Actor").field(id).finish(),
            Payload::Role(role) => f
                .debug_struct("Role")
                .field("handler_count", &role.handler_count())
                .finish(),
            Payload::Data(_) => f.write_str("Data(<opaque>)"),
        }
    }
}

/// A message addressed to one actor.
#[derive(Debug, Clone)]
pub struct Message {
    pub message_type: MessageType,
    /// Size in bytes of the value carried by the payload.
    pub nbytes: usize,
    pub payload: Payload,
}

impl Message {
    pub fn new(message_type: MessageType, nbytes: usize, payload: Payload) -> Self {
        Self {
            message_type,
            nbytes,
            payload,
        }
    }

    /// A message carrying application data of type `T`.
    pub fn with_data<T: Any + Send + Sync>(message_type: MessageType, data: T) -> Self {
        Self::with_shared(message_type, Arc::new(data))
    }

    /// A message carrying data the sender keeps a handle to.
    pub fn with_shared<T: Any + Send + Sync>(message_type: MessageType, data: Arc<T>) -> Self {
        Self {
            message_type,
            nbytes: mem::size_of::<T>(),
            payload: Payload::Data(data),
        }
    }

    /// A message with no payload.
    pub fn signal(message_type: MessageType) -> Self {
        Self::new(message_type, 0, Payload::Empty)
    }

    pub fn spawn(role: Arc<Role>) -> Self {
        Self::new(MSG_SPAWN, mem::size_of::<Role>(), Payload::Role(role))
    }

    pub fn godie() -> Self {
        Self::signal(MSG_GODIE)
    }

    /// Greeting sent to a freshly spawned actor, naming its parent.
    pub fn hello(parent: ActorId) -> Self {
        Self::new(MSG_HELLO, mem::size_of::<ActorId>(), Payload::Actor(parent))
    }

    /// Greeting for an actor that has no parent (the first actor of a system).
    pub fn bootstrap() -> Self {
        Self::signal(MSG_HELLO)
    }

    pub fn is_reserved(&self) -> bool {
        matches!(self.message_type, MSG_SPAWN | MSG_GODIE)
    }
}
