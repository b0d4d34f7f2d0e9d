use std::fmt;
use std::sync::Arc;

use crate::context::ActorContext;
use crate::message::Message;
use crate::types::MessageType;

/// A message handler. Runs on a worker thread while the actor holds its
/// execution right; anything it sends is attributed to that actor.
pub type Handler = Arc<dyn Fn(&mut dyn ActorContext, &Message) + Send + Sync>;

/// Immutable dispatch table of an actor.
///
/// Handler `i` receives messages of type `i`. Handler 0 conventionally
/// receives `HELLO`.
#[derive(Clone)]
pub struct Role {
    handlers: Vec<Handler>,
}

impl Role {
    pub fn new(handlers: Vec<Handler>) -> Self {
        Self { handlers }
    }

    pub fn builder() -> RoleBuilder {
        RoleBuilder::default()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Handler for `message_type`, or `None` if the role has no such index.
    pub fn handler(&self, message_type: MessageType) -> Option<&Handler> {
        self.handlers.get(message_type)
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Role")
            .field("handler_count", &self.handlers.len())
            .finish()
    }
}

/// Builds a [`Role`] one handler at a time, in message-type order.
#[derive(Default)]
pub struct RoleBuilder {
    handlers: Vec<Handler>,
}

impl RoleBuilder {
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut dyn ActorContext, &Message) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
        self
    }

    pub fn build(self) -> Role {
        Role::new(self.handlers)
    }

    /// Convenience for roles that are shared with `SPAWN` messages.
    pub fn build_shared(self) -> Arc<Role> {
        Arc::new(self.build())
    }
}
