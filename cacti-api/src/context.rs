//! # Handler Context
//!
//! Handlers receive a `&mut dyn ActorContext` for the actor they run on. The
//! context is the only way a handler touches the actor's state slot, which
//! guarantees the slot is never observed outside the actor's execution right.

use std::any::Any;

use crate::errors::SendError;
use crate::message::Message;
use crate::types::{ActorId, State};

/// What a handler may do while it runs.
pub trait ActorContext {
    /// Id of the actor this handler runs on.
    fn id(&self) -> ActorId;

    /// Deliver `message` to `target` in the same system.
    fn send(&self, target: ActorId, message: Message) -> Result<(), SendError>;

    /// Raw access to the actor's state slot.
    fn state(&mut self) -> &mut State;

    fn send_self(&self, message: Message) -> Result<(), SendError> {
        self.send(self.id(), message)
    }
}

impl dyn ActorContext + '_ {
    /// Borrow the state as `T`. Returns `None` if the slot is empty or holds
    /// another type.
    pub fn state_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.state().as_mut().and_then(|state| state.downcast_mut::<T>())
    }

    /// Replace whatever the slot holds with `value`.
    pub fn set_state<T: Any + Send>(&mut self, value: T) {
        *self.state() = Some(Box::new(value));
    }

    /// Move the state out as `T`, leaving the slot empty. A value of another
    /// type stays in place.
    pub fn take_state<T: Any>(&mut self) -> Option<T> {
        let slot = self.state();
        match slot.take() {
            Some(boxed) => match boxed.downcast::<T>() {
                Ok(value) => Some(*value),
                Err(other) => {
                    *slot = Some(other);
                    None
                }
            },
            None => None,
        }
    }
}
