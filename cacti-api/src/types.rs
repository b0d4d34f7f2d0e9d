use std::any::Any;
use std::fmt;

/// Message type tag. For non-reserved values it is also the handler index.
pub type MessageType = usize;

/// Opaque per-actor state slot. Empty until a handler stores something in it.
pub type State = Option<Box<dyn Any + Send>>;

/// Identity of an actor within one running system.
///
/// Ids are handed out in creation order starting at zero and double as the
/// actor's index in the system registry, so they are never reused while the
/// system is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ActorId(pub usize);

impl ActorId {
    /// Position of the actor in the registry.
    pub fn index(self) -> usize {
        self.0
    }

    /// The id that the next created actor would receive after this one.
    pub fn next(self) -> ActorId {
        ActorId(self.0 + 1)
    }
}

impl From<usize> for ActorId {
    fn from(index: usize) -> Self {
        ActorId(index)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}
