//! # Actor Cell
//!
//! The runtime-side representation of one actor: its role, its mailbox, its
//! state slot, and the bookkeeping that hands out its *execution right*.
//!
//! ## Execution right
//! Every delivered message puts one entry for the actor on the ready queue,
//! so several workers can pick up the same actor at once. Only one of them
//! may run a step; the rest queue up on the actor's wait ring:
//!
//! - The ring has one condition variable per worker, so two waiters never
//!   share a slot.
//! - A worker that finds the actor active takes the slot at
//!   `next_wait_slot` and sleeps on that slot's condition variable.
//! - The worker finishing a step grants the slot at `next_signal_slot` and
//!   wakes exactly that waiter. The right moves directly to the woken worker
//!   (`active` stays set), so waiters run in arrival order and a worker that
//!   arrives in between cannot overtake them.
//!
//! Cancellation broadcasts on every slot; woken waiters then give up without
//! taking the right.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex};

use tracing::{debug, trace};

use cacti_api::{ActorId, Message, Role, State};

use crate::thread::error::{SendError, StepError};
use crate::thread::mailbox::Mailbox;
use crate::thread::sync::{lock, wait};

/// What a single step did with the message it popped.
#[derive(Debug)]
pub enum StepOutcome {
    /// The mailbox was empty.
    Idle,
    /// A `SPAWN` was popped; the caller creates the child.
    Spawn(Arc<Role>),
    /// A `SPAWN` without a role payload was popped and dropped.
    InvalidSpawn,
    /// A `GODIE` was popped. `first` is true only the first time the actor
    /// is marked dead.
    Died { first: bool },
    /// An ordinary message was handed to the role's handler.
    Handled { message_type: usize },
}

struct ActorInner {
    mailbox: Mailbox,
    dead: bool,
    active: bool,
    next_wait_slot: usize,
    next_signal_slot: usize,
    waiting: usize,
    granted: Vec<bool>,
    abandoned: Vec<bool>,
}

pub struct ActorCell {
    id: ActorId,
    role: Arc<Role>,
    inner: Mutex<ActorInner>,
    wait_ring: Box<[Condvar]>,
    state: Mutex<State>,
}

impl fmt::Debug for ActorCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner, "actor");
        f.debug_struct("ActorCell")
            .field("id", &self.id)
            .field("pending", &inner.mailbox.len())
            .field("dead", &inner.dead)
            .field("active", &inner.active)
            .field("waiting", &inner.waiting)
            .finish()
    }
}

impl ActorCell {
    /// Create an actor whose wait ring can hold `ring_size` waiting workers.
    pub fn new(id: ActorId, role: Arc<Role>, mailbox_limit: usize, ring_size: usize) -> Self {
        let ring_size = ring_size.max(1);
        Self {
            id,
            role,
            inner: Mutex::new(ActorInner {
                mailbox: Mailbox::new(mailbox_limit),
                dead: false,
                active: false,
                next_wait_slot: 0,
                next_signal_slot: 0,
                waiting: 0,
                granted: vec![false; ring_size],
                abandoned: vec![false; ring_size],
            }),
            wait_ring: (0..ring_size).map(|_| Condvar::new()).collect(),
            state: Mutex::new(None),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn role(&self) -> &Arc<Role> {
        &self.role
    }

    pub fn is_dead(&self) -> bool {
        lock(&self.inner, "actor").dead
    }

    pub fn pending(&self) -> usize {
        lock(&self.inner, "actor").mailbox.len()
    }

    /// Put `message` in the mailbox unless the actor is dead.
    pub fn deliver(&self, message: Message) -> Result<(), SendError> {
        self.deliver_and(message, || Ok::<(), SendError>(()))
    }

    /// Deliver `message`, then run `then` before the actor lock is released.
    ///
    /// If `then` fails the message is taken back out of the mailbox, so a
    /// failed send leaves no trace.
    pub fn deliver_and<E>(
        &self,
        message: Message,
        then: impl FnOnce() -> Result<(), E>,
    ) -> Result<(), SendError>
    where
        E: Into<SendError>,
    {
        let mut inner = lock(&self.inner, "actor");
        if inner.dead {
            return Err(SendError::TargetDead(self.id));
        }
        inner.mailbox.push(message)?;
        if let Err(err) = then() {
            inner.mailbox.retract();
            return Err(err.into());
        }
        Ok(())
    }

    /// Take the execution right, waiting in FIFO order behind other workers.
    ///
    /// Returns `false` once `cancelled` reports true, even if the right was
    /// free or has just been handed over; a handed-over right is passed on
    /// to the next waiter.
    pub fn acquire(&self, cancelled: impl Fn() -> bool) -> bool {
        let mut inner = lock(&self.inner, "actor");
        if cancelled() {
            return false;
        }
        if !inner.active {
            inner.active = true;
            return true;
        }

        let slot = inner.next_wait_slot;
        inner.next_wait_slot = (slot + 1) % self.wait_ring.len();
        inner.waiting += 1;
        trace!(actor = %self.id, slot, waiting = inner.waiting, "waiting for execution right");

        loop {
            inner = wait(&self.wait_ring[slot], inner, "actor");
            let granted = std::mem::replace(&mut inner.granted[slot], false);
            if cancelled() {
                if granted {
                    self.hand_over(&mut inner);
                } else {
                    // Still counted in `waiting`; release skips this slot.
                    inner.abandoned[slot] = true;
                }
                return false;
            }
            if granted {
                return true;
            }
        }
    }

    /// Give up the execution right, handing it to the longest waiting worker
    /// if there is one.
    pub fn release(&self) {
        let mut inner = lock(&self.inner, "actor");
        self.hand_over(&mut inner);
    }

    fn hand_over(&self, inner: &mut ActorInner) {
        while inner.waiting > 0 {
            let slot = inner.next_signal_slot;
            inner.next_signal_slot = (slot + 1) % self.wait_ring.len();
            inner.waiting -= 1;
            if std::mem::replace(&mut inner.abandoned[slot], false) {
                continue;
            }
            inner.granted[slot] = true;
            self.wait_ring[slot].notify_one();
            return;
        }
        inner.active = false;
    }

    /// Wake every worker parked on the wait ring so it can observe
    /// cancellation.
    pub fn wake_all(&self) {
        let _inner = lock(&self.inner, "actor");
        for slot in self.wait_ring.iter() {
            slot.notify_all();
        }
    }

    /// Pop one message and act on it.
    ///
    /// Must be called by the holder of the execution right. Ordinary
    /// messages are dispatched to the role's handler through `run_handler`,
    /// which receives the state slot; reserved messages are reported back to
    /// the caller.
    pub fn run_one_step(
        &self,
        run_handler: impl FnOnce(&cacti_api::Handler, &mut State, &Message),
    ) -> Result<StepOutcome, StepError> {
        let message = match lock(&self.inner, "actor").mailbox.pop() {
            Some(message) => message,
            None => return Ok(StepOutcome::Idle),
        };

        match message.message_type {
            cacti_api::MSG_SPAWN => match message.payload.role() {
                Some(role) => Ok(StepOutcome::Spawn(role.clone())),
                None => Ok(StepOutcome::InvalidSpawn),
            },
            cacti_api::MSG_GODIE => {
                let mut inner = lock(&self.inner, "actor");
                let first = !inner.dead;
                inner.dead = true;
                if first {
                    debug!(actor = %self.id, pending = inner.mailbox.len(), "actor marked dead");
                }
                Ok(StepOutcome::Died { first })
            }
            message_type => {
                let handler =
                    self.role
                        .handler(message_type)
                        .ok_or(StepError::UnknownMessageType {
                            message_type,
                            handler_count: self.role.handler_count(),
                        })?;
                let mut state = lock(&self.state, "actor state");
                run_handler(handler, &mut state, &message);
                Ok(StepOutcome::Handled { message_type })
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn waiting(&self) -> usize {
        lock(&self.inner, "actor").waiting
    }
}
