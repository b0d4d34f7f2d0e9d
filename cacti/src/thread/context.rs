//! # Handler Context
//!
//! `ThreadContext` is the [`ActorContext`] handed to handlers on worker
//! threads. It borrows the actor's state slot for the duration of one step.
//!
//! Worker threads also carry a thread-local scope naming their system and the
//! actor whose step is running, which backs the free functions
//! `actor_id_self` and `send_message`.

use std::cell::RefCell;
use std::sync::Arc;

use cacti_api::{ActorContext, ActorId, Message, SendError, State};

use crate::thread::system::SystemInner;

pub struct ThreadContext<'a> {
    system: &'a SystemInner,
    id: ActorId,
    state: &'a mut State,
}

impl<'a> ThreadContext<'a> {
    pub(crate) fn new(system: &'a SystemInner, id: ActorId, state: &'a mut State) -> Self {
        Self { system, id, state }
    }
}

impl ActorContext for ThreadContext<'_> {
    fn id(&self) -> ActorId {
        self.id
    }

    fn send(&self, target: ActorId, message: Message) -> Result<(), SendError> {
        self.system.send(target, message)
    }

    fn state(&mut self) -> &mut State {
        self.state
    }
}

struct WorkerScope {
    system: Arc<SystemInner>,
    current: Option<ActorId>,
}

thread_local! {
    static WORKER_SCOPE: RefCell<Option<WorkerScope>> = const { RefCell::new(None) };
}

/// Mark the calling thread as a worker of `system`.
pub(crate) fn enter_worker(system: Arc<SystemInner>) {
    WORKER_SCOPE.with(|scope| {
        *scope.borrow_mut() = Some(WorkerScope {
            system,
            current: None,
        });
    });
}

pub(crate) fn exit_worker() {
    let scope = WORKER_SCOPE.with(|scope| scope.borrow_mut().take());
    drop(scope);
}

/// Record which actor's step the calling worker is running.
pub(crate) fn set_current_actor(id: Option<ActorId>) {
    WORKER_SCOPE.with(|scope| {
        if let Some(worker) = scope.borrow_mut().as_mut() {
            worker.current = id;
        }
    });
}

/// Actor whose handler is running on the calling thread, if any.
pub fn current_actor() -> Option<ActorId> {
    WORKER_SCOPE.with(|scope| scope.borrow().as_ref().and_then(|worker| worker.current))
}

/// System the calling worker thread belongs to.
pub(crate) fn current_system() -> Option<Arc<SystemInner>> {
    WORKER_SCOPE.with(|scope| scope.borrow().as_ref().map(|worker| worker.system.clone()))
}

pub fn is_worker_thread() -> bool {
    WORKER_SCOPE.with(|scope| scope.borrow().is_some())
}
