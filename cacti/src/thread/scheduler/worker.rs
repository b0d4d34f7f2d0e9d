use std::any::Any;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, trace, warn};

use cacti_api::ActorId;

use crate::thread::context;
use crate::thread::sync::fatal;
use crate::thread::system::SystemInner;

/// # Worker Thread
///
/// One thread of the shared pool.
///
/// ## Core Algorithm
/// 1. Take the next actor id from the ready queue (blocking)
/// 2. Acquire that actor's execution right (FIFO behind other workers)
/// 3. Run exactly one step
/// 4. Release the execution right and report the step to the queue
/// 5. Repeat until the queue is closed or cancelled
///
/// A panicking handler or a message type the role cannot dispatch ends the
/// process: the actor's state can no longer be trusted.
pub struct Worker {
    id: usize,
    system: Arc<SystemInner>,
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker").field("id", &self.id).finish()
    }
}

impl Worker {
    pub(crate) fn new(id: usize, system: Arc<SystemInner>) -> Self {
        Self { id, system }
    }

    /// Start the worker on a new named OS thread.
    pub fn spawn(self, name: String) -> io::Result<JoinHandle<()>> {
        thread::Builder::new().name(name).spawn(move || self.run_loop())
    }

    fn run_loop(self) {
        context::enter_worker(self.system.clone());
        debug!(worker = self.id, "worker started");

        let mut steps = 0usize;
        while let Some(id) = self.system.queue().dequeue_blocking() {
            self.run_step(id);
            steps += 1;
            let registry = self.system.registry();
            self.system
                .queue()
                .complete_step(|| registry.all_finished());
        }

        debug!(worker = self.id, steps, "worker stopping");
        context::exit_worker();
        self.system.worker_exited();
    }

    fn run_step(&self, id: ActorId) {
        let Some(actor) = self.system.registry().get(id) else {
            warn!(worker = self.id, actor = %id, "scheduled actor is not registered");
            return;
        };

        if !actor.acquire(|| self.system.is_interrupted()) {
            trace!(worker = self.id, actor = %id, "gave up waiting for actor after interrupt");
            return;
        }
        if self.system.is_interrupted() {
            actor.release();
            trace!(worker = self.id, actor = %id, "interrupted before step");
            return;
        }

        context::set_current_actor(Some(id));
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.system.step(&actor)));
        context::set_current_actor(None);
        actor.release();

        match result {
            Ok(Ok(outcome)) => trace!(worker = self.id, actor = %id, ?outcome, "step finished"),
            Ok(Err(err)) => fatal(format_args!("{} failed: {}", id, err)),
            Err(payload) => fatal(format_args!(
                "handler of {} panicked: {}",
                id,
                panic_message(payload.as_ref())
            )),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}
