//! # Thread Actor System
//!
//! `ActorSystem` owns one running instance of the runtime: the actor
//! registry, the ready queue, and the worker pool.
//!
//! ## Lifecycle
//! `Starting → Running → OperatingFinished → Destroyed`
//!
//! - `create` claims the process-wide "running" flag, so at most one system
//!   runs at a time. The flag is released at teardown, after which a new
//!   system may be created in the same process.
//! - The system finishes on its own once every actor has processed `GODIE`
//!   and no message is left in flight, or when it is interrupted.
//! - The last worker to leave its loop tears the system down (drops every
//!   actor, unregisters the system, releases the running flag) and then
//!   announces `Destroyed`. Other workers and every `join` caller wait for
//!   that announcement, so nobody is still deciding whether teardown is
//!   pending while the shared state goes away.
//!
//! ## Free functions
//! `actor_system_create`, `send_message`, `actor_id_self` and
//! `actor_system_join` address the currently running system without a
//! handle, for code written against the classic C-style interface.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use tracing::{debug, info, warn};

use cacti_api::{ActorContext, ActorId, Message, Role};

use crate::thread::actor::{ActorCell, StepOutcome};
use crate::thread::config::ThreadActorSystemConfig;
use crate::thread::context::{self, ThreadContext};
use crate::thread::error::{SendError, StepError, SystemError};
use crate::thread::registry::Registry;
use crate::thread::scheduler::{ReadyQueue, WorkerPool};
use crate::thread::signal;
use crate::thread::sync::{fatal, lock, wait};

/// Set while a system exists in this process.
static RUNNING: AtomicBool = AtomicBool::new(false);

/// The running system, for interrupt routing and the free-function API.
static CURRENT_SYSTEM: Mutex<Option<Arc<SystemInner>>> = Mutex::new(None);

/// The most recently started system until someone joins it. Keeps worker
/// handles reachable for `actor_system_join` after teardown has cleared
/// `CURRENT_SYSTEM`.
static UNJOINED_SYSTEM: Mutex<Option<Arc<SystemInner>>> = Mutex::new(None);

/// Lifecycle phase of a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPhase {
    Starting,
    Running,
    /// Every worker has stopped; teardown is in progress.
    OperatingFinished,
    Destroyed,
}

pub(crate) struct SystemInner {
    config: ThreadActorSystemConfig,
    registry: Registry,
    queue: ReadyQueue,
    pool: WorkerPool,
    interrupted: AtomicBool,
    phase: Mutex<SystemPhase>,
    phase_changed: Condvar,
}

impl fmt::Debug for SystemInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemInner")
            .field("config", &self.config)
            .field("actor_count", &self.registry.actor_count())
            .field("finished", &self.registry.finished_count())
            .field("interrupted", &self.is_interrupted())
            .finish()
    }
}

impl SystemInner {
    fn new(config: ThreadActorSystemConfig) -> Self {
        Self {
            registry: Registry::new(config.max_actors, config.mailbox_limit, config.pool_size),
            queue: ReadyQueue::new(),
            pool: WorkerPool::new(config.pool_size, config.thread_name_prefix.clone()),
            interrupted: AtomicBool::new(false),
            phase: Mutex::new(SystemPhase::Starting),
            phase_changed: Condvar::new(),
            config,
        }
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn queue(&self) -> &ReadyQueue {
        &self.queue
    }

    pub(crate) fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }

    /// Deliver `message` to `target` and mark the target runnable.
    ///
    /// The ready-queue entry is pushed while the target's lock is still held,
    /// so a failed enqueue can take back exactly the message it was meant
    /// for.
    pub(crate) fn send(&self, target: ActorId, message: Message) -> Result<(), SendError> {
        let actor = self
            .registry
            .get(target)
            .ok_or(SendError::TargetNotFound(target))?;
        actor.deliver_and(message, || self.queue.enqueue(target))
    }

    /// Run one step of `actor`. The caller holds its execution right.
    pub(crate) fn step(&self, actor: &ActorCell) -> Result<StepOutcome, StepError> {
        let id = actor.id();
        let outcome = actor.run_one_step(|handler, state, message| {
            let mut ctx = ThreadContext::new(self, id, state);
            let ctx: &mut dyn ActorContext = &mut ctx;
            handler(ctx, message);
        })?;

        match &outcome {
            StepOutcome::Spawn(role) => self.spawn_child(id, role.clone()),
            StepOutcome::InvalidSpawn => {
                warn!(actor = %id, "SPAWN without a role payload ignored");
            }
            StepOutcome::Died { first: true } => self.registry.mark_finished(),
            StepOutcome::Died { first: false }
            | StepOutcome::Idle
            | StepOutcome::Handled { .. } => {}
        }
        Ok(outcome)
    }

    fn spawn_child(&self, parent: ActorId, role: Arc<Role>) {
        match self.registry.insert(role) {
            Ok(child) => {
                debug!(parent = %parent, child = %child.id(), "actor spawned");
                if let Err(err) = self.send(child.id(), Message::hello(parent)) {
                    warn!(child = %child.id(), error = %err, "failed to greet spawned actor");
                }
            }
            Err(err) => warn!(parent = %parent, error = %err, "SPAWN rejected"),
        }
    }

    fn interrupt(&self) -> bool {
        if self.interrupted.swap(true, Ordering::AcqRel) {
            return false;
        }
        info!("actor system interrupted; stopping workers");
        self.queue.cancel();
        for actor in self.registry.snapshot() {
            actor.wake_all();
        }
        true
    }

    fn phase(&self) -> SystemPhase {
        *lock(&self.phase, "system phase")
    }

    fn set_phase(&self, phase: SystemPhase) {
        *lock(&self.phase, "system phase") = phase;
        self.phase_changed.notify_all();
    }

    fn wait_destroyed(&self) {
        let mut phase = lock(&self.phase, "system phase");
        while *phase != SystemPhase::Destroyed {
            phase = wait(&self.phase_changed, phase, "system phase");
        }
    }

    /// Called by every worker as it leaves its loop.
    pub(crate) fn worker_exited(self: &Arc<Self>) {
        if self.pool.worker_exited() {
            self.teardown();
        } else {
            self.wait_destroyed();
        }
    }

    fn teardown(self: &Arc<Self>) {
        self.set_phase(SystemPhase::OperatingFinished);
        let finished = self.registry.finished_count();
        let actors = self.registry.clear();
        self.unregister();
        RUNNING.store(false, Ordering::Release);
        info!(
            actors,
            finished,
            interrupted = self.is_interrupted(),
            "actor system destroyed"
        );
        self.set_phase(SystemPhase::Destroyed);
    }

    fn unregister(self: &Arc<Self>) {
        let mut current = lock(&CURRENT_SYSTEM, "current system");
        if current.as_ref().is_some_and(|system| Arc::ptr_eq(system, self)) {
            *current = None;
        }
    }

    /// Undo a start whose worker pool could not be brought up completely.
    /// The running flag is released by the caller.
    fn abort_start(self: &Arc<Self>) {
        self.interrupted.store(true, Ordering::Release);
        self.queue.cancel();
        self.set_phase(SystemPhase::Destroyed);
        self.pool.join_all();
        self.registry.clear();
        self.unregister();
    }
}

/// Handle to a running actor system. Cheap to clone.
#[derive(Clone)]
pub struct ActorSystem {
    inner: Arc<SystemInner>,
}

impl fmt::Debug for ActorSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorSystem")
            .field("inner", &self.inner)
            .finish()
    }
}

impl ActorSystem {
    /// Boot a system whose first actor plays `role`.
    ///
    /// The first actor receives a `HELLO` with an empty payload before
    /// anything else. Returns the handle and the first actor's id.
    pub fn create(
        config: ThreadActorSystemConfig,
        role: Arc<Role>,
    ) -> Result<(ActorSystem, ActorId), SystemError> {
        config.validate()?;
        if RUNNING
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SystemError::AlreadyRunning);
        }

        Self::start(config, role).map_err(|err| {
            RUNNING.store(false, Ordering::Release);
            err
        })
    }

    fn start(
        config: ThreadActorSystemConfig,
        role: Arc<Role>,
    ) -> Result<(ActorSystem, ActorId), SystemError> {
        if config.handle_interrupts {
            signal::install()?;
        }

        let inner = Arc::new(SystemInner::new(config));
        let first = inner.registry.insert(role)?.id();
        inner.send(first, Message::bootstrap())?;

        *lock(&CURRENT_SYSTEM, "current system") = Some(inner.clone());
        inner.set_phase(SystemPhase::Running);

        if let Err(err) = inner.pool.start(&inner) {
            inner.abort_start();
            return Err(err);
        }
        *lock(&UNJOINED_SYSTEM, "unjoined system") = Some(inner.clone());

        info!(
            pool_size = inner.config.pool_size,
            mailbox_limit = inner.config.mailbox_limit,
            max_actors = inner.config.max_actors,
            "actor system started"
        );
        Ok((ActorSystem { inner }, first))
    }

    /// Send `message` to `target`.
    pub fn send(&self, target: ActorId, message: Message) -> Result<(), SendError> {
        self.inner.send(target, message)
    }

    /// Block until the system has finished and torn itself down, then join
    /// its worker threads.
    pub fn join(&self) -> Result<(), SystemError> {
        if context::is_worker_thread() {
            return Err(SystemError::JoinFromWorker);
        }
        self.inner.wait_destroyed();
        let joined = self.inner.pool.join_all();
        let mut unjoined = lock(&UNJOINED_SYSTEM, "unjoined system");
        if unjoined.as_ref().is_some_and(|system| Arc::ptr_eq(system, &self.inner)) {
            *unjoined = None;
        }
        drop(unjoined);
        debug!(joined, "worker threads joined");
        Ok(())
    }

    /// Cooperatively stop the system: running handlers finish, no new step
    /// starts. Returns `false` if the system was already interrupted.
    pub fn interrupt(&self) -> bool {
        self.inner.interrupt()
    }

    pub fn phase(&self) -> SystemPhase {
        self.inner.phase()
    }

    pub fn is_interrupted(&self) -> bool {
        self.inner.is_interrupted()
    }

    /// Number of actors created so far (zero once destroyed).
    pub fn actor_count(&self) -> usize {
        self.inner.registry.actor_count()
    }

    /// Number of actors that processed `GODIE`.
    pub fn finished_count(&self) -> usize {
        self.inner.registry.finished_count()
    }

    pub fn config(&self) -> &ThreadActorSystemConfig {
        &self.inner.config
    }
}

/// The system currently running in this process, if any.
pub fn running_system() -> Option<ActorSystem> {
    lock(&CURRENT_SYSTEM, "current system")
        .clone()
        .map(|inner| ActorSystem { inner })
}

/// Boot a system with the default configuration. Returns the id of its
/// first actor.
pub fn actor_system_create(role: Arc<Role>) -> Result<ActorId, SystemError> {
    ActorSystem::create(ThreadActorSystemConfig::default(), role).map(|(_, id)| id)
}

/// Send `message` to `target` in the caller's system: the worker's own
/// system inside a handler, the running system elsewhere.
pub fn send_message(target: ActorId, message: Message) -> Result<(), SendError> {
    let system = context::current_system().or_else(|| running_system().map(|sys| sys.inner));
    match system {
        Some(system) => system.send(target, message),
        None => Err(SendError::TargetNotFound(target)),
    }
}

/// Id of the actor whose handler is running on this thread.
///
/// Calling this outside a handler is a fatal error.
pub fn actor_id_self() -> ActorId {
    match context::current_actor() {
        Some(id) => id,
        None => fatal("actor_id_self called outside of a message handler"),
    }
}

/// Wait for the system that owns `actor` to finish and join its workers.
///
/// A system that already tore itself down is still joined here, as long as
/// nobody joined it before. Returns immediately if no such system handed
/// out that id.
pub fn actor_system_join(actor: ActorId) -> Result<(), SystemError> {
    let system = running_system().or_else(|| {
        lock(&UNJOINED_SYSTEM, "unjoined system")
            .clone()
            .map(|inner| ActorSystem { inner })
    });
    match system {
        Some(system) if actor.index() < system.inner.registry.created_count() => system.join(),
        _ => Ok(()),
    }
}

/// Interrupt the running system, as Ctrl-C does.
pub fn interrupt_running_system() -> bool {
    running_system().map_or(false, |system| system.interrupt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_without_system_reports_not_found() {
        if running_system().is_none() {
            assert_eq!(
                send_message(ActorId(0), Message::signal(1)),
                Err(SendError::TargetNotFound(ActorId(0)))
            );
        }
    }
}
