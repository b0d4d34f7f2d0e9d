use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use tracing::{debug, warn};

use crate::thread::error::SystemError;
use crate::thread::scheduler::worker::Worker;
use crate::thread::sync::lock;
use crate::thread::system::SystemInner;

/// Fixed-size set of worker threads.
///
/// The pool counts exiting workers; the one that completes the count is
/// told so by [`WorkerPool::worker_exited`] and performs the system teardown.
pub struct WorkerPool {
    size: usize,
    thread_name_prefix: String,
    handles: Mutex<Vec<JoinHandle<()>>>,
    exited: AtomicUsize,
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size)
            .field("exited", &self.exited.load(Ordering::Relaxed))
            .finish()
    }
}

impl WorkerPool {
    pub fn new(size: usize, thread_name_prefix: impl Into<String>) -> Self {
        Self {
            size,
            thread_name_prefix: thread_name_prefix.into(),
            handles: Mutex::new(Vec::with_capacity(size)),
            exited: AtomicUsize::new(0),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Spawn all worker threads for `system`.
    ///
    /// On failure the threads already started keep their handles in the
    /// pool; the caller is expected to cancel the system and call
    /// [`WorkerPool::join_all`].
    pub(crate) fn start(&self, system: &Arc<SystemInner>) -> Result<(), SystemError> {
        for worker_id in 0..self.size {
            let name = format!("{}{}", self.thread_name_prefix, worker_id);
            let handle = Worker::new(worker_id, system.clone())
                .spawn(name)
                .map_err(|err| {
                    SystemError::ThreadSetupError(format!(
                        "failed to spawn worker {}: {}",
                        worker_id, err
                    ))
                })?;
            lock(&self.handles, "worker pool").push(handle);
        }
        debug!(pool_size = self.size, "worker pool started");
        Ok(())
    }

    /// Record that a worker left its loop. Returns true for the last one.
    pub(crate) fn worker_exited(&self) -> bool {
        self.exited.fetch_add(1, Ordering::AcqRel) + 1 == self.size
    }

    /// Join every started worker thread, returning how many were joined.
    pub(crate) fn join_all(&self) -> usize {
        let handles = std::mem::take(&mut *lock(&self.handles, "worker pool"));
        let count = handles.len();
        for handle in handles {
            if handle.join().is_err() {
                warn!("worker thread terminated by panic");
            }
        }
        count
    }
}
