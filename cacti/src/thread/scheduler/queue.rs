use std::fmt;
use std::sync::{Condvar, Mutex};

use cacti_api::ActorId;

use crate::thread::error::QueueError;
use crate::thread::ring::RingBuffer;
use crate::thread::sync::{lock, wait};

/// Global FIFO of actor ids that have a pending message.
///
/// Every successful delivery enqueues the target id once, so the queue holds
/// exactly one entry per undelivered message. Workers block in
/// [`ReadyQueue::dequeue_blocking`] until an entry is available.
///
/// # Termination
/// The queue also counts the steps currently running (`in_flight`). When the
/// last running step completes, the queue is empty and every actor has
/// finished, no further message can ever be produced, so the queue closes and
/// wakes all workers. Cancellation closes it immediately instead.
///
/// # Wakeups
/// - `enqueue` notifies a single waiter.
/// - Closing and cancelling notify all waiters.
pub struct ReadyQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

#[derive(Debug, Default)]
struct QueueState {
    ring: RingBuffer<ActorId>,
    in_flight: usize,
    closed: bool,
    cancelled: bool,
}

impl fmt::Debug for ReadyQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state, "ready queue");
        f.debug_struct("ReadyQueue")
            .field("len", &state.ring.len())
            .field("in_flight", &state.in_flight)
            .field("closed", &state.closed)
            .field("cancelled", &state.cancelled)
            .finish()
    }
}

impl Default for ReadyQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            available: Condvar::new(),
        }
    }

    /// Mark `id` runnable and wake one worker.
    pub fn enqueue(&self, id: ActorId) -> Result<(), QueueError> {
        let mut state = lock(&self.state, "ready queue");
        state.ring.push(id)?;
        drop(state);
        self.available.notify_one();
        Ok(())
    }

    /// Block until an actor id is available.
    ///
    /// Returns `None` once the queue is cancelled, or once it is closed and
    /// drained. A returned id counts as a running step until the caller
    /// reports it with [`ReadyQueue::complete_step`].
    pub fn dequeue_blocking(&self) -> Option<ActorId> {
        let mut state = lock(&self.state, "ready queue");
        loop {
            if state.cancelled {
                return None;
            }
            if let Some(id) = state.ring.pop() {
                state.in_flight += 1;
                return Some(id);
            }
            if state.closed {
                return None;
            }
            state = wait(&self.available, state, "ready queue");
        }
    }

    /// Report that a step obtained from `dequeue_blocking` has ended.
    ///
    /// `all_finished` is evaluated with the queue lock held, only when no
    /// other step is running and nothing is queued.
    pub fn complete_step(&self, all_finished: impl FnOnce() -> bool) {
        let mut state = lock(&self.state, "ready queue");
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 && state.ring.is_empty() && !state.closed && all_finished() {
            state.closed = true;
            drop(state);
            self.available.notify_all();
        }
    }

    /// Stop handing out work and wake every waiting worker.
    ///
    /// Returns `false` if the queue was already cancelled.
    pub fn cancel(&self) -> bool {
        let mut state = lock(&self.state, "ready queue");
        if state.cancelled {
            return false;
        }
        state.cancelled = true;
        drop(state);
        self.available.notify_all();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        lock(&self.state, "ready queue").cancelled
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state, "ready queue").closed
    }

    pub fn len(&self) -> usize {
        lock(&self.state, "ready queue").ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_fifo_order() {
        let queue = ReadyQueue::new();
        for i in 0..5 {
            queue.enqueue(ActorId(i)).unwrap();
        }
        for i in 0..5 {
            assert_eq!(queue.dequeue_blocking(), Some(ActorId(i)));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dequeue_blocks_until_enqueue() {
        let queue = Arc::new(ReadyQueue::new());
        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || queue.dequeue_blocking())
        };
        thread::sleep(Duration::from_millis(50));
        queue.enqueue(ActorId(7)).unwrap();
        assert_eq!(consumer.join().unwrap(), Some(ActorId(7)));
    }

    #[test]
    fn test_cancel_wakes_all_waiters() {
        let queue = Arc::new(ReadyQueue::new());
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || queue.dequeue_blocking())
            })
            .collect();
        thread::sleep(Duration::from_millis(50));
        assert!(queue.cancel());
        assert!(!queue.cancel());
        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), None);
        }
    }

    #[test]
    fn test_cancel_discards_pending_entries() {
        let queue = ReadyQueue::new();
        queue.enqueue(ActorId(1)).unwrap();
        queue.cancel();
        assert_eq!(queue.dequeue_blocking(), None);
    }

    #[test]
    fn test_closes_after_last_step_when_all_finished() {
        let queue = ReadyQueue::new();
        queue.enqueue(ActorId(0)).unwrap();
        queue.enqueue(ActorId(0)).unwrap();

        let first = queue.dequeue_blocking();
        assert_eq!(first, Some(ActorId(0)));
        // another entry is still queued
        queue.complete_step(|| true);
        assert!(!queue.is_closed());

        assert_eq!(queue.dequeue_blocking(), Some(ActorId(0)));
        // actors still alive
        queue.complete_step(|| false);
        assert!(!queue.is_closed());

        queue.enqueue(ActorId(0)).unwrap();
        assert_eq!(queue.dequeue_blocking(), Some(ActorId(0)));
        queue.complete_step(|| true);
        assert!(queue.is_closed());
        assert_eq!(queue.dequeue_blocking(), None);
    }

    #[test]
    fn test_does_not_close_while_another_step_runs() {
        let queue = ReadyQueue::new();
        queue.enqueue(ActorId(0)).unwrap();
        queue.enqueue(ActorId(1)).unwrap();
        queue.dequeue_blocking();
        queue.dequeue_blocking();

        queue.complete_step(|| true);
        assert!(!queue.is_closed());
        queue.complete_step(|| true);
        assert!(queue.is_closed());
    }
}
