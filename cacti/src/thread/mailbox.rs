use cacti_api::Message;

use crate::thread::error::QueueError;
use crate::thread::ring::RingBuffer;

/// Per-actor FIFO of pending messages.
///
/// A mailbox is not synchronized on its own: it lives inside the owning
/// actor's lock and every operation runs with that lock held.
#[derive(Debug)]
pub struct Mailbox {
    messages: RingBuffer<Message>,
}

impl Mailbox {
    pub fn new(limit: usize) -> Self {
        Self {
            messages: RingBuffer::bounded(limit),
        }
    }

    /// Append a message. Fails with [`QueueError::Full`] at the configured
    /// limit and with [`QueueError::AllocationFailed`] if growing fails.
    pub fn push(&mut self, message: Message) -> Result<(), QueueError> {
        self.messages.push(message)
    }

    pub fn pop(&mut self) -> Option<Message> {
        self.messages.pop()
    }

    /// Take back the most recently pushed message.
    pub(crate) fn retract(&mut self) -> Option<Message> {
        self.messages.pop_back()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.messages.is_full()
    }

    pub fn capacity(&self) -> usize {
        self.messages.capacity()
    }
}
