//! # Growable Ring Buffer
//!
//! The circular buffer behind both actor mailboxes and the ready queue.
//!
//! ## Layout
//! Elements live in a contiguous `Vec<Option<T>>` whose length is the current
//! capacity. `front` is the slot of the oldest element, `back` the slot the
//! next push writes to, and `len` counts the elements so that a full and an
//! empty buffer are never confused when `front == back`.
//!
//! ## Resizing
//! - A push into a buffer with `len == capacity` first doubles the capacity,
//!   clamped to the optional limit. A buffer already at its limit rejects the
//!   push with [`QueueError::Full`].
//! - A pop that leaves `len < capacity / 4` halves the capacity, never below
//!   [`MIN_BUFFER_CAPACITY`].
//! - New storage is reserved with `try_reserve_exact`. A failed grow is
//!   reported as [`QueueError::AllocationFailed`] and leaves the buffer as it
//!   was; a failed shrink keeps the larger (still valid) storage.

use std::fmt;

use tracing::trace;

use crate::thread::error::QueueError;

/// Capacity of a fresh buffer and the floor for shrinking.
pub const MIN_BUFFER_CAPACITY: usize = 2;

pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    front: usize,
    back: usize,
    len: usize,
    limit: Option<usize>,
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .field("limit", &self.limit)
            .finish()
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> RingBuffer<T> {
    /// A buffer that grows until allocation fails.
    pub fn unbounded() -> Self {
        Self::with_limit(None)
    }

    /// A buffer that holds at most `limit` elements.
    ///
    /// Limits below [`MIN_BUFFER_CAPACITY`] are raised to it.
    pub fn bounded(limit: usize) -> Self {
        Self::with_limit(Some(limit.max(MIN_BUFFER_CAPACITY)))
    }

    fn with_limit(limit: Option<usize>) -> Self {
        let mut slots = Vec::with_capacity(MIN_BUFFER_CAPACITY);
        slots.resize_with(MIN_BUFFER_CAPACITY, || None);
        Self {
            slots,
            front: 0,
            back: 0,
            len: 0,
            limit,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when the buffer holds `limit` elements. Unbounded buffers are
    /// never full.
    pub fn is_full(&self) -> bool {
        self.limit.map_or(false, |limit| self.len >= limit)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Append `value` at the back.
    pub fn push(&mut self, value: T) -> Result<(), QueueError> {
        if self.len == self.capacity() {
            let grown = match self.limit {
                Some(limit) if self.capacity() >= limit => {
                    return Err(QueueError::Full { limit });
                }
                Some(limit) => (self.capacity() * 2).min(limit),
                None => self.capacity() * 2,
            };
            self.resize(grown)?;
        }

        self.slots[self.back] = Some(value);
        self.back = (self.back + 1) % self.capacity();
        self.len += 1;
        Ok(())
    }

    /// Remove and return the oldest element.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let value = self.slots[self.front].take();
        self.front = (self.front + 1) % self.capacity();
        self.len -= 1;
        self.maybe_shrink();
        value
    }

    /// Remove and return the newest element. Used to undo a push whose
    /// follow-up step failed.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.back = (self.back + self.capacity() - 1) % self.capacity();
        let value = self.slots[self.back].take();
        self.len -= 1;
        self.maybe_shrink();
        value
    }

    /// Borrow the oldest element.
    pub fn peek(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.slots[self.front].as_ref()
    }

    fn maybe_shrink(&mut self) {
        let capacity = self.capacity();
        if capacity > MIN_BUFFER_CAPACITY && self.len < capacity / 4 {
            let shrunk = (capacity / 2).max(MIN_BUFFER_CAPACITY);
            if let Err(err) = self.resize(shrunk) {
                trace!(capacity, error = %err, "keeping ring buffer capacity after failed shrink");
            }
        }
    }

    /// Move the elements into fresh storage of `new_capacity` slots, oldest
    /// first. On allocation failure nothing is modified.
    fn resize(&mut self, new_capacity: usize) -> Result<(), QueueError> {
        debug_assert!(new_capacity >= self.len);

        let mut slots: Vec<Option<T>> = Vec::new();
        slots
            .try_reserve_exact(new_capacity)
            .map_err(|_| QueueError::AllocationFailed {
                capacity: new_capacity,
            })?;

        let capacity = self.capacity();
        for offset in 0..self.len {
            slots.push(self.slots[(self.front + offset) % capacity].take());
        }
        slots.resize_with(new_capacity, || None);

        trace!(from = capacity, to = new_capacity, len = self.len, "ring buffer resized");

        self.slots = slots;
        self.front = 0;
        self.back = self.len % new_capacity;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    #[test]
    fn test_new_buffer_is_empty_at_minimum_capacity() {
        let ring: RingBuffer<u32> = RingBuffer::bounded(8);
        assert!(ring.is_empty());
        assert!(!ring.is_full());
        assert_eq!(ring.capacity(), MIN_BUFFER_CAPACITY);
        assert_eq!(ring.limit(), Some(8));
    }

    #[test]
    fn test_fifo_order_across_wraparound() {
        let mut ring = RingBuffer::unbounded();
        ring.push(1).unwrap();
        ring.push(2).unwrap();
        assert_eq!(ring.pop(), Some(1));
        ring.push(3).unwrap();
        ring.push(4).unwrap();
        assert_eq!(ring.peek(), Some(&2));
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), Some(3));
        assert_eq!(ring.pop(), Some(4));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn test_grows_by_doubling_up_to_limit() {
        let mut ring = RingBuffer::bounded(12);
        for i in 0..12 {
            ring.push(i).unwrap();
        }
        // 2 -> 4 -> 8 -> 12 (clamped)
        assert_eq!(ring.capacity(), 12);
        assert!(ring.is_full());
        assert_eq!(ring.push(12), Err(QueueError::Full { limit: 12 }));
        assert_eq!(ring.len(), 12);
    }

    #[test]
    fn test_round_trip_returns_to_minimum_capacity() {
        let mut ring = RingBuffer::bounded(1024);
        for i in 0..1000 {
            ring.push(i).unwrap();
        }
        assert_eq!(ring.capacity(), 1024);
        for i in 0..1000 {
            assert_eq!(ring.pop(), Some(i));
        }
        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), MIN_BUFFER_CAPACITY);
    }

    #[test]
    fn test_pop_back_undoes_last_push() {
        let mut ring = RingBuffer::unbounded();
        ring.push("a").unwrap();
        ring.push("b").unwrap();
        ring.push("c").unwrap();
        assert_eq!(ring.pop_back(), Some("c"));
        assert_eq!(ring.pop(), Some("a"));
        assert_eq!(ring.pop(), Some("b"));
        assert_eq!(ring.pop_back(), None);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push(u16),
        Pop,
        PopBack,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => any::<u16>().prop_map(Op::Push),
            2 => Just(Op::Pop),
            1 => Just(Op::PopBack),
        ]
    }

    proptest! {
        #[test]
        fn prop_matches_vecdeque_model(limit in 2usize..64, ops in proptest::collection::vec(op(), 0..400)) {
            let mut ring = RingBuffer::bounded(limit);
            let mut model = VecDeque::new();

            for op in ops {
                match op {
                    Op::Push(v) => {
                        let result = ring.push(v);
                        if model.len() == limit {
                            prop_assert_eq!(result, Err(QueueError::Full { limit }));
                        } else {
                            prop_assert!(result.is_ok());
                            model.push_back(v);
                        }
                    }
                    Op::Pop => prop_assert_eq!(ring.pop(), model.pop_front()),
                    Op::PopBack => prop_assert_eq!(ring.pop_back(), model.pop_back()),
                }

                prop_assert_eq!(ring.len(), model.len());
                prop_assert!(ring.capacity() >= MIN_BUFFER_CAPACITY);
                prop_assert!(ring.capacity() <= limit.max(MIN_BUFFER_CAPACITY));
                prop_assert!(ring.capacity() >= ring.len());
            }
        }
    }
}
