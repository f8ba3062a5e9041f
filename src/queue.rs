use std::fmt;

use crossbeam_utils::Backoff;

use crate::cursor::PackedCursor;
use crate::error::{CapacityError, PushError};
use crate::slot::Slot;
use crate::trace::{debug, trace};

/// Largest capacity the 32-bit position counters can index.
pub const MAX_CAPACITY: usize = 1 << 31;

/// Fixed-capacity ring queue: one producer, any number of consumers.
///
/// Pushing into a full queue silently drops the value and popping an empty
/// queue returns `None`; neither ever blocks.
///
/// # Single producer
///
/// [`push`](Self::push) takes `&mut self`, so while the queue is shared only
/// the unique [`Producer`](crate::Producer) from [`split`](Self::split) can
/// write to it. [`pop`](Self::pop) takes `&self` and may be called from any
/// number of threads at once.
///
/// # Example
///
/// ```
/// use packring::RingQueue;
///
/// let mut queue = RingQueue::new(4).unwrap();
/// for c in ['A', 'B', 'C', 'D', 'E'] {
///     queue.push(c);
/// }
/// // 'E' was dropped: the queue was full.
/// assert_eq!(queue.len(), 4);
/// assert_eq!(queue.pop(), Some('A'));
/// ```
pub struct RingQueue<T> {
    cursor: PackedCursor,
    slots: Box<[Slot<T>]>,
    mask: u32,
}

// Safety: slot payloads are only touched by the producer before publication
// and by the single consumer whose CAS claimed the position afterwards.
unsafe impl<T: Send> Send for RingQueue<T> {}
unsafe impl<T: Send> Sync for RingQueue<T> {}

impl<T> RingQueue<T> {
    /// Creates an empty queue with room for `capacity` items.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `capacity` is zero, not a power of two,
    /// or larger than [`MAX_CAPACITY`].
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        if capacity == 0 {
            return Err(CapacityError::Zero);
        }
        if !capacity.is_power_of_two() {
            return Err(CapacityError::NotPowerOfTwo(capacity));
        }
        if capacity > MAX_CAPACITY {
            return Err(CapacityError::TooLarge(capacity));
        }

        let slots = (0..capacity).map(|_| Slot::new()).collect();
        debug!(capacity, "ring queue created");

        Ok(Self {
            cursor: PackedCursor::new(),
            slots,
            mask: (capacity - 1) as u32,
        })
    }

    #[cfg(test)]
    fn starting_at(capacity: usize, position: u32) -> Self {
        let mut queue = Self::new(capacity).unwrap();
        queue.cursor = PackedCursor::starting_at(position, position);
        queue
    }

    /// Enqueues `value`, dropping it if the queue is full.
    #[inline]
    pub fn push(&mut self, value: T) {
        let _ = self.try_push(value);
    }

    /// Enqueues `value`, handing it back if it could not be stored.
    ///
    /// # Errors
    ///
    /// [`PushError::Full`] if the queue holds `capacity` items,
    /// [`PushError::Occupied`] if a consumer has claimed the target slot but
    /// not yet emptied it.
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<(), PushError<T>> {
        // Safety: `&mut self` rules out any other producer.
        unsafe { self.push_shared(value) }
    }

    /// Producer half of the protocol, callable through a shared reference.
    ///
    /// # Safety
    ///
    /// No other call to `push_shared` on this queue may run concurrently.
    pub(crate) unsafe fn push_shared(&self, value: T) -> Result<(), PushError<T>> {
        let pos = self.cursor.load();
        if pos.len() as usize == self.capacity() {
            trace!(head = pos.head, tail = pos.tail, "push dropped: queue full");
            return Err(PushError::Full(value));
        }

        // A consumer may have advanced tail past this slot's previous
        // generation without having moved the value out yet.
        let slot = self.slot(pos.head);
        if slot.is_occupied() {
            trace!(head = pos.head, "push dropped: slot still occupied");
            return Err(PushError::Occupied(value));
        }

        slot.fill(value);
        self.cursor.advance_head();
        Ok(())
    }

    /// Dequeues the oldest item, or returns `None` if the queue is empty.
    ///
    /// Safe to call from many threads at once. Each published item is
    /// returned by exactly one caller.
    pub fn pop(&self) -> Option<T> {
        let backoff = Backoff::new();
        let mut pos = self.cursor.load();
        loop {
            if pos.is_empty() {
                return None;
            }
            match self.cursor.try_claim(pos) {
                Ok(()) => break,
                Err(current) => {
                    pos = current;
                    backoff.spin();
                }
            }
        }

        // Safety: the successful CAS made this thread the only owner of
        // position `pos.tail`.
        let value = unsafe { self.slot(pos.tail).take() };
        debug_assert!(value.is_some(), "claimed slot held no value");
        value
    }

    /// Returns an iterator that pops until the queue is observed empty.
    pub fn drain(&self) -> Drain<'_, T> {
        Drain { queue: self }
    }

    /// Maximum number of items the queue holds.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of items published and not yet claimed.
    ///
    /// Exact when no other thread is operating on the queue; otherwise a
    /// snapshot that may already be stale.
    #[inline]
    pub fn len(&self) -> usize {
        self.cursor.load_relaxed().len() as usize
    }

    /// Returns `true` if no item is waiting to be popped.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor.load_relaxed().is_empty()
    }

    /// Returns `true` if the next push would be dropped.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    #[inline]
    fn slot(&self, position: u32) -> &Slot<T> {
        &self.slots[(position & self.mask) as usize]
    }
}

impl<T> fmt::Debug for RingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.cursor.load_relaxed();
        f.debug_struct("RingQueue")
            .field("capacity", &self.capacity())
            .field("head", &pos.head)
            .field("tail", &pos.tail)
            .finish()
    }
}

/// Iterator returned by [`RingQueue::drain`] and
/// [`Consumer::drain`](crate::Consumer::drain).
///
/// Not fused: after yielding `None` it yields again if more items are pushed.
pub struct Drain<'a, T> {
    queue: &'a RingQueue<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.queue.pop()
    }
}
