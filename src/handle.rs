//! Producer and consumer handles for sharing a queue across threads.
//!
//! A queue is split into exactly one [`Producer`] and a cloneable
//! [`Consumer`]. The producer is neither `Clone` nor usable through a shared
//! reference, which is what upholds the single-producer contract.
//!
//! # Example
//!
//! ```
//! use packring::channel;
//! use std::thread;
//!
//! let (mut tx, rx) = channel::<u64>(64).unwrap();
//!
//! let consumers: Vec<_> = (0..2)
//!     .map(|_| {
//!         let rx = rx.clone();
//!         thread::spawn(move || {
//!             let mut got = Vec::new();
//!             while got.len() < 8 {
//!                 match rx.pop() {
//!                     Some(v) if v == u64::MAX => break,
//!                     Some(v) => got.push(v),
//!                     None => std::hint::spin_loop(),
//!                 }
//!             }
//!             got
//!         })
//!     })
//!     .collect();
//!
//! for i in 0..8 {
//!     tx.push(i);
//! }
//! tx.push(u64::MAX);
//! tx.push(u64::MAX);
//!
//! let total: usize = consumers.into_iter().map(|h| h.join().unwrap().len()).sum();
//! assert_eq!(total, 8);
//! ```

use std::fmt;

use crate::error::{CapacityError, PushError};
use crate::queue::{Drain, RingQueue};
use crate::sync::Arc;

/// Creates a queue of `capacity` slots and splits it into its handles.
///
/// # Errors
///
/// Same as [`RingQueue::new`].
pub fn channel<T>(capacity: usize) -> Result<(Producer<T>, Consumer<T>), CapacityError> {
    Ok(RingQueue::new(capacity)?.split())
}

impl<T> RingQueue<T> {
    /// Moves the queue behind shared ownership and returns its only
    /// producer and a first consumer.
    pub fn split(self) -> (Producer<T>, Consumer<T>) {
        let queue = Arc::new(self);
        (
            Producer {
                queue: Arc::clone(&queue),
            },
            Consumer { queue },
        )
    }
}

/// The writing half of a split queue. There is exactly one per queue.
pub struct Producer<T> {
    queue: Arc<RingQueue<T>>,
}

impl<T> Producer<T> {
    /// Enqueues `value`, dropping it if the queue is full.
    #[inline]
    pub fn push(&mut self, value: T) {
        let _ = self.try_push(value);
    }

    /// Enqueues `value`, handing it back if it could not be stored.
    ///
    /// # Errors
    ///
    /// See [`RingQueue::try_push`].
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<(), PushError<T>> {
        // Safety: `split` hands out one producer, it cannot be cloned, and
        // pushing needs `&mut self`.
        unsafe { self.queue.push_shared(value) }
    }

    /// Maximum number of items the queue holds.
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Number of items waiting to be popped.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if no item is waiting to be popped.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns `true` if the next push would be dropped.
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Producer").field(&*self.queue).finish()
    }
}

/// The reading half of a split queue. Clone it to add consumers.
pub struct Consumer<T> {
    queue: Arc<RingQueue<T>>,
}

impl<T> Consumer<T> {
    /// Dequeues the oldest item, or returns `None` if the queue is empty.
    #[inline]
    pub fn pop(&self) -> Option<T> {
        self.queue.pop()
    }

    /// Pops until the queue is observed empty.
    pub fn drain(&self) -> Drain<'_, T> {
        self.queue.drain()
    }

    /// Maximum number of items the queue holds.
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Number of items waiting to be popped.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if no item is waiting to be popped.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Clone for Consumer<T> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<T> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Consumer").field(&*self.queue).finish()
    }
}
