//! Error types.
//!
//! Only construction can fail. A full queue and an empty queue are normal
//! outcomes: `push` drops the value and `pop` returns `None`.

use std::fmt;

use thiserror::Error;

/// Rejected capacity passed to [`RingQueue::new`](crate::RingQueue::new).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapacityError {
    /// Capacity was zero.
    #[error("capacity must be greater than 0")]
    Zero,
    /// Capacity was not a power of two.
    #[error("capacity must be a power of 2, got {0}")]
    NotPowerOfTwo(usize),
    /// Capacity does not fit the 32-bit position counters.
    #[error("capacity {0} exceeds the maximum of {max}", max = crate::MAX_CAPACITY)]
    TooLarge(usize),
}

/// A value [`try_push`](crate::RingQueue::try_push) could not enqueue.
///
/// The rejected value is handed back to the caller.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PushError<T> {
    /// `head - tail == capacity`.
    Full(T),
    /// The target slot has been claimed by a consumer that has not finished
    /// reading it yet.
    Occupied(T),
}

impl<T> PushError<T> {
    /// Returns the value that was not enqueued.
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(value) | Self::Occupied(value) => value,
        }
    }

    /// Returns `true` for [`PushError::Full`].
    pub const fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }
}

impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => f.write_str("Full(..)"),
            Self::Occupied(_) => f.write_str("Occupied(..)"),
        }
    }
}

impl<T> fmt::Display for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => write!(f, "queue is full"),
            Self::Occupied(_) => write!(f, "slot is still being read"),
        }
    }
}

impl<T> std::error::Error for PushError<T> {}
