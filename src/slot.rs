use std::cell::UnsafeCell;

use crate::sync::{AtomicBool, Ordering};

/// One cell of the ring.
///
/// `occupied` is the synchronization state; `value` is only the payload.
/// `value` is `Some` exactly while `occupied` is `true`.
pub(crate) struct Slot<T> {
    occupied: AtomicBool,
    value: UnsafeCell<Option<T>>,
}

impl<T> Slot<T> {
    pub(crate) fn new() -> Self {
        Self {
            occupied: AtomicBool::new(false),
            value: UnsafeCell::new(None),
        }
    }

    /// Acquire load; pairs with the release in [`take`](Self::take) so a
    /// producer that sees `false` also sees the previous value moved out.
    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        self.occupied.load(Ordering::Acquire)
    }

    /// Store `value` and mark the slot occupied.
    ///
    /// # Safety
    ///
    /// The caller must be the only producer, must have observed
    /// `is_occupied() == false`, and must not yet have published this
    /// position through the cursor.
    #[inline]
    pub(crate) unsafe fn fill(&self, value: T) {
        *self.value.get() = Some(value);
        self.occupied.store(true, Ordering::Release);
    }

    /// Move the value out and mark the slot empty.
    ///
    /// # Safety
    ///
    /// The caller must hold the ticket for this slot, i.e. it won the cursor
    /// CAS that advanced `tail` past the slot's position.
    #[inline]
    pub(crate) unsafe fn take(&self) -> Option<T> {
        let value = (*self.value.get()).take();
        self.occupied.store(false, Ordering::Release);
        value
    }
}
