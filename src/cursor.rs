//! The packed head/tail cursor.
//!
//! Both positions live in one `u64` so a consumer can advance `tail` with a
//! single compare-and-swap that also fails if the producer moved `head`:
//!
//! ```text
//!  63                 32 31                  0
//! +---------------------+---------------------+
//! |        head         |        tail         |
//! +---------------------+---------------------+
//! ```
//!
//! Each counter is 32 bits and wraps. Capacities are powers of two no larger
//! than `2^31`, so `position & mask` picks the same slot on either side of a
//! wrap and `head.wrapping_sub(tail)` is always the exact depth.

use crossbeam_utils::CachePadded;

use crate::sync::{AtomicU64, Ordering};

const TAIL_MASK: u64 = u32::MAX as u64;
const HEAD_SHIFT: u32 = u32::BITS;
/// Adding this to the packed word advances `head` by one.
const HEAD_ONE: u64 = 1 << HEAD_SHIFT;

/// Combine `head` and `tail` into one word.
#[inline]
pub(crate) const fn pack(head: u32, tail: u32) -> u64 {
    ((head as u64) << HEAD_SHIFT) | tail as u64
}

/// Split a packed word into `(head, tail)`.
#[inline]
pub(crate) const fn unpack(word: u64) -> (u32, u32) {
    ((word >> HEAD_SHIFT) as u32, (word & TAIL_MASK) as u32)
}

/// One decoded cursor snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Positions {
    pub(crate) head: u32,
    pub(crate) tail: u32,
}

impl Positions {
    #[inline]
    pub(crate) const fn from_word(word: u64) -> Self {
        let (head, tail) = unpack(word);
        Self { head, tail }
    }

    #[inline]
    pub(crate) const fn to_word(self) -> u64 {
        pack(self.head, self.tail)
    }

    /// Number of published, unclaimed items.
    #[inline]
    pub(crate) const fn len(self) -> u32 {
        self.head.wrapping_sub(self.tail)
    }

    #[inline]
    pub(crate) const fn is_empty(self) -> bool {
        self.head == self.tail
    }

    /// The same snapshot with `tail` moved past one item.
    #[inline]
    pub(crate) const fn claim_one(self) -> Self {
        Self {
            head: self.head,
            tail: self.tail.wrapping_add(1),
        }
    }
}

/// Atomic head/tail word, padded to its own cache line so slot traffic does
/// not false-share with it.
pub(crate) struct PackedCursor {
    word: CachePadded<AtomicU64>,
}

impl PackedCursor {
    pub(crate) fn new() -> Self {
        Self {
            word: CachePadded::new(AtomicU64::new(pack(0, 0))),
        }
    }

    /// A cursor whose counters start at `head`/`tail` instead of zero, for
    /// exercising counter wraparound.
    #[cfg(test)]
    pub(crate) fn starting_at(head: u32, tail: u32) -> Self {
        Self {
            word: CachePadded::new(AtomicU64::new(pack(head, tail))),
        }
    }

    /// Acquire load; pairs with the release in [`advance_head`](Self::advance_head).
    #[inline]
    pub(crate) fn load(&self) -> Positions {
        Positions::from_word(self.word.load(Ordering::Acquire))
    }

    /// Relaxed load for length queries that publish nothing.
    #[inline]
    pub(crate) fn load_relaxed(&self) -> Positions {
        Positions::from_word(self.word.load(Ordering::Relaxed))
    }

    /// Publish one item. Overflow of `head` carries out of the word and is
    /// discarded, so `tail` is never disturbed.
    #[inline]
    pub(crate) fn advance_head(&self) {
        self.word.fetch_add(HEAD_ONE, Ordering::Release);
    }

    /// Try to move from `current` to `current.claim_one()`.
    ///
    /// Fails if any other thread changed either counter since `current` was
    /// read.
    #[inline]
    pub(crate) fn try_claim(&self, current: Positions) -> Result<(), Positions> {
        self.word
            .compare_exchange_weak(
                current.to_word(),
                current.claim_one().to_word(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(Positions::from_word)
    }
}
