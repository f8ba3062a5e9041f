//! packring - fixed-capacity lock-free ring queue
//!
//! One producer hands values to any number of consumers through a
//! power-of-two ring of slots. Head and tail positions share a single
//! 64-bit atomic word, so a consumer claims an item with one compare-and-swap
//! that fails if either position moved.
//!
//! Nothing here ever blocks:
//! - pushing into a full queue drops the value,
//! - popping an empty queue returns `None`.
//!
//! ```
//! use packring::RingQueue;
//!
//! let mut queue = RingQueue::new(4).unwrap();
//! queue.push("job");
//! assert_eq!(queue.pop(), Some("job"));
//! assert_eq!(queue.pop(), None);
//! ```
//!
//! To share the queue between threads, [`split`](RingQueue::split) it (or
//! call [`channel`]) into a single [`Producer`] and a cloneable [`Consumer`].
#![warn(missing_docs)]

mod cursor;
mod error;
mod handle;
mod queue;
mod slot;
mod sync;
pub mod trace;

pub use error::{CapacityError, PushError};
pub use handle::{channel, Consumer, Producer};
pub use queue::{Drain, RingQueue, MAX_CAPACITY};
