//! Synchronization primitives for Corio.
//!
//! These primitives suspend frames instead of blocking threads and do not
//! depend on the task runtime: any future-driving code can wait on them.
//!
//! The current primitives include:
//! - [`BroadcastEvent`]: a lock-free, resettable event that releases every
//!   waiter at once.
//!
//! ## Design notes
//!
//! - Waiting on an event that is already set never allocates.
//! - Released frames are woken on the thread that calls `set`; with the
//!   default inline dispatch they also resume there.
//! - Share an event between frames with `Arc`.

mod event;

pub use event::{BroadcastEvent, EventWait};
