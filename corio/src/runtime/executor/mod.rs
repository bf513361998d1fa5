//! Frame dispatch.
//!
//! The runtime never decides *where* a frame runs. Every time a suspended
//! frame has to be resumed, the task hands a [`Job`] to the [`Executor`] it
//! was spawned with and the executor picks the thread.
//!
//! It is composed of:
//! - [`core`]: the [`Executor`] trait itself,
//! - [`inline`]: run the job right away on the calling thread,
//! - [`thread`]: run each job on a fresh OS thread.
//!
//! Anything more elaborate (pools, event loops, UI threads) plugs in by
//! implementing [`Executor`], or by passing a closure.

pub(crate) mod core;
pub(crate) mod inline;
pub(crate) mod thread;

pub use self::core::{Executor, Job};
pub use self::inline::InlineExecutor;
pub use self::thread::ThreadExecutor;
