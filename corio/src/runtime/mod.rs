//! Core runtime components.
//!
//! This module contains the task machinery and the dispatch layer it calls
//! into:
//! - [`task`]: tasks, promises and the awaiter,
//! - [`executor`]: where resumed frames run,
//! - [`builder`]: runtime configuration,
//! - [`yield_now`](yield_now::yield_now): a bare suspension point.
//!
//! There is no scheduler here. A frame runs until it suspends; whoever
//! releases it (a completing task, a set event) hands its resumption to the
//! frame's executor.

mod core;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod yield_now;

pub mod executor;
pub mod task;

pub use self::core::Runtime;
