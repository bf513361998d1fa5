//! # Corio
//!
//! **Corio** is a small in-process task runtime for Rust, built around
//! suspendable frames and single-assignment results.
//!
//! It does not ship a scheduler or an I/O reactor. A frame runs until it
//! suspends; whoever releases it (a completing task, a set event) hands its
//! resumption to an [`Executor`](executor::Executor) chosen when the task
//! was spawned. Corio provides:
//!
//! - **Tasks**: eagerly started frames whose result can be awaited, blocked
//!   on, or observed through callbacks
//! - **Promises**: tasks completed by hand from any thread
//! - **Broadcast events**: a lock-free manual-reset event releasing every
//!   waiting frame at once
//! - **Generators**: lazy, pull-based sequences with `map`, `filter`,
//!   `flat_expand`, `take`, `take_while` and `fold`
//! - **Ergonomic macros**: `#[corio::main]` and `#[corio::test]`
//!
//! Failures, including panics inside frames, are captured as a
//! [`Failure`] and re-raised on every read of the result.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use corio::generator::{Generator, Sequence};
//!
//! #[corio::main]
//! async fn main() {
//!     let sum = corio::spawn(async {
//!         Generator::from_iter(1..=10).fold(0, |acc, n| acc + n).unwrap()
//!     });
//!
//!     assert_eq!(sum.await.unwrap(), 55);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`task`]: tasks, promises and spawning
//! - [`sync`]: the broadcast event
//! - [`generator`]: lazy sequences
//! - [`executor`]: dispatch policies

mod error;
mod outcome;
mod runtime;

pub mod generator;
pub mod sync;

pub use error::{Abandoned, Error, Failure, Panicked, Stalled};
pub use outcome::Outcome;

pub use runtime::Runtime;
pub use runtime::builder::RuntimeBuilder;
pub use runtime::executor;
pub use runtime::task::{self, Promise, Task, TaskAwaiter, spawn, try_spawn};
pub use runtime::yield_now::yield_now;

pub use corio_macros::*;
